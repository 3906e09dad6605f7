use super::{
    CapacityConstraintsEncoder, PseudoBooleanEncoder, SequentialWeightCounter, VariableTable,
};
use crate::{
    line::{Instance, Mode},
    sat::{Literal, Model},
    solvers::SolveError,
};

/// A capacity strategy translating the load of each station into a pseudo-boolean constraint.
///
/// Both mode variables of each task are weighted by its duration;
/// the weighted sum must not exceed the cycle time.
pub struct PseudoBooleanCapacityEncoder {
    pb_encoder: Box<dyn PseudoBooleanEncoder>,
}

impl PseudoBooleanCapacityEncoder {
    /// Builds a capacity encoder relying on the given pseudo-boolean encoder.
    pub fn new(pb_encoder: Box<dyn PseudoBooleanEncoder>) -> Self {
        Self { pb_encoder }
    }
}

impl Default for PseudoBooleanCapacityEncoder {
    fn default() -> Self {
        Self::new(Box::<SequentialWeightCounter>::default())
    }
}

impl CapacityConstraintsEncoder for PseudoBooleanCapacityEncoder {
    fn requires_indicators(&self) -> bool {
        false
    }

    fn is_complete(&self) -> bool {
        true
    }

    fn encode_constraints(
        &self,
        instance: &Instance,
        cycle_time: usize,
        table: &mut VariableTable,
        clauses: &mut Vec<Vec<Literal>>,
    ) -> Result<(), SolveError> {
        for station in 0..table.n_stations() {
            let (lits, weights): (Vec<Literal>, Vec<usize>) = (0..instance.n_tasks())
                .flat_map(|task| {
                    [Mode::Forward, Mode::Backward]
                        .map(|mode| (table.mode_lit(task, station, mode), instance.duration(task)))
                })
                .unzip();
            let encoding =
                self.pb_encoder
                    .encode_at_most(&lits, &weights, cycle_time, table.watermark());
            table.advance_watermark(encoding.next_free_var);
            clauses.extend(encoding.clauses);
        }
        Ok(())
    }

    fn capacity_cuts(
        &self,
        _instance: &Instance,
        _cycle_time: usize,
        _table: &VariableTable,
        _model: &Model,
    ) -> Vec<Vec<Literal>> {
        vec![]
    }
}
