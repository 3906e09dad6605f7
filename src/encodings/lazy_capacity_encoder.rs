use super::{specs::encode_indicator_links, CapacityConstraintsEncoder, VariableTable};
use crate::{
    line::Instance,
    sat::{Literal, Model},
    solvers::SolveError,
};

/// A capacity strategy adding no capacity constraint upfront.
///
/// After each solve, the tasks a station holds are read from the indicator variables;
/// a station exceeding the cycle time gets a clause forbidding that exact set of tasks.
#[derive(Default)]
pub struct LazyCapacityEncoder;

impl CapacityConstraintsEncoder for LazyCapacityEncoder {
    fn requires_indicators(&self) -> bool {
        true
    }

    fn is_complete(&self) -> bool {
        false
    }

    fn encode_constraints(
        &self,
        instance: &Instance,
        _cycle_time: usize,
        table: &mut VariableTable,
        clauses: &mut Vec<Vec<Literal>>,
    ) -> Result<(), SolveError> {
        encode_indicator_links(instance, table, clauses);
        Ok(())
    }

    fn capacity_cuts(
        &self,
        instance: &Instance,
        cycle_time: usize,
        table: &VariableTable,
        model: &Model,
    ) -> Vec<Vec<Literal>> {
        (0..table.n_stations())
            .filter_map(|station| {
                let assigned = (0..instance.n_tasks())
                    .filter(|task| model.is_true(table.indicator_var(*task, station)))
                    .collect::<Vec<usize>>();
                let load = assigned.iter().map(|t| instance.duration(*t)).sum::<usize>();
                if load > cycle_time {
                    Some(
                        assigned
                            .iter()
                            .map(|t| Literal::negative(table.indicator_var(*t, station)))
                            .collect(),
                    )
                } else {
                    None
                }
            })
            .collect()
    }
}
