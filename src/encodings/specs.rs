use super::{
    ExhaustiveCapacityEncoder, LazyCapacityEncoder, PseudoBooleanCapacityEncoder, VariableTable,
};
use crate::{
    line::Instance,
    sat::{clause, Literal, Model},
    solvers::SolveError,
};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// The trait for the strategies bounding the load of the stations.
pub trait CapacityConstraintsEncoder {
    /// Returns `true` iff this strategy needs the "assigned here" indicator variables.
    fn requires_indicators(&self) -> bool;

    /// Returns `true` iff the upfront constraints are enough to bound all the loads.
    ///
    /// Incomplete strategies rely on the refinement loop to add cuts as overloaded stations are found.
    fn is_complete(&self) -> bool;

    /// Appends the upfront capacity constraints to a clause list.
    ///
    /// Auxiliary variables are taken from the watermark of the table, which is moved accordingly.
    fn encode_constraints(
        &self,
        instance: &Instance,
        cycle_time: usize,
        table: &mut VariableTable,
        clauses: &mut Vec<Vec<Literal>>,
    ) -> Result<(), SolveError>;

    /// Returns the clauses cutting the overloaded stations of a model, if any.
    fn capacity_cuts(
        &self,
        instance: &Instance,
        cycle_time: usize,
        table: &VariableTable,
        model: &Model,
    ) -> Vec<Vec<Literal>>;
}

/// The available capacity strategies.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, AsRefStr, Display)]
pub enum CapacityStrategy {
    /// Forbids every overloading subset of tasks upfront.
    #[strum(serialize = "exhaustive")]
    Exhaustive,
    /// Forbids overloading subsets as they appear in models.
    #[default]
    #[strum(serialize = "lazy")]
    Lazy,
    /// Translates the capacity of each station as a pseudo-boolean constraint.
    #[strum(serialize = "pb")]
    PseudoBoolean,
}

impl CapacityStrategy {
    /// Builds the encoder implementing this strategy.
    ///
    /// The exhaustive limit is only used by the exhaustive strategy.
    pub fn new_encoder(&self, exhaustive_limit: usize) -> Box<dyn CapacityConstraintsEncoder> {
        match self {
            CapacityStrategy::Exhaustive => Box::new(ExhaustiveCapacityEncoder::new(exhaustive_limit)),
            CapacityStrategy::Lazy => Box::<LazyCapacityEncoder>::default(),
            CapacityStrategy::PseudoBoolean => Box::<PseudoBooleanCapacityEncoder>::default(),
        }
    }
}

/// Links each indicator variable to the two mode variables of its (task, station) pair.
pub(crate) fn encode_indicator_links(
    instance: &Instance,
    table: &VariableTable,
    clauses: &mut Vec<Vec<Literal>>,
) {
    for task in 0..instance.n_tasks() {
        for station in 0..table.n_stations() {
            let y = table.indicator_var(task, station) as isize;
            let f = table.forward_var(task, station) as isize;
            let b = table.backward_var(task, station) as isize;
            clauses.push(clause![-y, f, b]);
            clauses.push(clause![-f, y]);
            clauses.push(clause![-b, y]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            vec!["exhaustive", "lazy", "pb"],
            CapacityStrategy::iter()
                .map(|s| s.as_ref().to_string())
                .collect::<Vec<_>>()
        );
        assert_eq!(CapacityStrategy::PseudoBoolean, CapacityStrategy::from_str("pb").unwrap());
        assert!(CapacityStrategy::from_str("foo").is_err());
        assert_eq!(CapacityStrategy::Lazy, CapacityStrategy::default());
    }

    #[test]
    fn test_completeness() {
        assert!(CapacityStrategy::Exhaustive.new_encoder(10).is_complete());
        assert!(!CapacityStrategy::Lazy.new_encoder(10).is_complete());
        assert!(CapacityStrategy::PseudoBoolean.new_encoder(10).is_complete());
    }

    #[test]
    fn test_indicator_links() {
        let instance = Instance::new(vec![1, 2], vec![]).unwrap();
        let table = VariableTable::with_indicators(2, 3);
        let mut clauses = vec![];
        encode_indicator_links(&instance, &table, &mut clauses);
        assert_eq!(2 * 3 * 3, clauses.len());
        assert_eq!(
            clause![-(table.indicator_var(1, 2) as isize), table.forward_var(1, 2) as isize, table.backward_var(1, 2) as isize],
            clauses[15]
        );
    }
}
