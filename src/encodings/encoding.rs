use super::{
    AssignmentConstraintsEncoder, CapacityConstraintsEncoder, PrecedenceConstraintsEncoder,
    VariableTable,
};
use crate::{line::Instance, sat::Literal, solvers::SolveError};

/// The base encoding of an instance for a given station count.
///
/// It holds the variable table and the clauses encoding assignment, precedence and upfront capacity constraints.
/// Two encodings of the same instance with the same parameters are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    table: VariableTable,
    clauses: Vec<Vec<Literal>>,
}

impl Encoding {
    /// Builds the base encoding of an instance.
    pub fn new(
        instance: &Instance,
        n_stations: usize,
        cycle_time: usize,
        capacity_encoder: &dyn CapacityConstraintsEncoder,
    ) -> Result<Self, SolveError> {
        let mut table = if capacity_encoder.requires_indicators() {
            VariableTable::with_indicators(instance.n_tasks(), n_stations)
        } else {
            VariableTable::new(instance.n_tasks(), n_stations)
        };
        let mut clauses = vec![];
        AssignmentConstraintsEncoder.encode_constraints(instance, &table, &mut clauses);
        PrecedenceConstraintsEncoder.encode_constraints(instance, &table, &mut clauses);
        capacity_encoder.encode_constraints(instance, cycle_time, &mut table, &mut clauses)?;
        Ok(Self { table, clauses })
    }

    /// Returns the variable table.
    pub fn table(&self) -> &VariableTable {
        &self.table
    }

    /// Returns the base clauses.
    pub fn clauses(&self) -> &[Vec<Literal>] {
        &self.clauses
    }

    /// Returns the number of base clauses.
    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encodings::CapacityStrategy;
    use crate::line::Precedence;
    use strum::IntoEnumIterator;

    fn instance() -> Instance {
        Instance::new(
            vec![3, 2, 4, 1, 3],
            vec![
                Precedence::new(0, 1),
                Precedence::new(0, 2),
                Precedence::new(2, 4),
                Precedence::new(3, 4),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_idempotence() {
        for strategy in CapacityStrategy::iter() {
            let encoder = strategy.new_encoder(1_000_000);
            let e1 = Encoding::new(&instance(), 3, 6, encoder.as_ref()).unwrap();
            let e2 = Encoding::new(&instance(), 3, 6, encoder.as_ref()).unwrap();
            assert_eq!(e1, e2, "strategy {}", strategy);
        }
    }

    #[test]
    fn test_literals_in_range() {
        for strategy in CapacityStrategy::iter() {
            let encoder = strategy.new_encoder(1_000_000);
            let encoding = Encoding::new(&instance(), 3, 6, encoder.as_ref()).unwrap();
            let max_var = encoding.table().max_var();
            assert!(encoding
                .clauses()
                .iter()
                .flatten()
                .all(|l| (1..=max_var).contains(&usize::from(l.var()))));
            assert!(encoding.clauses().iter().all(|c| !c.is_empty()));
        }
    }

    #[test]
    fn test_indicators_follow_strategy() {
        let lazy = Encoding::new(&instance(), 2, 6, CapacityStrategy::Lazy.new_encoder(10).as_ref()).unwrap();
        assert!(lazy.table().has_indicators());
        let pb = Encoding::new(&instance(), 2, 6, CapacityStrategy::PseudoBoolean.new_encoder(10).as_ref()).unwrap();
        assert!(!pb.table().has_indicators());
    }
}
