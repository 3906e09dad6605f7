use super::{specs::encode_indicator_links, CapacityConstraintsEncoder, VariableTable};
use crate::{
    line::Instance,
    sat::{Literal, Model},
    solvers::SolveError,
};
use log::debug;

/// The default maximal number of subsets the exhaustive strategy may enumerate per station.
pub const DEFAULT_EXHAUSTIVE_LIMIT: usize = 1_000_000;

/// A capacity strategy forbidding upfront every subset of tasks that overloads a station.
///
/// Subsets are enumerated in increasing task order; as soon as the load of a subset exceeds the cycle time,
/// a clause forbidding the indicators of this subset is emitted and its supersets are not enumerated.
/// The enumeration is exponential, so it is refused when the estimated number of subsets exceeds a limit.
pub struct ExhaustiveCapacityEncoder {
    limit: usize,
}

impl ExhaustiveCapacityEncoder {
    /// Builds an encoder refusing to enumerate more than `limit` subsets per station.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }

    /// Estimates the number of subsets enumerated per station.
    ///
    /// If at most `t` tasks fit in a station, the enumeration visits subsets of size at most `t+1`.
    /// The result saturates at [`usize::MAX`].
    pub fn estimate_subsets(instance: &Instance, cycle_time: usize) -> usize {
        let mut durations = instance.durations().to_vec();
        durations.sort_unstable();
        let mut load = 0;
        let max_fitting = durations
            .iter()
            .take_while(|d| {
                load += **d;
                load <= cycle_time
            })
            .count();
        let n = instance.n_tasks();
        let mut binomial: usize = 1;
        let mut total: usize = 0;
        for j in 1..=usize::min(max_fitting + 1, n) {
            binomial = match binomial.checked_mul(n - j + 1) {
                Some(b) => b / j,
                None => return usize::MAX,
            };
            total = total.saturating_add(binomial);
        }
        total
    }

    fn overloading_subsets(instance: &Instance, cycle_time: usize) -> Vec<Vec<usize>> {
        let mut subsets = vec![];
        let mut current = vec![];
        Self::enumerate_from(instance, cycle_time, 0, 0, &mut current, &mut subsets);
        subsets
    }

    fn enumerate_from(
        instance: &Instance,
        cycle_time: usize,
        first_task: usize,
        load: usize,
        current: &mut Vec<usize>,
        subsets: &mut Vec<Vec<usize>>,
    ) {
        for task in first_task..instance.n_tasks() {
            let new_load = load + instance.duration(task);
            current.push(task);
            if new_load > cycle_time {
                subsets.push(current.clone());
            } else {
                Self::enumerate_from(instance, cycle_time, task + 1, new_load, current, subsets);
            }
            current.pop();
        }
    }
}

impl Default for ExhaustiveCapacityEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_EXHAUSTIVE_LIMIT)
    }
}

impl CapacityConstraintsEncoder for ExhaustiveCapacityEncoder {
    fn requires_indicators(&self) -> bool {
        true
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
        let estimate = Self::estimate_subsets(instance, cycle_time);
        if estimate > self.limit {
            return Err(SolveError::ExhaustiveEncodingTooLarge {
                estimate,
                limit: self.limit,
            });
        }
        encode_indicator_links(instance, table, clauses);
        let subsets = Self::overloading_subsets(instance, cycle_time);
        debug!(
            "{} overloading subsets found for each of the {} stations",
            subsets.len(),
            table.n_stations()
        );
        for station in 0..table.n_stations() {
            clauses.extend(subsets.iter().map(|subset| {
                subset
                    .iter()
                    .map(|t| Literal::negative(table.indicator_var(*t, station)))
                    .collect::<Vec<Literal>>()
            }));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overloading_subsets() {
        let instance = Instance::new(vec![3, 3, 3, 3], vec![]).unwrap();
        let subsets = ExhaustiveCapacityEncoder::overloading_subsets(&instance, 6);
        // every triple, each given by its first overloading prefix
        assert_eq!(
            vec![
                vec![0, 1, 2],
                vec![0, 1, 3],
                vec![0, 2, 3],
                vec![1, 2, 3]
            ],
            subsets
        );
    }

    #[test]
    fn test_single_task_overload() {
        let instance = Instance::new(vec![2, 7, 1], vec![]).unwrap();
        let subsets = ExhaustiveCapacityEncoder::overloading_subsets(&instance, 5);
        assert_eq!(vec![vec![0, 1], vec![1]], subsets);
    }

    #[test]
    fn test_clauses() {
        let instance = Instance::new(vec![3, 3, 3, 3], vec![]).unwrap();
        let mut table = VariableTable::with_indicators(4, 2);
        let mut clauses = vec![];
        ExhaustiveCapacityEncoder::default()
            .encode_constraints(&instance, 6, &mut table, &mut clauses)
            .unwrap();
        assert_eq!(4 * 2 * 3 + 2 * 4, clauses.len());
        assert_eq!(
            vec![
                Literal::negative(table.indicator_var(1, 1)),
                Literal::negative(table.indicator_var(2, 1)),
                Literal::negative(table.indicator_var(3, 1)),
            ],
            clauses[clauses.len() - 1]
        );
        assert_eq!(25, table.watermark());
    }

    #[test]
    fn test_estimate() {
        let instance = Instance::new(vec![3, 3, 3, 3], vec![]).unwrap();
        // two tasks fit: C(4,1) + C(4,2) + C(4,3)
        assert_eq!(4 + 6 + 4, ExhaustiveCapacityEncoder::estimate_subsets(&instance, 6));
        assert_eq!(15, ExhaustiveCapacityEncoder::estimate_subsets(&instance, 100));
    }

    #[test]
    fn test_estimate_saturates() {
        let instance = Instance::new(vec![1; 200], vec![]).unwrap();
        assert_eq!(usize::MAX, ExhaustiveCapacityEncoder::estimate_subsets(&instance, 150));
    }

    #[test]
    fn test_limit() {
        let instance = Instance::new(vec![1; 30], vec![]).unwrap();
        let mut table = VariableTable::with_indicators(30, 2);
        let mut clauses = vec![];
        let err = ExhaustiveCapacityEncoder::new(1000)
            .encode_constraints(&instance, 10, &mut table, &mut clauses)
            .unwrap_err();
        assert!(matches!(err, SolveError::ExhaustiveEncodingTooLarge { limit: 1000, .. }));
        assert!(clauses.is_empty());
    }

    #[test]
    fn test_no_cut() {
        let instance = Instance::new(vec![3], vec![]).unwrap();
        let table = VariableTable::with_indicators(1, 1);
        let model = Model::new(vec![Some(true); 3]);
        assert!(ExhaustiveCapacityEncoder::default()
            .capacity_cuts(&instance, 1, &table, &model)
            .is_empty());
    }
}
