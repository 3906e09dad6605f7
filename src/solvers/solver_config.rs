use crate::encodings::{CapacityStrategy, DEFAULT_EXHAUSTIVE_LIMIT};

/// The settings of the station search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverConfig {
    /// The strategy used to bound the load of the stations.
    pub strategy: CapacityStrategy,
    /// The maximal number of subsets the exhaustive strategy may enumerate per station.
    pub exhaustive_limit: usize,
}

impl SolverConfig {
    /// Builds a configuration using the given strategy and the default exhaustive limit.
    pub fn with_strategy(strategy: CapacityStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: CapacityStrategy::default(),
            exhaustive_limit: DEFAULT_EXHAUSTIVE_LIMIT,
        }
    }
}
