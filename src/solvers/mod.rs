//! Solvers looking for station assignments.

mod refinement_loop;
pub use refinement_loop::RefinementLoop;
pub use refinement_loop::RefinementOutcome;
pub use refinement_loop::RefinementStats;

mod solution_decoder;
pub use solution_decoder::SolutionDecoder;

mod solve_error;
pub use solve_error::SolveError;

mod solver_config;
pub use solver_config::SolverConfig;

mod station_count_search;
pub use station_count_search::StationCountSearch;
