use super::{RefinementLoop, RefinementOutcome, RefinementStats, SolveError, SolverConfig};
use crate::{
    line::{Instance, Solution},
    sat::{DefaultSatSolverFactory, SatSolverFactory},
};
use anyhow::Result;
use log::info;

/// A linear search over the station counts.
///
/// Starting from a lower bound, the refinement loop is run with increasing station counts
/// until a solution is found. One station per task is always enough when no task exceeds the cycle time,
/// so this precondition is checked before the search starts.
pub struct StationCountSearch<'a> {
    instance: &'a Instance,
    cycle_time: usize,
    config: SolverConfig,
    solver_factory: Box<dyn SatSolverFactory>,
}

impl<'a> StationCountSearch<'a> {
    /// Builds a new search using the default SAT solver.
    pub fn new(instance: &'a Instance, cycle_time: usize, config: SolverConfig) -> Self {
        Self::new_with_sat_solver_factory(
            instance,
            cycle_time,
            config,
            Box::<DefaultSatSolverFactory>::default(),
        )
    }

    /// Builds a new search.
    ///
    /// The SAT solvers are given by the solver factory.
    pub fn new_with_sat_solver_factory(
        instance: &'a Instance,
        cycle_time: usize,
        config: SolverConfig,
        solver_factory: Box<dyn SatSolverFactory>,
    ) -> Self {
        Self {
            instance,
            cycle_time,
            config,
            solver_factory,
        }
    }

    /// Checks that every task fits in a station.
    pub fn check_cycle_time(instance: &Instance, cycle_time: usize) -> Result<(), SolveError> {
        match instance.longest_task() {
            Some((task, duration)) if duration > cycle_time => {
                Err(SolveError::TaskExceedsCycleTime {
                    task,
                    duration,
                    cycle_time,
                })
            }
            _ => Ok(()),
        }
    }

    /// Returns the highest station count the search may reach.
    pub fn max_stations(&self) -> usize {
        usize::max(1, self.instance.n_tasks())
    }

    /// Searches the lowest station count admitting a solution, starting from `lower_bound`.
    ///
    /// A lower bound of zero is handled as one.
    pub fn search(&self, lower_bound: usize) -> Result<(Solution, Vec<RefinementStats>)> {
        Self::check_cycle_time(self.instance, self.cycle_time)?;
        let capacity_encoder = self.config.strategy.new_encoder(self.config.exhaustive_limit);
        let refinement_loop = RefinementLoop::new(
            self.instance,
            self.cycle_time,
            capacity_encoder.as_ref(),
            self.solver_factory.as_ref(),
        );
        let first = usize::max(1, lower_bound);
        let last = usize::max(first, self.max_stations());
        info!(
            "searching a solution with the {} strategy, from {} station(s)",
            self.config.strategy, first
        );
        let mut all_stats = vec![];
        for n_stations in first..=last {
            info!("trying {} station(s)", n_stations);
            let (outcome, stats) = refinement_loop.run(n_stations)?;
            info!(
                "{} station(s): {} iteration(s), {} cut(s), {} base clauses, {} variables",
                stats.n_stations, stats.n_iterations, stats.n_cuts, stats.n_base_clauses, stats.n_vars
            );
            all_stats.push(stats);
            if let RefinementOutcome::Done(solution) = outcome {
                return Ok((solution, all_stats));
            }
        }
        Err(SolveError::UnsatisfiableAtMaximum { n_stations: last }.into())
    }
}
