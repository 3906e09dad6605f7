use super::{SolutionDecoder, SolveError};
use crate::{
    encodings::{CapacityConstraintsEncoder, Encoding},
    line::{Instance, Solution},
    sat::{Literal, SatSolverFactory, SolvingResult},
};
use anyhow::Result;
use log::{debug, info};

/// The terminal states of a refinement loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefinementOutcome {
    /// A solution respecting all the constraints was found.
    Done(Solution),
    /// The instance has no solution with this station count.
    Fail,
}

/// Statistics about a run of the refinement loop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefinementStats {
    /// The station count.
    pub n_stations: usize,
    /// The number of calls to the SAT solver.
    pub n_iterations: usize,
    /// The number of capacity cuts added.
    pub n_cuts: usize,
    /// The number of clauses of the base encoding.
    pub n_base_clauses: usize,
    /// The number of variables of the base encoding.
    pub n_vars: usize,
}

/// The counterexample-guided loop looking for a solution with a fixed station count.
///
/// The base encoding is built once. Each iteration builds a fresh SAT solver
/// fed with the base clauses and all the cuts found so far; the cuts of the capacity encoder
/// are computed from the model, and the loop stops when there is none left or when the problem becomes unsatisfiable.
pub struct RefinementLoop<'a> {
    instance: &'a Instance,
    cycle_time: usize,
    capacity_encoder: &'a dyn CapacityConstraintsEncoder,
    solver_factory: &'a dyn SatSolverFactory,
}

impl<'a> RefinementLoop<'a> {
    /// Builds a new refinement loop.
    pub fn new(
        instance: &'a Instance,
        cycle_time: usize,
        capacity_encoder: &'a dyn CapacityConstraintsEncoder,
        solver_factory: &'a dyn SatSolverFactory,
    ) -> Self {
        Self {
            instance,
            cycle_time,
            capacity_encoder,
            solver_factory,
        }
    }

    /// Runs the loop for the given station count.
    ///
    /// Errors are returned for failing SAT solvers and for the [`SolveError`] kinds
    /// that denote an encoding or an oracle defect.
    pub fn run(&self, n_stations: usize) -> Result<(RefinementOutcome, RefinementStats)> {
        let encoding = Encoding::new(
            self.instance,
            n_stations,
            self.cycle_time,
            self.capacity_encoder,
        )?;
        let mut stats = RefinementStats {
            n_stations,
            n_base_clauses: encoding.n_clauses(),
            n_vars: encoding.table().max_var(),
            ..Default::default()
        };
        debug!(
            "base encoding for {} stations has {} variables and {} clauses",
            n_stations, stats.n_vars, stats.n_base_clauses
        );
        let mut cuts: Vec<Vec<Literal>> = vec![];
        loop {
            stats.n_iterations += 1;
            let mut solver = self.solver_factory.new_solver();
            solver.reserve(encoding.table().max_var());
            encoding
                .clauses()
                .iter()
                .chain(cuts.iter())
                .for_each(|c| solver.add_clause(c.clone()));
            let model = match solver.solve()? {
                SolvingResult::Satisfiable(model) => model,
                SolvingResult::Unsatisfiable => {
                    info!(
                        "no solution with {} stations after {} iteration(s)",
                        n_stations, stats.n_iterations
                    );
                    return Ok((RefinementOutcome::Fail, stats));
                }
                SolvingResult::Unknown => return Err(SolveError::OracleUnknown { n_stations }.into()),
            };
            let new_cuts = self.capacity_encoder.capacity_cuts(
                self.instance,
                self.cycle_time,
                encoding.table(),
                &model,
            );
            if new_cuts.is_empty() {
                let solution =
                    SolutionDecoder.decode(self.instance, encoding.table(), &model)?;
                if let Some((station, load)) = solution
                    .overloaded_stations(self.instance, self.cycle_time)
                    .first()
                {
                    return Err(SolveError::CapacityViolated {
                        station: *station,
                        load: *load,
                        cycle_time: self.cycle_time,
                    }
                    .into());
                }
                info!(
                    "solution found with {} stations after {} iteration(s) and {} cut(s)",
                    n_stations, stats.n_iterations, stats.n_cuts
                );
                return Ok((RefinementOutcome::Done(solution), stats));
            }
            debug!(
                "iteration {}: {} overloaded station(s), adding cuts",
                stats.n_iterations,
                new_cuts.len()
            );
            stats.n_cuts += new_cuts.len();
            cuts.extend(new_cuts);
        }
    }
}
