use super::SolveError;
use crate::{
    encodings::VariableTable,
    line::{Instance, Mode, Solution},
    sat::Model,
};

/// Translates the models of the assignment variables back into station assignments.
#[derive(Default)]
pub struct SolutionDecoder;

impl SolutionDecoder {
    /// Decodes a model into a solution.
    ///
    /// Each task must have exactly one true (station, mode) variable;
    /// otherwise a [`SolveError::DecodingInconsistency`] is returned.
    pub fn decode(
        &self,
        instance: &Instance,
        table: &VariableTable,
        model: &Model,
    ) -> Result<Solution, SolveError> {
        let mut solution = Solution::new(table.n_stations());
        for task in 0..instance.n_tasks() {
            let assignments = (0..table.n_stations())
                .flat_map(|k| [(k, Mode::Forward), (k, Mode::Backward)])
                .filter(|(k, mode)| model.is_true(table.mode_var(task, *k, *mode)))
                .collect::<Vec<_>>();
            match assignments.as_slice() {
                [(k, mode)] => solution.assign(task, *k, *mode),
                _ => {
                    return Err(SolveError::DecodingInconsistency {
                        task,
                        n_true: assignments.len(),
                    })
                }
            }
        }
        Ok(solution)
    }
}
