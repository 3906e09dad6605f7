use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Literal, Model, SatSolver,
};
use anyhow::Result;
use cadical::Solver as CadicalCSolver;

/// A wrapper around the CaDiCaL SAT solver.
#[derive(Default)]
pub struct CadicalSolver {
    solver: CadicalCSolver,
    n_vars: usize,
    n_clauses: usize,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl SatSolver for CadicalSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.n_vars = cl
            .iter()
            .map(|l| usize::from(l.var()))
            .fold(self.n_vars, usize::max);
        self.solver
            .add_clause(cl.into_iter().map(|l| isize::from(l) as i32));
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> Result<SolvingResult> {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let solving_result = match self.solver.solve() {
            Some(true) => {
                let max_known_var = self.solver.max_variable() as usize;
                let values = (1..=self.n_vars)
                    .map(|i| {
                        if i <= max_known_var {
                            self.solver.value(i as i32)
                        } else {
                            None
                        }
                    })
                    .collect();
                SolvingResult::Satisfiable(Model::new(values))
            }
            Some(false) => SolvingResult::Unsatisfiable,
            None => SolvingResult::Unknown,
        };
        self.listeners
            .iter()
            .for_each(|l| l.solving_end(&solving_result));
        Ok(solving_result)
    }

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn n_clauses(&self) -> usize {
        self.n_clauses
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.listeners.push(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.n_vars = usize::max(self.n_vars, new_max_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::clause;

    fn unwrap_model(result: SolvingResult) -> Option<Model> {
        match result {
            SolvingResult::Satisfiable(m) => Some(m),
            SolvingResult::Unsatisfiable => None,
            SolvingResult::Unknown => panic!("unexpected unknown result"),
        }
    }

    #[test]
    fn test_sat() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![-1, 2]);
        let model = unwrap_model(s.solve().unwrap()).unwrap();
        assert!(model.value_of(1usize) == Some(false) || model.value_of(2usize) == Some(true))
    }

    #[test]
    fn test_unsat() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![-1, 2]);
        s.add_clause(clause![-1, -2]);
        s.add_clause(clause![1]);
        assert!(unwrap_model(s.solve().unwrap()).is_none());
    }

    #[test]
    fn test_reserved_vars_are_part_of_the_model() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![1]);
        s.reserve(5);
        assert_eq!(5, s.n_vars());
        let model = unwrap_model(s.solve().unwrap()).unwrap();
        assert_eq!(5, model.n_vars());
        assert!(model.is_true(1));
        assert!(!model.is_true(5));
    }

    #[test]
    fn test_counts() {
        let mut s = CadicalSolver::default();
        s.add_clause(clause![1, -3]);
        s.add_clause(clause![2]);
        assert_eq!(3, s.n_vars());
        assert_eq!(2, s.n_clauses());
    }
}
