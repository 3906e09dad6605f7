use super::VariableTable;
use crate::line::Instance;
use crate::sat::{clause, Literal};

/// An encoder forcing each task to be assigned to exactly one (station, mode) pair.
///
/// The at-most-one part uses explicit pairwise exclusion.
#[derive(Default)]
pub struct AssignmentConstraintsEncoder;

impl AssignmentConstraintsEncoder {
    /// Appends the assignment constraints of all the tasks to a clause list.
    pub fn encode_constraints(
        &self,
        instance: &Instance,
        table: &VariableTable,
        clauses: &mut Vec<Vec<Literal>>,
    ) {
        (0..instance.n_tasks()).for_each(|task| Self::encode_task_constraints(table, task, clauses));
    }

    fn encode_task_constraints(table: &VariableTable, task: usize, clauses: &mut Vec<Vec<Literal>>) {
        let m = table.n_stations();
        clauses.push(
            (0..m)
                .map(|k| Literal::positive(table.forward_var(task, k)))
                .chain((0..m).map(|k| Literal::positive(table.backward_var(task, k))))
                .collect(),
        );
        for k in 0..m {
            clauses.push(clause![
                -(table.forward_var(task, k) as isize),
                -(table.backward_var(task, k) as isize),
            ]);
        }
        for k1 in 0..m {
            for k2 in k1 + 1..m {
                clauses.push(clause![
                    -(table.forward_var(task, k1) as isize),
                    -(table.forward_var(task, k2) as isize),
                ]);
                clauses.push(clause![
                    -(table.backward_var(task, k1) as isize),
                    -(table.backward_var(task, k2) as isize),
                ]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sat::{default_solver, SolvingResult};

    #[test]
    fn test_clause_count() {
        let instance = Instance::new(vec![1, 1, 1], vec![]).unwrap();
        let table = VariableTable::new(3, 4);
        let mut clauses = vec![];
        AssignmentConstraintsEncoder.encode_constraints(&instance, &table, &mut clauses);
        // per task: 1 + m + 2 * m(m-1)/2
        assert_eq!(3 * (1 + 4 + 12), clauses.len());
        assert_eq!(8, clauses[0].len());
    }

    #[test]
    fn test_exactly_one_model() {
        let instance = Instance::new(vec![1, 1], vec![]).unwrap();
        let table = VariableTable::new(2, 3);
        let mut clauses = vec![];
        AssignmentConstraintsEncoder.encode_constraints(&instance, &table, &mut clauses);
        let mut solver = default_solver();
        clauses.into_iter().for_each(|c| solver.add_clause(c));
        match solver.solve().unwrap() {
            SolvingResult::Satisfiable(model) => {
                for task in 0..2 {
                    let n_true = (0..3)
                        .flat_map(|k| [table.forward_var(task, k), table.backward_var(task, k)])
                        .filter(|v| model.is_true(*v))
                        .count();
                    assert_eq!(1, n_true);
                }
            }
            _ => panic!(),
        }
    }

    #[test]
    fn test_two_assignments_forbidden() {
        let instance = Instance::new(vec![1], vec![]).unwrap();
        let table = VariableTable::new(1, 2);
        let mut clauses = vec![];
        AssignmentConstraintsEncoder.encode_constraints(&instance, &table, &mut clauses);
        let mut solver = default_solver();
        clauses.into_iter().for_each(|c| solver.add_clause(c));
        solver.add_clause(clause![table.forward_var(0, 0) as isize]);
        solver.add_clause(clause![table.backward_var(0, 1) as isize]);
        assert!(matches!(solver.solve().unwrap(), SolvingResult::Unsatisfiable));
    }
}
