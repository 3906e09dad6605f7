use super::VariableTable;
use crate::line::{Instance, Precedence};
use crate::sat::{clause, Literal};

/// An encoder for the direction-aware precedence constraints.
///
/// For an edge `(b, a)`, `b` forward at station `k` excludes `a` forward at any station `h <= k`,
/// `b` backward at `k` excludes `a` backward at any `h >= k`,
/// and `b` backward excludes `a` forward whatever their stations.
#[derive(Default)]
pub struct PrecedenceConstraintsEncoder;

impl PrecedenceConstraintsEncoder {
    /// Appends the precedence constraints of all the edges to a clause list.
    pub fn encode_constraints(
        &self,
        instance: &Instance,
        table: &VariableTable,
        clauses: &mut Vec<Vec<Literal>>,
    ) {
        instance
            .iter_precedences()
            .for_each(|p| Self::encode_edge_constraints(table, p, clauses));
    }

    fn encode_edge_constraints(table: &VariableTable, p: &Precedence, clauses: &mut Vec<Vec<Literal>>) {
        let (b, a) = (p.before(), p.after());
        let m = table.n_stations();
        for k in 0..m {
            for h in 0..m {
                if k >= h {
                    clauses.push(clause![
                        -(table.forward_var(b, k) as isize),
                        -(table.forward_var(a, h) as isize),
                    ]);
                }
                if k <= h {
                    clauses.push(clause![
                        -(table.backward_var(b, k) as isize),
                        -(table.backward_var(a, h) as isize),
                    ]);
                }
                clauses.push(clause![
                    -(table.backward_var(b, k) as isize),
                    -(table.forward_var(a, h) as isize),
                ]);
            }
        }
    }
}
