use crate::sat::{clause, Literal};

/// The clauses produced by a [`PseudoBooleanEncoder`], with the next variable it left free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbEncoding {
    /// The clauses of the encoding.
    pub clauses: Vec<Vec<Literal>>,
    /// The lowest variable the encoding did not use.
    pub next_free_var: usize,
}

/// The trait for encoders translating a weighted "at most" constraint into CNF.
pub trait PseudoBooleanEncoder {
    /// Encodes `sum(weights[i] * lits[i]) <= bound`.
    ///
    /// Auxiliary variables are taken from `first_free_var` onwards;
    /// the returned encoding gives the next variable left free, which is never lower than `first_free_var`.
    fn encode_at_most(
        &self,
        lits: &[Literal],
        weights: &[usize],
        bound: usize,
        first_free_var: usize,
    ) -> PbEncoding;
}

/// The sequential weight counter encoding of pseudo-boolean "at most" constraints.
///
/// For each kept literal `x_i` and each `j` in `[1, bound]`, an auxiliary variable `s(i,j)` is set
/// when the partial sum of the `i+1` first literals reaches `j`.
/// Literals with a null weight are ignored, and literals whose weight exceeds the bound are forced to false.
#[derive(Default)]
pub struct SequentialWeightCounter;

impl PseudoBooleanEncoder for SequentialWeightCounter {
    fn encode_at_most(
        &self,
        lits: &[Literal],
        weights: &[usize],
        bound: usize,
        first_free_var: usize,
    ) -> PbEncoding {
        assert_eq!(lits.len(), weights.len(), "one weight per literal is required");
        let mut clauses = vec![];
        let mut items = Vec::with_capacity(lits.len());
        for (lit, w) in lits.iter().zip(weights.iter()) {
            if *w == 0 {
                continue;
            }
            if *w > bound {
                clauses.push(vec![lit.negate()]);
            } else {
                items.push((*lit, *w));
            }
        }
        if items.iter().map(|(_, w)| w).sum::<usize>() <= bound {
            return PbEncoding {
                clauses,
                next_free_var: first_free_var,
            };
        }
        let s = |i: usize, j: usize| (first_free_var + i * bound + j - 1) as isize;
        for (i, (x, w)) in items.iter().enumerate() {
            let x = isize::from(*x);
            for j in 1..=*w {
                clauses.push(clause![-x, s(i, j)]);
            }
            if i == 0 {
                continue;
            }
            for j in 1..=bound {
                clauses.push(clause![-s(i - 1, j), s(i, j)]);
            }
            for j in 1..=bound - w {
                clauses.push(clause![-x, -s(i - 1, j), s(i, j + w)]);
            }
            clauses.push(clause![-x, -s(i - 1, bound + 1 - w)]);
        }
        PbEncoding {
            clauses,
            next_free_var: first_free_var + items.len() * bound,
        }
    }
}
