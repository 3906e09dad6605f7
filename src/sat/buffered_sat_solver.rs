use super::{
    sat_solver::{SolvingListener, SolvingResult},
    Literal, Model, SatSolver,
};
use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Cursor, Read, Write};

/// The type of the functions in charge of the actual solving for a [`BufferedSatSolver`].
///
/// The function takes the DIMACS instance as a reader and returns a reader to the solver output,
/// which must follow the SAT competition output format.
pub type SolvingFn = dyn Fn(DimacsInstanceRead) -> Result<Box<dyn Read>>;

/// A reader over a DIMACS instance stored by a [`BufferedSatSolver`].
pub struct DimacsInstanceRead {
    preamble: Cursor<String>,
    clauses: Cursor<String>,
}

impl Read for DimacsInstanceRead {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let r = self.preamble.read(buf)?;
        if r > 0 {
            return Ok(r);
        }
        self.clauses.read(buf)
    }
}

const DEFAULT_BUFFER_CAP: usize = 1 << 20;

/// Writes a CNF formula in the DIMACS format.
pub fn write_dimacs(writer: &mut dyn Write, n_vars: usize, clauses: &[Vec<Literal>]) -> Result<()> {
    let context = "while writing a DIMACS formula";
    writeln!(writer, "p cnf {} {}", n_vars, clauses.len()).context(context)?;
    for cl in clauses {
        writeln!(writer, "{}", clause_to_dimacs_line(cl)).context(context)?;
    }
    writer.flush().context(context)
}

fn clause_to_dimacs_line(cl: &[Literal]) -> String {
    let mut line = cl.iter().fold(String::new(), |mut acc, l| {
        acc.push_str(&l.to_string());
        acc.push(' ');
        acc
    });
    line.push('0');
    line
}

/// A SAT solver that stores the clauses in the DIMACS format and delegates the solving to a function.
///
/// The solving function is given the whole DIMACS instance each time [`solve`](SatSolver::solve) is called.
pub struct BufferedSatSolver {
    n_vars: usize,
    n_clauses: usize,
    clauses: String,
    solving_fn: Box<SolvingFn>,
    listeners: Vec<Box<dyn SolvingListener>>,
}

impl BufferedSatSolver {
    /// Builds a new buffered solver given the solving function.
    pub fn new(solving_fn: Box<SolvingFn>) -> Self {
        Self {
            n_vars: 0,
            n_clauses: 0,
            clauses: String::with_capacity(DEFAULT_BUFFER_CAP),
            solving_fn,
            listeners: Vec::new(),
        }
    }

    fn read_solver_output(&self, solver_output: Box<dyn Read>) -> Result<SolvingResult> {
        let solver_output = BufReader::new(solver_output);
        let mut status = None;
        let mut values = vec![None; self.n_vars];
        let mut value_line_seen = false;
        let mut value_line_end = false;
        for (i, line) in solver_output.lines().enumerate() {
            let context = || format!("while reading line with index {} of the solver output", i);
            let line = line.with_context(context)?;
            if line == "s SATISFIABLE" || line == "s UNSATISFIABLE" {
                if status.is_some() {
                    return Err(anyhow!("multiple status lines")).with_context(context);
                }
                status = Some(line == "s SATISFIABLE");
            } else if line.starts_with("v ") {
                value_line_seen = true;
                for w in line.split_ascii_whitespace().skip(1) {
                    let n = w
                        .parse::<isize>()
                        .map_err(|_| anyhow!(r#""{}" is not a literal"#, w))
                        .with_context(context)?;
                    if n == 0 {
                        if value_line_end {
                            return Err(anyhow!("multiple zeroes on value lines"))
                                .with_context(context);
                        }
                        value_line_end = true;
                        continue;
                    }
                    let v = n.unsigned_abs() - 1;
                    if v >= self.n_vars {
                        return Err(anyhow!("a variable in value line is out of bounds"))
                            .with_context(context);
                    }
                    values[v] = Some(n > 0);
                }
            } else if !line.starts_with("c ") && line != "c" && line != "v" && !line.is_empty() {
                return Err(anyhow!(r#"unexpected line "{}""#, line)).with_context(context);
            }
        }
        Ok(match status {
            Some(true) if value_line_seen => SolvingResult::Satisfiable(Model::new(values)),
            Some(true) | None => SolvingResult::Unknown,
            Some(false) => SolvingResult::Unsatisfiable,
        })
    }
}

impl SatSolver for BufferedSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.n_vars = cl
            .iter()
            .map(|l| usize::from(l.var()))
            .fold(self.n_vars, usize::max);
        self.clauses.push_str(&clause_to_dimacs_line(&cl));
        self.clauses.push('\n');
        self.n_clauses += 1;
    }

    fn solve(&mut self) -> Result<SolvingResult> {
        self.listeners
            .iter()
            .for_each(|l| l.solving_start(self.n_vars, self.n_clauses));
        let instance_reader = DimacsInstanceRead {
            preamble: Cursor::new(format!("p cnf {} {}\n", self.n_vars, self.n_clauses)),
            clauses: Cursor::new(self.clauses.clone()),
        };
        let solver_output = (self.solving_fn)(instance_reader)?;
        let solving_result = self
            .read_solver_output(solver_output)
            .context("while reading the output of the SAT solver")?;
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

    fn input_check_solving_fn(expected_input: &'static str) -> Box<SolvingFn> {
        Box::new(move |mut r| {
            let mut buffer = String::new();
            r.read_to_string(&mut buffer).unwrap();
            assert_eq!(expected_input, buffer);
            Ok(Box::new(&[] as &[u8]) as Box<dyn Read>)
        })
    }

    fn fake_output_solving_fn(output: &'static str) -> Box<SolvingFn> {
        Box::new(move |_| Ok(Box::new(output.as_bytes()) as Box<dyn Read>))
    }

    #[test]
    fn test_input_ok() {
        let expected = "p cnf 4 2\n1 2 0\n-1 -2 0\n";
        let mut s = BufferedSatSolver::new(input_check_solving_fn(expected));
        s.add_clause(clause![1, 2]);
        s.add_clause(clause![-1, -2]);
        s.reserve(4);
        assert_eq!(SolvingResult::Unknown, s.solve().unwrap());
    }

    #[test]
    fn test_output_sat_ok() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\nv -1 2 0\n"));
        s.add_clause(clause![-1, 2]);
        match s.solve().unwrap() {
            SolvingResult::Satisfiable(model) => {
                assert_eq!(Some(false), model.value_of(1usize));
                assert_eq!(Some(true), model.value_of(2usize));
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_output_sat_multiple_v_lines() {
        let solver_output = "c comment\ns SATISFIABLE\nv 1\nv\nv 2\nv 0\n";
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(solver_output));
        s.add_clause(clause![1, 2]);
        match s.solve().unwrap() {
            SolvingResult::Satisfiable(model) => {
                assert!(model.is_true(1));
                assert!(model.is_true(2));
            }
            r => panic!("unexpected result {:?}", r),
        }
    }

    #[test]
    fn test_output_sat_no_v_line() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\n"));
        s.add_clause(clause![1, 2]);
        assert_eq!(SolvingResult::Unknown, s.solve().unwrap());
    }

    #[test]
    fn test_output_unsat() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("c\ns UNSATISFIABLE\n"));
        s.add_clause(clause![1]);
        s.add_clause(clause![-1]);
        assert_eq!(SolvingResult::Unsatisfiable, s.solve().unwrap());
    }

    #[test]
    fn test_output_var_out_of_bounds() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\nv 1 2 3 0\n"));
        s.add_clause(clause![1, 2]);
        assert!(s.solve().is_err());
    }

    #[test]
    fn test_output_not_a_literal() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("s SATISFIABLE\nv 1 foo 0\n"));
        s.add_clause(clause![1, 2]);
        assert!(s.solve().is_err());
    }

    #[test]
    fn test_output_multiple_status_lines() {
        let solver_output = "s SATISFIABLE\ns SATISFIABLE\nv 1 2 0\n";
        let mut s = BufferedSatSolver::new(fake_output_solving_fn(solver_output));
        s.add_clause(clause![1, 2]);
        assert!(s.solve().is_err());
    }

    #[test]
    fn test_output_unexpected_line() {
        let mut s = BufferedSatSolver::new(fake_output_solving_fn("foo\ns UNSATISFIABLE\n"));
        s.add_clause(clause![1, 2]);
        assert!(s.solve().is_err());
    }

    #[test]
    fn test_write_dimacs() {
        let mut buffer = Vec::new();
        write_dimacs(&mut buffer, 3, &[clause![1, -3], clause![2]]).unwrap();
        assert_eq!(
            "p cnf 3 2\n1 -3 0\n2 0\n",
            String::from_utf8(buffer).unwrap()
        );
    }
}
