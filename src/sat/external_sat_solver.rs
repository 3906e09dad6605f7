use super::{
    buffered_sat_solver::{BufferedSatSolver, DimacsInstanceRead},
    sat_solver::{SolvingListener, SolvingListenerFactoryFn, SolvingResult},
    Literal, SatSolver, SatSolverFactory,
};
use anyhow::{anyhow, Context, Result};
use log::debug;
use std::{
    io::{Cursor, Read},
    process::{Command, Stdio},
};

/// A SAT solver which execution is made by a system command.
///
/// The system command is composed by an executable program, and a potential list of CLI arguments.
///
/// The SAT solver must read from the standard input (if it does not by default, this may be possible with the right CLI arguments).
/// The input and output formats must follow the ones from the SAT competitions.
pub struct ExternalSatSolver {
    buffered_sat_solver: BufferedSatSolver,
}

impl ExternalSatSolver {
    /// Builds a new external SAT solver.
    ///
    /// The `program` argument is the path to the software to execute.
    /// The `options` parameter is the CLI options to provide to the software under execution.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use ualbp_sat::sat::{ExternalSatSolver, Literal, SatSolver, SolvingResult};
    /// let mut solver = ExternalSatSolver::new(
    ///     "/home/me/my_solver".to_string(),
    ///     vec!["-i".to_string(), "/dev/stdin".to_string()],
    /// );
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(-2)]);
    /// solver.add_clause(vec![Literal::from(-1), Literal::from(2)]);
    /// assert!(matches!(solver.solve().unwrap(), SolvingResult::Satisfiable(_)));
    /// ```
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            buffered_sat_solver: BufferedSatSolver::new(Box::new(move |r| {
                exec_solver(r, &program, &options)
            })),
        }
    }
}

impl SatSolver for ExternalSatSolver {
    fn add_clause(&mut self, cl: Vec<Literal>) {
        self.buffered_sat_solver.add_clause(cl)
    }

    fn solve(&mut self) -> Result<SolvingResult> {
        self.buffered_sat_solver.solve()
    }

    fn n_vars(&self) -> usize {
        self.buffered_sat_solver.n_vars()
    }

    fn n_clauses(&self) -> usize {
        self.buffered_sat_solver.n_clauses()
    }

    fn add_listener(&mut self, listener: Box<dyn SolvingListener>) {
        self.buffered_sat_solver.add_listener(listener);
    }

    fn reserve(&mut self, new_max_id: usize) {
        self.buffered_sat_solver.reserve(new_max_id)
    }
}

fn exec_solver(
    mut reader: DimacsInstanceRead,
    program: &str,
    options: &[String],
) -> Result<Box<dyn Read>> {
    let mut child = Command::new(program)
        .args(options)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .with_context(|| format!(r#"while launching the external SAT solver "{}""#, program))?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| anyhow!("cannot open the standard input of the external SAT solver"))?;
    let input_writer =
        std::thread::spawn(move || std::io::copy(&mut reader, &mut stdin).map(|_| ()));
    let mut output = Vec::new();
    child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("cannot open the standard output of the external SAT solver"))?
        .read_to_end(&mut output)
        .context("while reading the output of the external SAT solver")?;
    child
        .wait()
        .context("while waiting for the external SAT solver")?;
    if let Ok(Err(e)) = input_writer.join() {
        debug!("the external SAT solver did not read the whole instance: {}", e);
    }
    Ok(Box::new(Cursor::new(output)))
}

/// A factory for [`ExternalSatSolver`] objects.
pub struct ExternalSatSolverFactory {
    program: String,
    options: Vec<String>,
    listener_factories: Vec<Box<SolvingListenerFactoryFn>>,
}

impl ExternalSatSolverFactory {
    /// Builds a new factory given the program to execute and its CLI options.
    pub fn new(program: String, options: Vec<String>) -> Self {
        Self {
            program,
            options,
            listener_factories: vec![],
        }
    }

    /// Registers a function building a listener for each new solver.
    pub fn add_solver_listener(&mut self, listener_factory: Box<SolvingListenerFactoryFn>) {
        self.listener_factories.push(listener_factory);
    }
}

impl SatSolverFactory for ExternalSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = ExternalSatSolver::new(self.program.clone(), self.options.clone());
        self.listener_factories
            .iter()
            .for_each(|f| solver.add_listener(f()));
        Box::new(solver)
    }
}
