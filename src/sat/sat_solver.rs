use super::cadical_solver::CadicalSolver;
use anyhow::Result;
use std::{
    fmt::Display,
    num::{NonZeroIsize, NonZeroUsize},
};

/// A variable in a SAT solver.
///
/// A variable is represented by a non-null positive integer.
/// It can be obtained through the [From] trait from an unsigned integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable(NonZeroUsize);

macro_rules! impl_var_from {
    ($t: ty) => {
        impl From<$t> for Variable {
            fn from(v: $t) -> Self {
                match NonZeroUsize::new(v as usize) {
                    Some(n) => Self(n),
                    None => panic!("cannot build a variable from zero"),
                }
            }
        }
    };
}
impl_var_from!(usize);
impl_var_from!(u64);
impl_var_from!(u32);

impl From<Variable> for usize {
    fn from(v: Variable) -> Self {
        v.0.into()
    }
}

/// A literal in a SAT solver.
///
/// A literal is represented by a non-null integer: positive literals assert their variable, negative ones deny it.
/// It can be obtained through the [From] trait from a signed integer type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(NonZeroIsize);

impl Literal {
    /// Builds the positive literal of a variable given by its index.
    pub fn positive(var: usize) -> Self {
        Self::from(var as isize)
    }

    /// Builds the negative literal of a variable given by its index.
    pub fn negative(var: usize) -> Self {
        Self::from(-(var as isize))
    }

    /// Returns the opposite literal.
    pub fn negate(self) -> Self {
        Self::from(-self.0.get())
    }

    /// Returns the underlying variable.
    pub fn var(&self) -> Variable {
        Variable(self.0.unsigned_abs())
    }

    /// Returns `true` iff this literal asserts its variable.
    pub fn is_positive(&self) -> bool {
        self.0.get() > 0
    }
}

macro_rules! impl_lit_from {
    ($t: ty) => {
        impl From<$t> for Literal {
            fn from(l: $t) -> Self {
                match NonZeroIsize::new(l as isize) {
                    Some(n) => Self(n),
                    None => panic!("cannot build a literal from zero"),
                }
            }
        }
    };
}
impl_lit_from!(isize);
impl_lit_from!(i64);
impl_lit_from!(i32);

impl From<Literal> for isize {
    fn from(l: Literal) -> Self {
        l.0.into()
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a clause from a list of signed integers.
macro_rules! clause {
    () => (
        vec![] as Vec<$crate::sat::Literal>
    );
    ($($x:expr),+ $(,)?) => (
        [$($x),+].into_iter().map($crate::sat::Literal::from).collect::<Vec<$crate::sat::Literal>>()
    );
}
pub(crate) use clause;

/// A model returned by a SAT solver.
///
/// Variables the solver never saw (or left unassigned) have no value;
/// this is the reason why accessors return an [Option<bool>].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model(Vec<Option<bool>>);

impl Model {
    pub(crate) fn new(values: Vec<Option<bool>>) -> Self {
        Self(values)
    }

    /// Returns the value potentially assigned to the variable.
    ///
    /// Variables beyond the ones known by the solver are reported as unassigned.
    pub fn value_of<T>(&self, v: T) -> Option<bool>
    where
        T: Into<Variable>,
    {
        self.0.get(usize::from(v.into()) - 1).copied().flatten()
    }

    /// Returns `true` iff the variable is assigned to `true`.
    pub fn is_true(&self, var: usize) -> bool {
        self.value_of(var) == Some(true)
    }

    /// Returns the number of variables this model gives a (potentially empty) value to.
    pub fn n_vars(&self) -> usize {
        self.0.len()
    }
}

/// The result of a call to a SAT solver.
#[derive(Debug, PartialEq, Eq)]
pub enum SolvingResult {
    /// The problem is satisfiable; the model is attached.
    Satisfiable(Model),
    /// The problem is unsatisfiable.
    Unsatisfiable,
    /// The solver gave up.
    Unknown,
}

impl SolvingResult {
    /// Returns a short string describing the kind of result.
    pub fn as_str(&self) -> &'static str {
        match self {
            SolvingResult::Satisfiable(_) => "SAT",
            SolvingResult::Unsatisfiable => "UNSAT",
            SolvingResult::Unknown => "UNKNOWN",
        }
    }
}

/// A trait for objects that want to be notified about SAT solver calls.
pub trait SolvingListener {
    /// Called just before the solver is launched.
    fn solving_start(&self, n_vars: usize, n_clauses: usize);

    /// Called just after the solver returned.
    fn solving_end(&self, result: &SolvingResult);
}

/// The type of the functions building [`SolvingListener`] objects for each new solver.
pub type SolvingListenerFactoryFn = dyn Fn() -> Box<dyn SolvingListener>;

/// A trait for SAT solvers.
///
/// The solvers are used as oracles: clauses are added, then `solve` is called.
pub trait SatSolver {
    /// Adds a clause to this solver.
    fn add_clause(&mut self, cl: Vec<Literal>);

    /// Solves the problem formed by the clauses added so far.
    ///
    /// Errors are reserved to failures of the solver itself (I/O with an external process, malformed output...);
    /// a solver giving up returns [`SolvingResult::Unknown`].
    fn solve(&mut self) -> Result<SolvingResult>;

    /// Returns the number of variables declared in this solver.
    fn n_vars(&self) -> usize;

    /// Returns the number of clauses added to this solver.
    fn n_clauses(&self) -> usize;

    /// Adds a listener, notified each time [`solve`](Self::solve) is called.
    fn add_listener(&mut self, listener: Box<dyn SolvingListener>);

    /// Declares the variables up to `new_max_id`, even if they do not appear in any clause.
    fn reserve(&mut self, new_max_id: usize);
}

/// A trait for objects building new SAT solvers.
///
/// Solvers are never reused: each solving step asks the factory for a fresh one.
pub trait SatSolverFactory {
    /// Builds a new SAT solver.
    fn new_solver(&self) -> Box<dyn SatSolver>;
}

/// A factory for the default SAT solver (CaDiCaL).
#[derive(Default)]
pub struct DefaultSatSolverFactory {
    listener_factories: Vec<Box<SolvingListenerFactoryFn>>,
}

impl DefaultSatSolverFactory {
    /// Registers a function building a listener for each new solver.
    pub fn add_solver_listener(&mut self, listener_factory: Box<SolvingListenerFactoryFn>) {
        self.listener_factories.push(listener_factory);
    }
}

impl SatSolverFactory for DefaultSatSolverFactory {
    fn new_solver(&self) -> Box<dyn SatSolver> {
        let mut solver = default_solver();
        self.listener_factories
            .iter()
            .for_each(|f| solver.add_listener(f()));
        solver
    }
}

/// The default SAT solver (CaDiCaL).
pub fn default_solver() -> Box<dyn SatSolver> {
    Box::<CadicalSolver>::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[test]
    fn test_var_from_pos() {
        let v = Variable::from(1usize);
        assert_eq!(1, usize::from(v))
    }

    #[test]
    #[should_panic(expected = "cannot build a variable from zero")]
    fn test_var_from_null() {
        let _ = Variable::from(0usize);
    }

    #[test]
    fn test_lit_from_neg() {
        let l = Literal::from(-3);
        assert_eq!(-3, isize::from(l));
        assert_eq!(3, usize::from(l.var()));
        assert!(!l.is_positive());
    }

    #[test]
    #[should_panic(expected = "cannot build a literal from zero")]
    fn test_lit_from_null() {
        let _ = Literal::from(0);
    }

    #[test]
    fn test_negate_lit() {
        assert_eq!(Literal::from(-1), Literal::from(1).negate());
        assert_eq!(Literal::negative(4), Literal::positive(4).negate());
    }

    #[test]
    fn test_clause_macro() {
        assert_eq!(
            vec![Literal::from(1), Literal::from(-2)],
            clause![1, -2]
        );
        assert!(clause![].is_empty());
    }

    #[test]
    fn test_model_out_of_bounds_is_unassigned() {
        let model = Model::new(vec![Some(true), None, Some(false)]);
        assert!(model.is_true(1));
        assert_eq!(None, model.value_of(2usize));
        assert_eq!(Some(false), model.value_of(3usize));
        assert_eq!(None, model.value_of(4usize));
        assert!(!model.is_true(4));
    }

    struct CountingListener(Rc<RefCell<(usize, usize)>>);

    impl SolvingListener for CountingListener {
        fn solving_start(&self, _n_vars: usize, _n_clauses: usize) {
            self.0.borrow_mut().0 += 1;
        }

        fn solving_end(&self, _result: &SolvingResult) {
            self.0.borrow_mut().1 += 1;
        }
    }

    #[test]
    fn test_factory_attaches_listeners() {
        let counters = Rc::new(RefCell::new((0, 0)));
        let mut factory = DefaultSatSolverFactory::default();
        let cl = Rc::clone(&counters);
        factory.add_solver_listener(Box::new(move || {
            Box::new(CountingListener(Rc::clone(&cl))) as Box<dyn SolvingListener>
        }));
        let mut solver = factory.new_solver();
        solver.add_clause(clause![1]);
        solver.solve().unwrap();
        let mut other = factory.new_solver();
        other.solve().unwrap();
        assert_eq!((2, 2), *counters.borrow());
    }
}
