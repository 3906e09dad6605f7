//! The assembly line model: tasks, precedences, traversal modes and station assignments.

mod instance;
pub use instance::Instance;
pub use instance::Precedence;

mod solution;
pub use solution::Mode;
pub use solution::Solution;
