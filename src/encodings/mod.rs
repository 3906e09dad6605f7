//! Objects used to encode UALBP instances into SAT.

mod assignment_constraints_encoder;
pub use assignment_constraints_encoder::AssignmentConstraintsEncoder;

mod encoding;
pub use encoding::Encoding;

mod exhaustive_capacity_encoder;
pub use exhaustive_capacity_encoder::ExhaustiveCapacityEncoder;
pub use exhaustive_capacity_encoder::DEFAULT_EXHAUSTIVE_LIMIT;

mod lazy_capacity_encoder;
pub use lazy_capacity_encoder::LazyCapacityEncoder;

mod precedence_constraints_encoder;
pub use precedence_constraints_encoder::PrecedenceConstraintsEncoder;

mod pseudo_boolean_capacity_encoder;
pub use pseudo_boolean_capacity_encoder::PseudoBooleanCapacityEncoder;

mod pseudo_boolean_encoder;
pub use pseudo_boolean_encoder::PbEncoding;
pub use pseudo_boolean_encoder::PseudoBooleanEncoder;
pub use pseudo_boolean_encoder::SequentialWeightCounter;

mod specs;
pub use specs::CapacityConstraintsEncoder;
pub use specs::CapacityStrategy;

mod variable_table;
pub use variable_table::VariableTable;
