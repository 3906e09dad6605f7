pub(crate) mod app_helper;

mod authors_command;
pub(crate) use authors_command::AuthorsCommand;

mod batch_command;
pub(crate) use batch_command::BatchCommand;

mod check_command;
pub(crate) use check_command::CheckCommand;

pub(crate) mod cli_manager;

pub(crate) mod command;

pub(crate) mod common;

mod encode_to_sat_command;
pub(crate) use encode_to_sat_command::EncodeToSatCommand;

mod solve_command;
pub(crate) use solve_command::SolveCommand;

mod strategies_command;
pub(crate) use strategies_command::StrategiesCommand;

mod writable_string;
