use super::{cli_manager, command::Command};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use strum::IntoEnumIterator;
use ualbp_sat::encodings::CapacityStrategy;

const CMD_NAME: &str = "strategies";

pub(crate) struct StrategiesCommand;

impl StrategiesCommand {
    pub(crate) fn new() -> Self {
        StrategiesCommand
    }
}

impl<'a> Command<'a> for StrategiesCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Displays the available capacity strategies")
            .setting(AppSettings::DisableVersion)
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, _arg_matches: &ArgMatches<'_>) -> Result<()> {
        CapacityStrategy::iter().for_each(|s| {
            let default_mark = if s == CapacityStrategy::default() {
                " (default)"
            } else {
                ""
            };
            println!("{}{}", s, default_mark)
        });
        Ok(())
    }
}
