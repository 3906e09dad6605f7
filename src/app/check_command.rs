use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::{info, warn};
use ualbp_sat::solvers::StationCountSearch;

const CMD_NAME: &str = "check";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks input instance files for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::cycle_time_arg(false))
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_file(file)?;
        info!(
            "instance has {} task(s) and {} precedence(s)",
            instance.n_tasks(),
            instance.n_precedences()
        );
        info!("total duration is {}", instance.total_duration());
        if let Some((task, duration)) = instance.longest_task() {
            info!("longest task is task {} with duration {}", task + 1, duration);
        }
        if instance.has_precedence_cycle() {
            warn!("the precedence graph has a cycle; no assignment can respect it");
        }
        if let Some(cycle_time) = common::parse_cycle_time(arg_matches)? {
            StationCountSearch::check_cycle_time(&instance, cycle_time)?;
            info!(
                "trivial lower bound for cycle time {} is {} station(s)",
                cycle_time,
                instance.trivial_station_lower_bound(cycle_time)
            );
        }
        Ok(())
    }
}
