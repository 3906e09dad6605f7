use super::{cli_manager, command::Command, common};
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::path::Path;
use ualbp_sat::{io::ReportWriter, solvers::StationCountSearch};

const CMD_NAME: &str = "solve";

const ARG_LOWER_BOUND: &str = "LOWER_BOUND";
const ARG_NAME: &str = "NAME";

pub(crate) struct SolveCommand;

impl SolveCommand {
    pub(crate) fn new() -> Self {
        SolveCommand
    }
}

impl<'a> Command<'a> for SolveCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Looks for the lowest station count admitting an assignment")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::cycle_time_arg(true))
            .arg(
                Arg::with_name(ARG_LOWER_BOUND)
                    .short("l")
                    .long("lower-bound")
                    .empty_values(false)
                    .multiple(false)
                    .help("the station count the search begins with (default: total duration over cycle time)")
                    .required(false),
            )
            .args(&common::strategy_args())
            .arg(
                Arg::with_name(ARG_NAME)
                    .long("name")
                    .empty_values(false)
                    .multiple(false)
                    .help("the instance name written in the report (default: <file name>-<cycle time>)")
                    .required(false),
            )
            .args(&common::external_sat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_file(file)?;
        let cycle_time = common::parse_cycle_time(arg_matches)?.unwrap();
        let lower_bound = common::parse_usize_arg(arg_matches, ARG_LOWER_BOUND)
            .context("while reading the lower bound")?
            .unwrap_or_else(|| instance.trivial_station_lower_bound(cycle_time));
        let config = common::create_solver_config(arg_matches)?;
        let solver_factory = common::create_sat_solver_factory(arg_matches)?;
        let search = StationCountSearch::new_with_sat_solver_factory(
            &instance,
            cycle_time,
            config,
            solver_factory,
        );
        let (solution, _) = search.search(lower_bound)?;
        info!("found a solution with {} station(s)", solution.n_stations());
        let name = match arg_matches.value_of(ARG_NAME) {
            Some(n) => n.to_string(),
            None => format!("{}-{}", file_name(file), cycle_time),
        };
        ReportWriter::default().write_solution(&mut std::io::stdout(), &name, &solution)
    }
}

fn file_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| file.to_string())
}
