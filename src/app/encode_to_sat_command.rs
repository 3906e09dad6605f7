use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::{fs::File, io::BufWriter};
use ualbp_sat::{encodings::Encoding, sat::write_dimacs};

const CMD_NAME: &str = "encode-to-sat";

const ARG_STATIONS: &str = "STATIONS";
const ARG_OUT: &str = "ARG_OUT";

pub(crate) struct EncodeToSatCommand;

impl EncodeToSatCommand {
    pub(crate) fn new() -> Self {
        EncodeToSatCommand
    }
}

impl<'a> Command<'a> for EncodeToSatCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Writes the base SAT encoding of an instance for a station count")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(common::cycle_time_arg(true))
            .arg(
                Arg::with_name(ARG_STATIONS)
                    .short("k")
                    .long("stations")
                    .empty_values(false)
                    .multiple(false)
                    .help("the station count")
                    .required(true),
            )
            .args(&common::strategy_args())
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the output file for the encoding")
                    .required(false),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let instance = common::read_instance_file(file)?;
        let cycle_time = common::parse_cycle_time(arg_matches)?.unwrap();
        let n_stations = match common::parse_usize_arg(arg_matches, ARG_STATIONS)
            .context("while reading the station count")?
        {
            Some(0) | None => return Err(anyhow!("the station count must be positive")),
            Some(k) => k,
        };
        let config = common::create_solver_config(arg_matches)?;
        let capacity_encoder = config.strategy.new_encoder(config.exhaustive_limit);
        if !capacity_encoder.is_complete() {
            info!("the {} strategy adds its capacity constraints lazily; they are not part of the encoding", config.strategy);
        }
        let encoding = Encoding::new(&instance, n_stations, cycle_time, capacity_encoder.as_ref())?;
        info!(
            "the encoding has {} variables and {} clauses",
            encoding.table().max_var(),
            encoding.n_clauses()
        );
        match arg_matches.value_of(ARG_OUT) {
            Some(output_file) => {
                let mut writer = BufWriter::new(
                    File::create(output_file)
                        .with_context(|| format!(r#"while creating file "{}""#, output_file))?,
                );
                write_dimacs(&mut writer, encoding.table().max_var(), encoding.clauses())
            }
            None => write_dimacs(
                &mut std::io::stdout(),
                encoding.table().max_var(),
                encoding.clauses(),
            ),
        }
    }
}
