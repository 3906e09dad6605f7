use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
    time::Duration,
};
use ualbp_sat::{
    batch::{BatchConfig, BatchRunner},
    io::BatchDescriptorReader,
};

const CMD_NAME: &str = "batch";

const ARG_DATASET_DIR: &str = "DATASET_DIR";
const ARG_START_ROW: &str = "START_ROW";
const ARG_END_ROW: &str = "END_ROW";
const ARG_TIMEOUT: &str = "TIMEOUT";
const ARG_SUMMARY: &str = "SUMMARY";
const ARG_REPORT: &str = "REPORT";
const ARG_PROGRESS_INTERVAL: &str = "PROGRESS_INTERVAL";

pub(crate) struct BatchCommand;

impl BatchCommand {
    pub(crate) fn new() -> Self {
        BatchCommand
    }
}

impl<'a> Command<'a> for BatchCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Solves the instances listed in a batch descriptor, each one under a deadline")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args().help("the batch descriptor (CSV with name and lb columns)"))
            .arg(
                Arg::with_name(ARG_DATASET_DIR)
                    .long("dataset-dir")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("dataset")
                    .help("the directory containing the instance files"),
            )
            .arg(
                Arg::with_name(ARG_START_ROW)
                    .long("start-row")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("1")
                    .help("the first row to process (1-based)"),
            )
            .arg(
                Arg::with_name(ARG_END_ROW)
                    .long("end-row")
                    .empty_values(false)
                    .multiple(false)
                    .help("the last row to process (1-based, inclusive; default: last row)"),
            )
            .arg(
                Arg::with_name(ARG_TIMEOUT)
                    .long("timeout")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("900")
                    .help("the wall-clock deadline of each instance, in seconds"),
            )
            .arg(
                Arg::with_name(ARG_SUMMARY)
                    .long("summary")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("results.csv")
                    .help("the summary CSV file"),
            )
            .arg(
                Arg::with_name(ARG_REPORT)
                    .long("report")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("results.txt")
                    .help("the report file"),
            )
            .arg(
                Arg::with_name(ARG_PROGRESS_INTERVAL)
                    .long("progress-interval")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("60")
                    .help("the interval between two progress logs, in seconds (0 to disable)"),
            )
            .args(&common::strategy_args())
            .args(&common::external_sat_solver_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        let descriptor_path = common::canonicalize_file_path(file)?;
        info!("reading batch descriptor {:?}", descriptor_path);
        let rows = BatchDescriptorReader::default()
            .read(&mut BufReader::new(File::open(&descriptor_path)?))
            .with_context(|| format!("while reading {:?}", descriptor_path))?;
        let usize_arg = |name: &str, what: &str| {
            common::parse_usize_arg(arg_matches, name)
                .with_context(|| format!("while reading the {}", what))
        };
        let start_row = usize_arg(ARG_START_ROW, "start row")?.unwrap_or(1);
        if start_row == 0 {
            return Err(anyhow!("rows are numbered from 1"));
        }
        let config = BatchConfig {
            dataset_dir: PathBuf::from(arg_matches.value_of(ARG_DATASET_DIR).unwrap()),
            start_row,
            end_row: usize_arg(ARG_END_ROW, "end row")?,
            timeout: Duration::from_secs(usize_arg(ARG_TIMEOUT, "timeout")?.unwrap_or(900) as u64),
            progress_interval: Duration::from_secs(
                usize_arg(ARG_PROGRESS_INTERVAL, "progress interval")?.unwrap_or(60) as u64,
            ),
            solver_config: common::create_solver_config(arg_matches)?,
            worker_program: std::env::current_exe()
                .context("while looking for the path of the current executable")?,
            extra_worker_args: common::external_sat_solver_cli_args(arg_matches)?,
        };
        let summary_path = arg_matches.value_of(ARG_SUMMARY).unwrap();
        let report_path = arg_matches.value_of(ARG_REPORT).unwrap();
        let mut summary = BufWriter::new(
            File::create(summary_path)
                .with_context(|| format!(r#"while creating file "{}""#, summary_path))?,
        );
        let mut report = BufWriter::new(
            File::create(report_path)
                .with_context(|| format!(r#"while creating file "{}""#, report_path))?,
        );
        BatchRunner::new(config).run(rows, &mut summary, &mut report)?;
        info!("summary results exported to {}", summary_path);
        info!("detailed solutions exported to {}", report_path);
        Ok(())
    }
}
