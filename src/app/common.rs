use super::{
    app_helper::AppHelper, command::Command, AuthorsCommand, BatchCommand, CheckCommand,
    EncodeToSatCommand, SolveCommand, StrategiesCommand,
};
use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use log::{debug, info, warn};
use std::{
    fs::{self, File},
    io::BufReader,
    path::PathBuf,
    str::FromStr,
};
use strum::IntoEnumIterator;
use ualbp_sat::{
    encodings::{CapacityStrategy, DEFAULT_EXHAUSTIVE_LIMIT},
    io::InstanceReader,
    line::Instance,
    sat::{
        DefaultSatSolverFactory, ExternalSatSolverFactory, SatSolverFactory, SolvingListener,
        SolvingResult,
    },
    solvers::SolverConfig,
};

pub(crate) fn create_app_helper() -> AppHelper<'static> {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let authors = option_env!("CARGO_PKG_AUTHORS").unwrap_or("unknown authors");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        authors,
        "ualbp-sat, a SAT-based solver for the U-shaped assembly line balancing problem.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(AuthorsCommand::new(app_name, app_version, authors)),
        Box::new(BatchCommand::new()),
        Box::new(CheckCommand::new()),
        Box::new(EncodeToSatCommand::new()),
        Box::new(SolveCommand::new()),
        Box::new(StrategiesCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app
}

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file that contains the instance")
        .required(true)
}

pub(crate) const ARG_CYCLE_TIME: &str = "CYCLE_TIME";

pub(crate) fn cycle_time_arg(required: bool) -> Arg<'static, 'static> {
    Arg::with_name(ARG_CYCLE_TIME)
        .short("c")
        .long("cycle-time")
        .empty_values(false)
        .multiple(false)
        .help("the maximal load of a station")
        .required(required)
}

pub(crate) const ARG_STRATEGY: &str = "STRATEGY";
pub(crate) const ARG_EXHAUSTIVE_LIMIT: &str = "EXHAUSTIVE_LIMIT";

pub(crate) fn strategy_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_STRATEGY)
            .short("s")
            .long("strategy")
            .empty_values(false)
            .multiple(false)
            .possible_values(&["exhaustive", "lazy", "pb"])
            .default_value("lazy")
            .help("the strategy used to bound the load of the stations")
            .required(false),
        Arg::with_name(ARG_EXHAUSTIVE_LIMIT)
            .long("exhaustive-limit")
            .empty_values(false)
            .multiple(false)
            .help("the maximal number of subsets the exhaustive strategy may enumerate per station")
            .required(false),
    ]
}

pub(crate) fn parse_usize_arg(arg_matches: &ArgMatches<'_>, arg_name: &str) -> Result<Option<usize>> {
    arg_matches
        .value_of(arg_name)
        .map(|s| {
            s.parse::<usize>()
                .with_context(|| format!(r#"invalid value "{}": expected a non-negative integer"#, s))
        })
        .transpose()
}

pub(crate) fn parse_cycle_time(arg_matches: &ArgMatches<'_>) -> Result<Option<usize>> {
    match parse_usize_arg(arg_matches, ARG_CYCLE_TIME).context("while reading the cycle time")? {
        Some(0) => Err(anyhow!("the cycle time must be positive")),
        c => Ok(c),
    }
}

pub(crate) fn create_solver_config(arg_matches: &ArgMatches<'_>) -> Result<SolverConfig> {
    let strategy = match arg_matches.value_of(ARG_STRATEGY) {
        Some(s) => CapacityStrategy::from_str(s).with_context(|| {
            format!(
                r#"unknown strategy "{}" (expected one of {})"#,
                s,
                CapacityStrategy::iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })?,
        None => CapacityStrategy::default(),
    };
    let exhaustive_limit = parse_usize_arg(arg_matches, ARG_EXHAUSTIVE_LIMIT)
        .context("while reading the exhaustive limit")?
        .unwrap_or(DEFAULT_EXHAUSTIVE_LIMIT);
    info!("using the {} capacity strategy", strategy);
    Ok(SolverConfig {
        strategy,
        exhaustive_limit,
    })
}

pub(crate) fn read_instance_file(file_path: &str) -> Result<Instance> {
    let canonicalized = canonicalize_file_path(file_path)?;
    info!("reading input file {:?}", canonicalized);
    let mut file_reader = BufReader::new(File::open(&canonicalized)?);
    let instance = InstanceReader::default()
        .read(&mut file_reader)
        .with_context(|| format!("while reading {:?}", canonicalized))?;
    info!(
        "the instance has {} task(s) and {} precedence(s)",
        instance.n_tasks(),
        instance.n_precedences(),
    );
    Ok(instance)
}

/// Canonicalize a path given by the user.
pub(crate) fn canonicalize_file_path(file_path: &str) -> Result<PathBuf> {
    fs::canonicalize(PathBuf::from(file_path))
        .with_context(|| format!(r#"while opening file "{}""#, file_path))
}

const ARG_EXTERNAL_SAT_SOLVER: &str = "EXTERNAL_SAT_SOLVER";
const ARG_EXTERNAL_SAT_SOLVER_OPTIONS: &str = "EXTERNAL_SAT_SOLVER_OPTIONS";

pub(crate) fn external_sat_solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER)
            .long("external-sat-solver")
            .empty_values(false)
            .multiple(false)
            .help("a path to an external SAT solver to replace the embedded one")
            .required(false),
        Arg::with_name(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
            .long("external-sat-solver-opt")
            .requires(ARG_EXTERNAL_SAT_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external SAT solver")
            .required(false),
    ]
}

/// Returns the external SAT solver arguments as they were given, to forward them to another process.
pub(crate) fn external_sat_solver_cli_args(arg_matches: &ArgMatches<'_>) -> Result<Vec<String>> {
    let mut args = vec![];
    if let Some(s) = arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER) {
        let path = canonicalize_file_path(s)?;
        args.push("--external-sat-solver".to_string());
        args.push(path.to_string_lossy().to_string());
    }
    if let Some(options) = arg_matches.values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS) {
        for o in options {
            args.push("--external-sat-solver-opt".to_string());
            args.push(o.to_string());
        }
    }
    Ok(args)
}

pub(crate) fn create_sat_solver_factory(
    arg_matches: &ArgMatches<'_>,
) -> Result<Box<dyn SatSolverFactory>> {
    let external_solver = arg_matches.value_of(ARG_EXTERNAL_SAT_SOLVER);
    let external_solver_options = arg_matches
        .values_of(ARG_EXTERNAL_SAT_SOLVER_OPTIONS)
        .map(|v| v.map(|o| o.to_string()).collect::<Vec<String>>())
        .unwrap_or_default();
    if let Some(s) = external_solver {
        let path = canonicalize_file_path(s)?;
        info!("using {:?} as SAT solver", path);
        let mut factory = ExternalSatSolverFactory::new(
            path.to_string_lossy().to_string(),
            external_solver_options,
        );
        factory.add_solver_listener(Box::new(|| {
            Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
        }));
        Ok(Box::new(factory))
    } else {
        info!("using the default SAT solver");
        let mut factory = DefaultSatSolverFactory::default();
        factory.add_solver_listener(Box::new(|| {
            Box::<SatSolvingLogger>::default() as Box<dyn SolvingListener>
        }));
        Ok(Box::new(factory))
    }
}

#[derive(Default)]
struct SatSolvingLogger;

impl SolvingListener for SatSolvingLogger {
    fn solving_start(&self, n_vars: usize, n_clauses: usize) {
        debug!(
            "launching SAT solver on an instance with {} variables and {} clauses",
            n_vars, n_clauses
        );
    }

    fn solving_end(&self, result: &SolvingResult) {
        debug!("SAT solver ended with result {}", result.as_str());
        if let SolvingResult::Unknown = result {
            warn!("the SAT solver gave up");
        }
    }
}
