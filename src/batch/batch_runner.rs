use super::{IsolatedWorker, ProgressWatchdog, WorkerOutcome};
use crate::{
    io::{BatchRow, BatchRowResult, InstanceReader, ReportReader, ReportWriter, SummaryOutcome, SummaryWriter},
    line::{Instance, Solution},
    solvers::SolverConfig,
};
use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use std::{fs::File, io::BufReader, io::Write, path::PathBuf, time::Duration};

/// The settings of a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// The directory containing the instance files.
    pub dataset_dir: PathBuf,
    /// The first row to process (1-based, inclusive).
    pub start_row: usize,
    /// The last row to process (1-based, inclusive), if any.
    pub end_row: Option<usize>,
    /// The wall-clock deadline of each instance.
    pub timeout: Duration,
    /// The interval between two progress logs.
    pub progress_interval: Duration,
    /// The settings of the station search.
    pub solver_config: SolverConfig,
    /// The program run as a worker; it must accept the arguments of the `solve` command.
    pub worker_program: PathBuf,
    /// Additional arguments given to each worker.
    pub extra_worker_args: Vec<String>,
}

/// Counters about a batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    /// The number of rows processed.
    pub n_processed: usize,
    /// The number of rows skipped because they or their instance were malformed.
    pub n_skipped: usize,
    /// The number of instances solved.
    pub n_solved: usize,
    /// The number of instances that reached the deadline.
    pub n_timed_out: usize,
    /// The number of instances whose worker failed.
    pub n_failed: usize,
}

/// Runs the rows of a batch descriptor, each one in an isolated worker.
///
/// Malformed rows and unreadable instances are logged and skipped.
/// Each instance is solved by a `solve` process under the deadline;
/// its report is read back and checked against the instance before being trusted.
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    /// Builds a new runner.
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    /// Runs the rows, writing the summary and the report entries as instances are done.
    pub fn run(
        &self,
        rows: Vec<BatchRowResult>,
        summary: &mut dyn Write,
        report: &mut dyn Write,
    ) -> Result<BatchStats> {
        let summary_writer = SummaryWriter::default();
        let report_writer = ReportWriter::default();
        summary_writer.write_header(summary)?;
        let mut stats = BatchStats::default();
        for row in rows {
            let row_index = match &row {
                Ok(r) => r.row_index,
                Err(e) => e.row_index,
            };
            if !self.is_in_range(row_index) {
                debug!("row {} is out of the selected range", row_index);
                continue;
            }
            let row = match row {
                Ok(r) => r,
                Err(e) => {
                    warn!("skipping row {}: {:#}", e.row_index, e.error);
                    stats.n_skipped += 1;
                    continue;
                }
            };
            let instance = match self.read_instance(&row) {
                Ok(i) => i,
                Err(e) => {
                    warn!("skipping row {} ({}): {:#}", row.row_index, row.name, e);
                    stats.n_skipped += 1;
                    continue;
                }
            };
            info!(
                "processing row {}, {}: cycle time={}, initial stations (lb)={}",
                row.row_index, row.name, row.cycle_time, row.lower_bound
            );
            stats.n_processed += 1;
            let outcome = match self.solve_row(&row, &instance) {
                Ok(Some((solution, elapsed))) => {
                    info!(
                        "row {} solved with {} stations in {:.3}s",
                        row.row_index,
                        solution.n_stations(),
                        elapsed.as_secs_f64()
                    );
                    report_writer.write_solution(report, &row.name, &solution)?;
                    stats.n_solved += 1;
                    SummaryOutcome::Solved {
                        n_stations: solution.n_stations(),
                        elapsed,
                    }
                }
                Ok(None) => {
                    warn!("row {} timed out", row.row_index);
                    stats.n_timed_out += 1;
                    SummaryOutcome::TimedOut
                }
                Err(e) => {
                    warn!("row {} failed: {:#}", row.row_index, e);
                    report_writer.write_no_solution(report, &row.name)?;
                    stats.n_failed += 1;
                    SummaryOutcome::Failed
                }
            };
            summary_writer.write_row(summary, &row.name, row.lower_bound, &outcome)?;
        }
        info!(
            "batch done: {} processed, {} solved, {} timed out, {} failed, {} skipped",
            stats.n_processed, stats.n_solved, stats.n_timed_out, stats.n_failed, stats.n_skipped
        );
        Ok(stats)
    }

    fn is_in_range(&self, row_index: usize) -> bool {
        row_index >= self.config.start_row && self.config.end_row.map_or(true, |e| row_index <= e)
    }

    fn instance_path(&self, row: &BatchRow) -> PathBuf {
        self.config.dataset_dir.join(&row.instance_name)
    }

    fn read_instance(&self, row: &BatchRow) -> Result<Instance> {
        let path = self.instance_path(row);
        let file = File::open(&path).with_context(|| format!("while opening {:?}", path))?;
        InstanceReader::default()
            .read(&mut BufReader::new(file))
            .with_context(|| format!("while reading {:?}", path))
    }

    fn worker_args(&self, row: &BatchRow) -> Vec<String> {
        let mut args = vec![
            "solve".to_string(),
            "-f".to_string(),
            self.instance_path(row).to_string_lossy().to_string(),
            "-c".to_string(),
            row.cycle_time.to_string(),
            "-l".to_string(),
            row.lower_bound.to_string(),
            "--strategy".to_string(),
            self.config.solver_config.strategy.to_string(),
            "--exhaustive-limit".to_string(),
            self.config.solver_config.exhaustive_limit.to_string(),
            "--name".to_string(),
            row.name.clone(),
            "--logging-level".to_string(),
            "off".to_string(),
        ];
        args.extend(self.config.extra_worker_args.iter().cloned());
        args
    }

    fn solve_row(&self, row: &BatchRow, instance: &Instance) -> Result<Option<(Solution, Duration)>> {
        let worker = IsolatedWorker::new(
            self.config.worker_program.clone(),
            self.worker_args(row),
            self.config.timeout,
        );
        let outcome = {
            let _watchdog = ProgressWatchdog::start(
                format!("row {} ({})", row.row_index, row.name),
                self.config.progress_interval,
            );
            worker.run()?
        };
        match outcome {
            WorkerOutcome::Finished { stdout, elapsed } => {
                let entries = ReportReader::default()
                    .read(&mut stdout.as_bytes())
                    .context("while reading the worker report")?;
                let solution = match entries.into_iter().next() {
                    Some(entry) if entry.name == row.name => entry.solution,
                    _ => None,
                }
                .ok_or_else(|| anyhow!("the worker did not report a solution"))?;
                solution
                    .check(instance, row.cycle_time)
                    .context("the worker reported an invalid solution")?;
                Ok(Some((solution, elapsed)))
            }
            WorkerOutcome::Failed { status, stderr } => Err(anyhow!(
                "the worker exited with {}{}",
                status,
                if stderr.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", stderr.trim())
                }
            )),
            WorkerOutcome::TimedOut => Ok(None),
        }
    }
}
