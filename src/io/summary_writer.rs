use anyhow::Result;
use std::{io::Write, time::Duration};

/// The sentinel written in place of the results of timed out instances.
pub const TIMEOUT_SENTINEL: &str = "TLE";

/// The sentinel written in place of the results of failed instances.
pub const ERROR_SENTINEL: &str = "ERR";

/// The outcome of an instance, as written in the summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SummaryOutcome {
    /// A solution was found.
    Solved {
        /// The number of stations of the solution.
        n_stations: usize,
        /// The time spent on the instance.
        elapsed: Duration,
    },
    /// The deadline was reached.
    TimedOut,
    /// The worker failed.
    Failed,
}

/// A writer for the batch summary CSV.
///
/// The header is `name,lb,final_num_stations,time`; times are in seconds.
#[derive(Default)]
pub struct SummaryWriter;

impl SummaryWriter {
    /// Writes the header line.
    pub fn write_header(&self, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "name,lb,final_num_stations,time")?;
        Ok(())
    }

    /// Writes the line of an instance.
    pub fn write_row(
        &self,
        writer: &mut dyn Write,
        name: &str,
        lower_bound: usize,
        outcome: &SummaryOutcome,
    ) -> Result<()> {
        match outcome {
            SummaryOutcome::Solved {
                n_stations,
                elapsed,
            } => writeln!(
                writer,
                "{},{},{},{:.3}",
                name,
                lower_bound,
                n_stations,
                elapsed.as_secs_f64()
            )?,
            SummaryOutcome::TimedOut => writeln!(
                writer,
                "{},{},{},{}",
                name, lower_bound, TIMEOUT_SENTINEL, TIMEOUT_SENTINEL
            )?,
            SummaryOutcome::Failed => writeln!(
                writer,
                "{},{},{},{}",
                name, lower_bound, ERROR_SENTINEL, ERROR_SENTINEL
            )?,
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_summary() {
        let mut out = Vec::new();
        let writer = SummaryWriter::default();
        writer.write_header(&mut out).unwrap();
        writer
            .write_row(
                &mut out,
                "a-10",
                2,
                &SummaryOutcome::Solved {
                    n_stations: 3,
                    elapsed: Duration::from_millis(1500),
                },
            )
            .unwrap();
        writer
            .write_row(&mut out, "b-10", 1, &SummaryOutcome::TimedOut)
            .unwrap();
        writer
            .write_row(&mut out, "c-10", 4, &SummaryOutcome::Failed)
            .unwrap();
        assert_eq!(
            "name,lb,final_num_stations,time\na-10,2,3,1.500\nb-10,1,TLE,TLE\nc-10,4,ERR,ERR\n",
            String::from_utf8(out).unwrap()
        );
    }
}
