use crate::line::Solution;
use anyhow::Result;
use std::io::Write;

/// A writer for result reports.
///
/// Each entry begins with a line `Instance: <name>, Final Stations: <k>`,
/// followed by one line `Station <s>: <task><mode> ...` per station and by an empty line.
/// Tasks are written with their 1-based index, in increasing order, and modes are written `F` or `B`.
///
/// # Example
///
/// ```
/// # use ualbp_sat::io::ReportWriter;
/// # use ualbp_sat::line::{Mode, Solution};
/// let mut solution = Solution::new(2);
/// solution.assign(0, 0, Mode::Forward);
/// solution.assign(1, 1, Mode::Backward);
/// let mut out = Vec::new();
/// ReportWriter::default().write_solution(&mut out, "foo-10", &solution).unwrap();
/// assert_eq!(
///     "Instance: foo-10, Final Stations: 2\nStation 1: 1F\nStation 2: 2B\n\n",
///     String::from_utf8(out).unwrap()
/// );
/// ```
#[derive(Default)]
pub struct ReportWriter;

impl ReportWriter {
    /// Writes the entry of a solved instance.
    pub fn write_solution(&self, writer: &mut dyn Write, name: &str, solution: &Solution) -> Result<()> {
        writeln!(
            writer,
            "Instance: {}, Final Stations: {}",
            name,
            solution.n_stations()
        )?;
        for (k, tasks) in solution.iter_stations().enumerate() {
            write!(writer, "Station {}:", k + 1)?;
            for (t, mode) in tasks {
                write!(writer, " {}{}", t + 1, mode)?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Writes the entry of an instance for which no solution was found.
    pub fn write_no_solution(&self, writer: &mut dyn Write, name: &str) -> Result<()> {
        writeln!(writer, "Instance: {}, No solution found.", name)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}
