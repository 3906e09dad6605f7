use crate::line::{Mode, Solution};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

lazy_static! {
    static ref INSTANCE_LINE_PATTERN: Regex =
        Regex::new(r"^Instance: (.+), Final Stations: (\d+)$").unwrap();
    static ref NO_SOLUTION_LINE_PATTERN: Regex =
        Regex::new(r"^Instance: (.+), No solution found\.$").unwrap();
    static ref STATION_LINE_PATTERN: Regex = Regex::new(r"^Station (\d+):(.*)$").unwrap();
    static ref TASK_PATTERN: Regex = Regex::new(r"^(\d+)([FB])$").unwrap();
}

/// An entry of a result report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    /// The name of the instance.
    pub name: String,
    /// The solution, if one was found.
    pub solution: Option<Solution>,
}

/// A reader for the result reports written by [`ReportWriter`](super::ReportWriter).
#[derive(Default)]
pub struct ReportReader;

impl ReportReader {
    /// Reads all the entries of a report.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Vec<ReportEntry>> {
        let mut entries = vec![];
        let mut current: Option<(String, Solution, usize)> = None;
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let context = || format!("while reading line {}", i + 1);
            let line = line.with_context(context)?;
            let l = line.trim_end();
            if l.is_empty() {
                if let Some(entry) = current.take() {
                    entries.push(close_entry(entry).with_context(context)?);
                }
                continue;
            }
            if let Some(c) = INSTANCE_LINE_PATTERN.captures(l) {
                if let Some(entry) = current.take() {
                    entries.push(close_entry(entry).with_context(context)?);
                }
                let n_stations = c[2].parse::<usize>().with_context(context)?;
                current = Some((c[1].to_string(), Solution::new(n_stations), 0));
                continue;
            }
            if let Some(c) = NO_SOLUTION_LINE_PATTERN.captures(l) {
                if let Some(entry) = current.take() {
                    entries.push(close_entry(entry).with_context(context)?);
                }
                entries.push(ReportEntry {
                    name: c[1].to_string(),
                    solution: None,
                });
                continue;
            }
            match (STATION_LINE_PATTERN.captures(l), current.as_mut()) {
                (Some(c), Some((_, solution, n_read))) => {
                    read_station_line(&c[1], &c[2], solution, *n_read).with_context(context)?;
                    *n_read += 1;
                }
                _ => return Err(anyhow!(r#"unexpected line "{}""#, l)).with_context(context),
            }
        }
        if let Some(entry) = current.take() {
            entries.push(close_entry(entry)?);
        }
        Ok(entries)
    }
}

fn read_station_line(index: &str, tasks: &str, solution: &mut Solution, n_read: usize) -> Result<()> {
    let station = index.parse::<usize>()?;
    if station != n_read + 1 || station > solution.n_stations() {
        return Err(anyhow!("unexpected station {}", station));
    }
    for t in tasks.split_whitespace() {
        let c = TASK_PATTERN
            .captures(t)
            .ok_or_else(|| anyhow!(r#"invalid task "{}""#, t))?;
        let task = c[1].parse::<usize>()?;
        if task == 0 {
            return Err(anyhow!("task indices begin at 1"));
        }
        let mode = Mode::try_from(c[2].chars().next().unwrap_or('?'))?;
        solution.assign(task - 1, station - 1, mode);
    }
    Ok(())
}

fn close_entry((name, solution, n_read): (String, Solution, usize)) -> Result<ReportEntry> {
    if n_read != solution.n_stations() {
        return Err(anyhow!(
            "expected {} stations for instance {}, found {}",
            solution.n_stations(),
            name,
            n_read
        ));
    }
    Ok(ReportEntry {
        name,
        solution: Some(solution),
    })
}
