use crate::line::{Instance, Precedence};
use anyhow::{anyhow, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::io::{BufRead, BufReader, Read};

lazy_static! {
    static ref EDGE_LINE_PATTERN: Regex = Regex::new(r"^\s*(-?\d+)\s*,\s*(-?\d+)\s*$").unwrap();
}

/// A reader for UALBP instance files.
///
/// The first line gives the number of tasks `n`; the `n` following lines give the durations, in task order.
/// The remaining lines are precedence edges `i,j` between 1-based task indices, terminated by a `-1,-1` line.
/// Blank lines are ignored, as are the lines following the terminating one.
///
/// # Example
///
/// ```
/// # use ualbp_sat::io::InstanceReader;
/// let content = "3\n5\n2\n4\n1,2\n1,3\n-1,-1\n";
/// let instance = InstanceReader::default().read(&mut content.as_bytes()).unwrap();
/// assert_eq!(3, instance.n_tasks());
/// assert_eq!(2, instance.n_precedences());
/// ```
#[derive(Default)]
pub struct InstanceReader;

impl InstanceReader {
    /// Reads an instance.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Instance> {
        let br = BufReader::new(reader);
        let mut n_tasks = None;
        let mut durations = vec![];
        let mut precedences = vec![];
        let mut terminated = false;
        for (i, line) in br.lines().enumerate() {
            let context = || format!("while reading line {}", i + 1);
            let l = line.with_context(context)?;
            let l = l.trim();
            if l.is_empty() {
                continue;
            }
            match n_tasks {
                None => {
                    n_tasks = Some(read_positive_int(l, "task count").with_context(context)?);
                }
                Some(n) if durations.len() < n => {
                    durations.push(read_positive_int(l, "duration").with_context(context)?);
                }
                Some(n) => {
                    match read_edge_line(l, n).with_context(context)? {
                        Some(p) => precedences.push(p),
                        None => {
                            terminated = true;
                            break;
                        }
                    }
                }
            }
        }
        match n_tasks {
            None => return Err(anyhow!("missing task count")),
            Some(n) if durations.len() < n => {
                return Err(anyhow!("expected {} durations, found {}", n, durations.len()))
            }
            _ => {}
        }
        if !terminated {
            return Err(anyhow!(r#"missing terminating "-1,-1" line"#));
        }
        Instance::new(durations, precedences)
    }
}

fn read_positive_int(l: &str, what: &str) -> Result<usize> {
    match l.parse::<usize>() {
        Ok(0) => Err(anyhow!("the {} must be positive", what)),
        Ok(n) => Ok(n),
        Err(e) => Err(anyhow!(r#"invalid {} "{}": {}"#, what, l, e)),
    }
}

fn read_edge_line(l: &str, n_tasks: usize) -> Result<Option<Precedence>> {
    let captures = EDGE_LINE_PATTERN
        .captures(l)
        .ok_or_else(|| anyhow!(r#"invalid precedence line "{}""#, l))?;
    let parse = |index: usize| -> Result<isize> {
        captures[index]
            .parse::<isize>()
            .with_context(|| format!(r#"invalid task index "{}""#, &captures[index]))
    };
    let (i, j) = (parse(1)?, parse(2)?);
    if i == -1 && j == -1 {
        return Ok(None);
    }
    let to_task = |t: isize| {
        if t >= 1 && t as usize <= n_tasks {
            Ok(t as usize - 1)
        } else {
            Err(anyhow!("task index {} is out of [1, {}]", t, n_tasks))
        }
    };
    Ok(Some(Precedence::new(to_task(i)?, to_task(j)?)))
}
