use anyhow::{anyhow, Context, Result};
use std::io::{BufRead, BufReader, Read};

/// A row of a batch descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRow {
    /// The 1-based index of the row, header and blank lines excluded.
    pub row_index: usize,
    /// The full name of the row, `<instance-file>-<cycleTime>`.
    pub name: String,
    /// The name of the instance file.
    pub instance_name: String,
    /// The cycle time.
    pub cycle_time: usize,
    /// The lower bound on the number of stations.
    pub lower_bound: usize,
}

/// A batch descriptor row that could not be read.
#[derive(Debug)]
pub struct MalformedBatchRow {
    /// The 1-based index of the row, header and blank lines excluded.
    pub row_index: usize,
    /// The reason why the row is malformed.
    pub error: anyhow::Error,
}

impl std::fmt::Display for MalformedBatchRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "in row {}: {:#}", self.row_index, self.error)
    }
}

/// The result of reading a batch descriptor row; malformed rows are kept as errors so that they can be skipped.
pub type BatchRowResult = std::result::Result<BatchRow, MalformedBatchRow>;

/// A reader for batch descriptors.
///
/// A batch descriptor is a CSV file with a header line.
/// The `name` column gives the instance file and the cycle time as `<instance-file>-<cycleTime>`,
/// and the `lb` column gives a lower bound on the number of stations, or `NA` for no bound.
/// Other columns are ignored.
#[derive(Default)]
pub struct BatchDescriptorReader;

impl BatchDescriptorReader {
    /// Reads a batch descriptor.
    ///
    /// An error is returned if the header is missing or lacks a required column.
    /// Errors on data rows are reported row by row.
    pub fn read(&self, reader: &mut dyn Read) -> Result<Vec<BatchRowResult>> {
        let mut lines = BufReader::new(reader).lines();
        let header = match lines.next() {
            Some(l) => l.context("while reading the header")?,
            None => return Err(anyhow!("missing header")),
        };
        let columns = split_csv_line(&header);
        let column_index = |name: &str| {
            columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| anyhow!(r#"missing column "{}" in header"#, name))
        };
        let name_index = column_index("name")?;
        let lb_index = column_index("lb")?;
        let mut rows = vec![];
        for (i, line) in lines.enumerate() {
            let line = line.with_context(|| format!("while reading line {}", i + 2))?;
            if line.trim().is_empty() {
                continue;
            }
            let row_index = rows.len() + 1;
            rows.push(
                read_row(row_index, &split_csv_line(&line), name_index, lb_index)
                    .map_err(|error| MalformedBatchRow { row_index, error }),
            );
        }
        Ok(rows)
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    line.split(',')
        .map(|f| f.trim().trim_matches('"').trim().to_string())
        .collect()
}

fn read_row(row_index: usize, fields: &[String], name_index: usize, lb_index: usize) -> Result<BatchRow> {
    let field = |index: usize, column: &str| {
        fields
            .get(index)
            .ok_or_else(|| anyhow!(r#"missing value for column "{}""#, column))
    };
    let name = field(name_index, "name")?;
    let lb = field(lb_index, "lb")?;
    let lower_bound = if lb == "NA" {
        1
    } else {
        lb.parse::<usize>()
            .with_context(|| format!(r#"invalid lower bound "{}""#, lb))?
    };
    let (instance_name, cycle_time) = name
        .rsplit_once('-')
        .ok_or_else(|| anyhow!(r#"invalid name format "{}" (expected <instance>-<cycle time>)"#, name))?;
    let cycle_time = cycle_time
        .parse::<usize>()
        .with_context(|| format!(r#"invalid cycle time in "{}""#, name))?;
    if instance_name.is_empty() {
        return Err(anyhow!(r#"empty instance name in "{}""#, name));
    }
    Ok(BatchRow {
        row_index,
        name: name.clone(),
        instance_name: instance_name.to_string(),
        cycle_time,
        lower_bound,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(s: &str) -> Result<Vec<BatchRowResult>> {
        BatchDescriptorReader::default().read(&mut s.as_bytes())
    }

    #[test]
    fn test_read_ok() {
        let rows = read("name,lb,ub\nARCUS1.IN2-3786,21,22\n\"BOWMAN8.IN2-20\",NA,5\n").unwrap();
        assert_eq!(2, rows.len());
        assert_eq!(
            &BatchRow {
                row_index: 1,
                name: "ARCUS1.IN2-3786".to_string(),
                instance_name: "ARCUS1.IN2".to_string(),
                cycle_time: 3786,
                lower_bound: 21,
            },
            rows[0].as_ref().unwrap()
        );
        assert_eq!(1, rows[1].as_ref().unwrap().lower_bound);
        assert_eq!(20, rows[1].as_ref().unwrap().cycle_time);
    }

    #[test]
    fn test_name_with_dashes() {
        let rows = read("lb,name\n3,my-inst.IN2-10\n").unwrap();
        let row = rows[0].as_ref().unwrap();
        assert_eq!("my-inst.IN2", row.instance_name);
        assert_eq!(10, row.cycle_time);
        assert_eq!(3, row.lower_bound);
    }

    #[test]
    fn test_malformed_rows_are_kept_as_errors() {
        let rows = read("name,lb\nnodash,1\nfoo-bar,1\nfoo-10,x\nfoo-10,2\n").unwrap();
        assert_eq!(4, rows.len());
        assert!(rows[0].is_err());
        assert!(rows[1].is_err());
        assert!(rows[2].is_err());
        assert_eq!(4, rows[3].as_ref().unwrap().row_index);
    }

    #[test]
    fn test_blank_lines_are_not_numbered() {
        let rows = read("name,lb\n\nfoo-10,2\n   \nnodash,1\nbar-5,NA\n").unwrap();
        assert_eq!(3, rows.len());
        assert_eq!(1, rows[0].as_ref().unwrap().row_index);
        let err = rows[1].as_ref().unwrap_err();
        assert_eq!(2, err.row_index);
        assert!(err.to_string().starts_with("in row 2: "));
        assert_eq!(3, rows[2].as_ref().unwrap().row_index);
    }

    #[test]
    fn test_missing_column() {
        assert!(read("name,ub\nfoo-10,2\n").is_err());
        assert!(read("").is_err());
    }
}
