//! Timing tables: one `n,seconds` row per compressed plot.
//!
//! The format matches what numerical tooling writes with a commented
//! header, so tables from either side can be mixed:
//!
//! ```text
//! # n, time
//! 10,1.234568e-03
//! 50,2.502000e-03
//! ```

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// File name prefix of timing tables.
pub const TIMING_PREFIX: &str = "time_complexity_data_";

/// Header line written at the top of every table.
pub const TIMING_HEADER: &str = "# n, time";

/// Compression time for one plot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingRecord {
    /// Number of points in the plot.
    pub n: u64,
    /// Wall-clock compression time in seconds.
    pub seconds: f64,
}

/// The timings of one benchmark run, in measurement order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingTable {
    /// Rows of the table.
    pub records: Vec<TimingRecord>,
}

impl TimingTable {
    /// Create a table from records.
    #[must_use]
    pub fn new(records: Vec<TimingRecord>) -> Self {
        Self { records }
    }

    /// Point counts column.
    #[must_use]
    pub fn sizes(&self) -> Vec<u64> {
        self.records.iter().map(|r| r.n).collect()
    }

    /// Times column.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.seconds).collect()
    }

    /// Write the table, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        let mut file = fs::File::create(path)?;
        writeln!(file, "{TIMING_HEADER}")?;

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        for record in &self.records {
            writer.write_record([record.n.to_string(), format_scientific(record.seconds)])?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Read a table. Lines starting with `#` are ignored.
    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .comment(Some(b'#'))
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            let line = row.position().map_or(idx + 1, |p| p.line() as usize);
            let fail = |reason: String| Error::Timing {
                path: path.to_path_buf(),
                line,
                reason,
            };

            if row.len() != 2 {
                return Err(fail(format!("expected 2 columns, found {}", row.len())));
            }
            let n = row[0]
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
                .ok_or_else(|| fail(format!("point count {:?} is not a whole number", &row[0])))?;
            let seconds = row[1]
                .parse::<f64>()
                .map_err(|_| fail(format!("time {:?} is not a number", &row[1])))?;

            records.push(TimingRecord { n: n as u64, seconds });
        }

        Ok(Self { records })
    }
}

/// Table file name for a run label (`time_complexity_data_<label>.txt`).
#[must_use]
pub fn table_file_name(label: &str) -> String {
    format!("{TIMING_PREFIX}{label}.txt")
}

/// Timing tables in `dir`, sorted by file name.
pub fn discover_tables(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut tables = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_table = path
            .file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| name.starts_with(TIMING_PREFIX));
        if is_table && path.is_file() {
            tables.push(path);
        }
    }
    tables.sort();
    Ok(tables)
}

/// Format like C's `%e`: six fractional digits and an exponent of at least
/// two digits with explicit sign.
///
/// # Example
///
/// ```
/// use marker_merge::batch::timing::format_scientific;
///
/// assert_eq!(format_scientific(0.001234568), "1.234568e-03");
/// assert_eq!(format_scientific(12.5), "1.250000e+01");
/// ```
#[must_use]
pub fn format_scientific(value: f64) -> String {
    let formatted = format!("{value:.6e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exp) => {
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{mantissa}e{sign}{:02}", exp.abs())
            }
            Err(_) => formatted,
        },
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_scientific() {
        assert_eq!(format_scientific(0.0), "0.000000e+00");
        assert_eq!(format_scientific(1.5e-120), "1.500000e-120");
        assert_eq!(format_scientific(-2.0), "-2.000000e+00");
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(table_file_name("1"));
        let table = TimingTable::new(vec![
            TimingRecord { n: 10, seconds: 0.00125 },
            TimingRecord { n: 50000, seconds: 2.5 },
        ]);
        table.write(&path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "# n, time\n10,1.250000e-03\n50000,2.500000e+00\n");
        assert_eq!(TimingTable::read(&path).unwrap(), table);
    }

    #[test]
    fn test_read_tolerates_spacing_and_float_counts() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "# n, time\n1.000000e+01, 3.1e-03\n 100 ,4e-2\n").unwrap();

        let table = TimingTable::read(&path).unwrap();
        assert_eq!(table.sizes(), vec![10, 100]);
        assert_eq!(table.times(), vec![3.1e-3, 4e-2]);
    }

    #[test]
    fn test_read_rejects_bad_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "# n, time\n10,0.1\n2.5,0.2\n").unwrap();

        let err = TimingTable::read(&path).unwrap_err();
        assert!(matches!(err, Error::Timing { .. }));
        assert!(err.to_string().contains("2.5"));
    }

    #[test]
    fn test_discover_tables_sorted() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["time_complexity_data_2.txt", "notes.txt", "time_complexity_data_1.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let tables = discover_tables(dir.path()).unwrap();
        let names: Vec<_> = tables
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["time_complexity_data_1.txt", "time_complexity_data_2.txt"]);
    }
}
