//! Table sinks for the finished report.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use bioactyx_common::Result;
use tracing::debug;

use crate::models::ResultTable;

/// Destination for a finished, non-empty [`ResultTable`].
pub trait TableSink {
    /// Writes the header and every row in table order.
    /// Returns a human-readable description of where the table went.
    fn write_table(&mut self, table: &ResultTable) -> Result<String>;
}

/// Writes the header and rows of `table` as CSV to `writer`.
pub fn write_csv<W: Write>(table: &ResultTable, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(ResultTable::HEADER)?;
    for row in table.rows() {
        csv_writer.write_record(row.to_row())?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// File name for a search pattern: `<pattern>_activity_results.csv`.
///
/// SMILES may contain `/` and `\` (bond stereo), which are replaced so the
/// pattern cannot escape the output directory.
pub fn report_file_name(pattern: &str) -> String {
    let safe: String = pattern
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}_activity_results.csv", safe)
}

/// CSV file sink.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    path: PathBuf,
}

impl CsvFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing to `dir/<pattern>_activity_results.csv`.
    pub fn for_pattern(dir: &Path, pattern: &str) -> Self {
        Self::new(dir.join(report_file_name(pattern)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableSink for CsvFileSink {
    fn write_table(&mut self, table: &ResultTable) -> Result<String> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %self.path.display(), rows = table.len(), "Writing CSV report");
        let file = File::create(&self.path)?;
        write_csv(table, file)?;
        Ok(self.path.display().to_string())
    }
}
