//! Table sink trait and output errors
//!
//! A sink turns a [`ResultTable`] into bytes. Writing those bytes somewhere
//! is left to the caller.

use crate::output::ResultTable;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Write(String),

    #[error("Failed to format output: {0}")]
    Format(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Serializes a result table
pub trait TableSink {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Renders the whole table
    ///
    /// # Arguments
    ///
    /// * `table` - The aggregated results
    ///
    /// # Returns
    ///
    /// The encoded table, ready to be written out
    fn write(&self, table: &ResultTable) -> OutputResult<Vec<u8>>;
}

/// Renders a table with `sink` and writes it to `path`
pub fn write_table(sink: &dyn TableSink, table: &ResultTable, path: &Path) -> OutputResult<()> {
    let bytes = sink.write(table)?;

    let mut file = File::create(path)
        .map_err(|e| OutputError::Write(format!("{}: {}", path.display(), e)))?;
    file.write_all(&bytes)?;

    tracing::info!(
        "Wrote {} rows as {} to {}",
        table.len(),
        sink.name(),
        path.display()
    );
    Ok(())
}
