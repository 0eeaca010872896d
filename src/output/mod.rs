//! Output module: aggregation and export of crawl results
//!
//! This module handles:
//! - Aggregating extraction records into a flat result table
//! - Table sinks (JSON records, markdown table)
//! - Crawl statistics

mod aggregate;
mod json;
mod markdown;
pub mod stats;
mod traits;

pub use aggregate::{aggregate, Cell, ResultTable, TIMESTAMP_COLUMN, URL_COLUMN};
pub use json::JsonSink;
pub use markdown::{format_markdown_table, MarkdownSink};
pub use stats::{print_statistics, CrawlStatistics};
pub use traits::{write_table, OutputError, OutputResult, TableSink};

use crate::config::OutputConfig;
use std::path::Path;

/// Writes the table to every path configured in `[output]`
///
/// Returns the number of files written. An empty table writes nothing.
pub fn export(table: &ResultTable, config: &OutputConfig) -> OutputResult<usize> {
    if table.is_empty() {
        tracing::warn!("No results to export");
        return Ok(0);
    }

    let mut written = 0;
    if let Some(path) = &config.json_path {
        write_table(&JsonSink, table, Path::new(path))?;
        written += 1;
    }
    if let Some(path) = &config.markdown_path {
        write_table(&MarkdownSink, table, Path::new(path))?;
        written += 1;
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn table() -> ResultTable {
        ResultTable::new(
            vec!["url".to_string()],
            vec![vec![Some("https://a.com/".to_string())]],
        )
    }

    #[test]
    fn test_export_all_configured_sinks() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("results.json");
        let markdown = dir.path().join("results.md");
        let config = OutputConfig {
            json_path: Some(json.to_string_lossy().into_owned()),
            markdown_path: Some(markdown.to_string_lossy().into_owned()),
        };

        assert_eq!(export(&table(), &config).unwrap(), 2);
        assert!(json.exists());
        assert!(markdown.exists());
    }

    #[test]
    fn test_empty_table_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let json = dir.path().join("results.json");
        let config = OutputConfig {
            json_path: Some(json.to_string_lossy().into_owned()),
            markdown_path: None,
        };

        assert_eq!(export(&ResultTable::default(), &config).unwrap(), 0);
        assert!(!json.exists());
    }
}
