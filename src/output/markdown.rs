//! Markdown table sink
//!
//! This module renders the result table as a human-readable markdown
//! document: a short header followed by one table row per result row.

use crate::output::traits::{OutputResult, TableSink};
use crate::output::ResultTable;

/// Markdown table sink
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownSink;

impl TableSink for MarkdownSink {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn write(&self, table: &ResultTable) -> OutputResult<Vec<u8>> {
        Ok(format_markdown_table(table).into_bytes())
    }
}

/// Formats a result table as markdown
///
/// # Arguments
///
/// * `table` - The aggregated results
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_table(table: &ResultTable) -> String {
    let mut md = String::new();

    md.push_str("# Pattern-Scrape Results\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!("- **Rows**: {}\n\n", table.len()));

    if table.columns().is_empty() {
        md.push_str("_No results._\n");
        return md;
    }

    let header: Vec<String> = table.columns().iter().map(|c| escape_cell(c)).collect();
    md.push_str(&format!("| {} |\n", header.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        table.columns().iter().map(|_| "---|").collect::<String>()
    ));

    for row in table.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| cell.as_deref().map(escape_cell).unwrap_or_default())
            .collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }

    md
}

/// Keeps a value on one line and out of the column separators
fn escape_cell(value: &str) -> String {
    value
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_table() {
        let table = ResultTable::new(
            vec!["url".to_string(), "emails".to_string()],
            vec![
                vec![Some("https://a.com/".to_string()), Some("x@a.com".to_string())],
                vec![Some("https://b.com/".to_string()), None],
            ],
        );

        let md = format_markdown_table(&table);

        assert!(md.contains("- **Rows**: 2"));
        assert!(md.contains("| url | emails |\n|---|---|\n"));
        assert!(md.contains("| https://a.com/ | x@a.com |\n"));
        assert!(md.contains("| https://b.com/ |  |\n"));
    }

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a | b"), "a \\| b");
        assert_eq!(escape_cell("line one\n  line two"), "line one line two");
    }

    #[test]
    fn test_empty_table() {
        let md = format_markdown_table(&ResultTable::default());
        assert!(md.contains("_No results._"));
    }
}
