//! Result aggregation
//!
//! Turns extraction records into one flat table. Multi-valued fields are
//! exploded into one row per value, column by column.

use crate::extract::{ExtractionRecord, FieldValue};
use indexmap::IndexSet;

/// Column holding the page URL
pub const URL_COLUMN: &str = "url";

/// Column holding the extraction timestamp
pub const TIMESTAMP_COLUMN: &str = "timestamp";

/// A table cell before explosion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// The record had no value for this column
    Empty,
    Scalar(String),
    /// Becomes one row per value when its column is exploded
    Multi(Vec<String>),
}

impl From<&FieldValue> for Cell {
    fn from(value: &FieldValue) -> Self {
        match value {
            FieldValue::Scalar(s) => Cell::Scalar(s.clone()),
            FieldValue::Multi(values) => Cell::Multi(values.clone()),
        }
    }
}

impl Cell {
    fn into_scalar(self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Scalar(s) => Some(s),
            // explode leaves no lists behind
            Cell::Multi(values) => Some(values.join(", ")),
        }
    }
}

/// Flat table of extraction results
///
/// Every row has exactly one optional string per column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns the cell at `row` in the named column
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    /// All values of one column, in row order
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.column_index(column) {
            Some(index) => self.rows.iter().map(|row| row[index].as_deref()).collect(),
            None => Vec::new(),
        }
    }
}

/// Aggregates extraction records into a table
///
/// # Table Layout
///
/// - Columns are `url`, `timestamp`, then every field name in first-seen order
/// - Each record starts as one row; a field it lacks is an empty cell
/// - Each column that holds any multi-valued cell is then exploded in column
///   order: a row whose cell holds N values becomes N rows with the other
///   cells copied. Explosion is applied to the table as it stands, so two
///   multi-valued columns of sizes 2 and 3 in one row give 6 rows
///
/// An empty input gives an empty table, without columns.
///
/// # Example
///
/// ```
/// use pattern_scrape::extract::ExtractionRecord;
/// use pattern_scrape::output::aggregate;
///
/// let mut record = ExtractionRecord::new("https://a.com/");
/// record.insert("emails", vec!["x@a.com".to_string(), "y@a.com".to_string()]);
///
/// let table = aggregate(&[record]);
/// assert_eq!(table.columns(), &["url", "timestamp", "emails"]);
/// assert_eq!(table.len(), 2);
/// ```
pub fn aggregate(records: &[ExtractionRecord]) -> ResultTable {
    if records.is_empty() {
        return ResultTable::default();
    }

    let mut columns: IndexSet<String> = IndexSet::new();
    columns.insert(URL_COLUMN.to_string());
    columns.insert(TIMESTAMP_COLUMN.to_string());
    for record in records {
        for field in record.fields.keys() {
            columns.insert(field.clone());
        }
    }

    let mut rows: Vec<Vec<Cell>> = records
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|column| match column.as_str() {
                    URL_COLUMN => Cell::Scalar(record.url.clone()),
                    TIMESTAMP_COLUMN => Cell::Scalar(record.timestamp.clone()),
                    field => record.get(field).map(Cell::from).unwrap_or(Cell::Empty),
                })
                .collect()
        })
        .collect();

    for column in 0..columns.len() {
        rows = explode(rows, column);
    }

    ResultTable::new(
        columns.into_iter().collect(),
        rows.into_iter()
            .map(|row| row.into_iter().map(Cell::into_scalar).collect())
            .collect(),
    )
}

/// Replaces every row holding a list in `column` with one row per value
fn explode(rows: Vec<Vec<Cell>>, column: usize) -> Vec<Vec<Cell>> {
    if !rows.iter().any(|row| matches!(row[column], Cell::Multi(_))) {
        return rows;
    }

    let mut exploded = Vec::with_capacity(rows.len());
    for mut row in rows {
        match std::mem::replace(&mut row[column], Cell::Empty) {
            Cell::Multi(values) if !values.is_empty() => {
                for value in values {
                    let mut copy = row.clone();
                    copy[column] = Cell::Scalar(value);
                    exploded.push(copy);
                }
            }
            Cell::Multi(_) => exploded.push(row),
            cell => {
                row[column] = cell;
                exploded.push(row);
            }
        }
    }
    exploded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(url: &str, fields: &[(&str, FieldValue)]) -> ExtractionRecord {
        let mut record = ExtractionRecord::new(url);
        for (name, value) in fields {
            record.insert(*name, value.clone());
        }
        record
    }

    fn multi(values: &[&str]) -> FieldValue {
        FieldValue::Multi(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_empty_input() {
        let table = aggregate(&[]);
        assert!(table.is_empty());
        assert!(table.columns().is_empty());
    }

    #[test]
    fn test_columns_in_first_seen_order() {
        let table = aggregate(&[
            record("https://a.com/", &[("emails", multi(&["a@a.com"]))]),
            record(
                "https://b.com/",
                &[("title", FieldValue::Scalar("B".into())), ("emails", multi(&["b@b.com"]))],
            ),
        ]);
        assert_eq!(table.columns(), &["url", "timestamp", "emails", "title"]);
    }

    #[test]
    fn test_multi_value_explodes_into_rows() {
        let table = aggregate(&[record(
            "https://a.com/",
            &[("emails", multi(&["x@a.com", "y@a.com"]))],
        )]);

        assert_eq!(table.len(), 2);
        assert_eq!(
            table.column_values("emails"),
            vec![Some("x@a.com"), Some("y@a.com")]
        );
        assert_eq!(
            table.column_values("url"),
            vec![Some("https://a.com/"), Some("https://a.com/")]
        );
    }

    #[test]
    fn test_two_multi_columns_multiply() {
        let table = aggregate(&[record(
            "https://a.com/",
            &[
                ("emails", multi(&["e1", "e2"])),
                ("phones", multi(&["p1", "p2", "p3"])),
            ],
        )]);

        assert_eq!(table.len(), 6);
        assert_eq!(
            table.column_values("emails"),
            vec![Some("e1"), Some("e1"), Some("e1"), Some("e2"), Some("e2"), Some("e2")]
        );
        assert_eq!(table.get(5, "phones"), Some("p3"));
    }

    #[test]
    fn test_absent_field_is_empty_cell() {
        let table = aggregate(&[
            record("https://a.com/", &[("emails", multi(&["a@a.com"]))]),
            record("https://b.com/", &[("phones", multi(&["555"]))]),
        ]);

        assert_eq!(table.len(), 2);
        assert_eq!(table.get(0, "phones"), None);
        assert_eq!(table.get(1, "emails"), None);
        assert_eq!(table.get(1, "phones"), Some("555"));
    }

    #[test]
    fn test_scalar_cells_are_copied() {
        let table = aggregate(&[record(
            "https://a.com/",
            &[
                ("title", FieldValue::Scalar("Home".into())),
                ("emails", multi(&["x", "y", "z"])),
            ],
        )]);

        assert_eq!(table.column_values("title"), vec![Some("Home"); 3]);
    }

    #[test]
    fn test_record_without_fields_keeps_one_row() {
        let table = aggregate(&[ExtractionRecord::new("https://a.com/")]);
        assert_eq!(table.columns(), &["url", "timestamp"]);
        assert_eq!(table.len(), 1);
    }
}
