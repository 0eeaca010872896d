//! JSON table sink
//!
//! Emits the table as an array of row objects (records orientation). Keys
//! keep column order; empty cells are `null`.

use crate::output::traits::{OutputResult, TableSink};
use crate::output::ResultTable;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Pretty-printed UTF-8 JSON sink
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink;

/// One row borrowed as a JSON object
struct JsonRow<'a> {
    columns: &'a [String],
    cells: &'a [Option<String>],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.cells) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl TableSink for JsonSink {
    fn name(&self) -> &'static str {
        "json"
    }

    fn write(&self, table: &ResultTable) -> OutputResult<Vec<u8>> {
        let rows: Vec<JsonRow<'_>> = table
            .rows()
            .iter()
            .map(|cells| JsonRow {
                columns: table.columns(),
                cells,
            })
            .collect();

        let mut bytes = serde_json::to_vec_pretty(&rows)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
