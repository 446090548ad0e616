//! Structured record (JSON) reading.
//!
//! A top-level array yields one row per element with columns in first-seen
//! key order. A top-level object is flattened into a single row.
//!
//! Cells are numbers, strings or null. Booleans become the text `true` /
//! `false` and nested values inside an array of records keep their compact
//! JSON text, so a cleaned JSON file writes them back as strings
//! (`true` → `"true"`, `{"k":1}` → `"{\"k\":1}"`).

use crate::error::{CleanerError, Result};
use crate::table::{Cell, Column, Table};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Convert a JSON value to a cell. Nested values keep their compact JSON text.
fn value_to_cell(value: &Value) -> Cell {
    match value {
        Value::Null => Cell::Null,
        Value::Bool(b) => Cell::Text(b.to_string()),
        Value::Number(n) => n.as_f64().map_or(Cell::Null, Cell::Number),
        Value::String(s) => Cell::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
    }
}

/// Accumulates cells column by column, padding absent keys with nulls.
#[derive(Default)]
struct ColumnBuilder {
    names: Vec<String>,
    index: HashMap<String, usize>,
    cells: Vec<Vec<Cell>>,
    rows: usize,
}

impl ColumnBuilder {
    fn push_row<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, Cell)>,
    {
        for (key, cell) in entries {
            let idx = match self.index.get(key) {
                Some(&idx) => idx,
                None => {
                    let idx = self.names.len();
                    self.names.push(key.to_string());
                    self.index.insert(key.to_string(), idx);
                    self.cells.push(vec![Cell::Null; self.rows]);
                    idx
                }
            };
            self.cells[idx].push(cell);
        }

        self.rows += 1;
        for column in &mut self.cells {
            column.resize(self.rows, Cell::Null);
        }
    }

    fn finish(self) -> Result<Table> {
        let columns = self
            .names
            .into_iter()
            .zip(self.cells)
            .map(|(name, cells)| Column::from_cells(name, cells))
            .collect();
        Table::new(columns)
    }
}

/// Flatten a value into `(path, cell)` pairs: `.` joins object keys and
/// `[i]` marks array positions. Empty containers become null cells.
fn flatten_into(prefix: &str, value: &Value, out: &mut Vec<(String, Cell)>) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(&path, child, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (i, child) in items.iter().enumerate() {
                flatten_into(&format!("{}[{}]", prefix, i), child, out);
            }
        }
        Value::Object(_) | Value::Array(_) => out.push((prefix.to_string(), Cell::Null)),
        scalar => out.push((prefix.to_string(), value_to_cell(scalar))),
    }
}

fn records_table(items: &[Value]) -> Result<Table> {
    let mut builder = ColumnBuilder::default();
    for item in items {
        match item {
            Value::Object(map) => builder.push_row(record_entries(map)),
            other => builder.push_row([("0", value_to_cell(other))]),
        }
    }
    builder.finish()
}

fn record_entries(map: &Map<String, Value>) -> impl Iterator<Item = (&str, Cell)> {
    map.iter().map(|(k, v)| (k.as_str(), value_to_cell(v)))
}

fn flattened_table(map: &Map<String, Value>) -> Result<Table> {
    let mut pairs = Vec::new();
    for (key, value) in map {
        flatten_into(key, value, &mut pairs);
    }

    let mut builder = ColumnBuilder::default();
    if !pairs.is_empty() {
        builder.push_row(pairs.iter().map(|(k, c)| (k.as_str(), c.clone())));
    }
    builder.finish()
}

/// Parse a JSON document into a table.
pub fn read_records(text: &str) -> Result<Table> {
    let document: Value =
        serde_json::from_str(text).map_err(|e| CleanerError::ParseFailure(e.to_string()))?;

    match &document {
        Value::Array(items) => records_table(items),
        Value::Object(map) => flattened_table(map),
        _ => Err(CleanerError::ParseFailure(
            "Top-level JSON value must be an array or an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ColumnKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_union_of_keys_in_first_seen_order() {
        let table = read_records(r#"[{"a":1},{"a":1,"b":2}]"#).unwrap();
        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row(0), vec![Cell::Number(1.0), Cell::Null]);
        assert_eq!(table.row(1), vec![Cell::Number(1.0), Cell::Number(2.0)]);
    }

    #[test]
    fn test_string_numbers_stay_text() {
        let table = read_records(r#"[{"age":"30"},{"age":"41"}]"#).unwrap();
        assert_eq!(table.columns()[0].kind(), ColumnKind::Text);
    }

    #[test]
    fn test_booleans_and_nested_values() {
        let table = read_records(r#"[{"ok":true,"tags":["x","y"],"meta":{"k":1}}]"#).unwrap();
        assert_eq!(
            table.row(0),
            vec![
                Cell::Text("true".to_string()),
                Cell::Text(r#"["x","y"]"#.to_string()),
                Cell::Text(r#"{"k":1}"#.to_string()),
            ]
        );
    }

    #[test]
    fn test_non_object_elements() {
        let table = read_records(r#"[1, {"a": 2}]"#).unwrap();
        assert_eq!(table.column_names(), vec!["0", "a"]);
        assert_eq!(table.row(0), vec![Cell::Number(1.0), Cell::Null]);
        assert_eq!(table.row(1), vec![Cell::Null, Cell::Number(2.0)]);
    }

    #[test]
    fn test_object_is_flattened() {
        let table =
            read_records(r#"{"user":{"name":"ann","langs":["rs","py"]},"empty":{},"n":3}"#)
                .unwrap();
        assert_eq!(
            table.column_names(),
            vec!["user.name", "user.langs[0]", "user.langs[1]", "empty", "n"]
        );
        assert_eq!(table.height(), 1);
        assert_eq!(table.row(0)[3], Cell::Null);
    }

    #[test]
    fn test_empty_documents() {
        let empty_array = read_records("[]").unwrap();
        assert_eq!((empty_array.height(), empty_array.width()), (0, 0));

        let empty_object = read_records("{}").unwrap();
        assert_eq!((empty_object.height(), empty_object.width()), (0, 0));
    }

    #[test]
    fn test_scalar_and_malformed_documents_fail() {
        assert!(matches!(read_records("42"), Err(CleanerError::ParseFailure(_))));
        assert!(matches!(read_records("[{"), Err(CleanerError::ParseFailure(_))));
    }
}
