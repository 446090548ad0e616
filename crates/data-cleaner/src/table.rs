//! In-memory table model shared by every stage of the engine.
//!
//! A [`Table`] is an ordered list of named columns. Names may repeat. Each
//! column is tagged once at load time as numeric or text and stores its
//! values in an immutable polars chunked array, so cloning a table is cheap
//! and cleaning can never edit the loader's data in place.

use crate::error::{CleanerError, Result};
use crate::utils::{format_number, number_key, unique_keys};
use polars::prelude::{
    BooleanChunked, ChunkFilter, DataFrame, Float64Chunked, IntoSeries, PlSmallStr,
    StringChunked,
};
use serde::{Serialize, Serializer};
use std::collections::{HashMap, HashSet};

/// Kind of values a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    /// Label reported as the column dtype.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

/// A single cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text rendering used for delimited output. Nulls and non-finite numbers
    /// render as an empty field.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(v) => format_number(*v).unwrap_or_default(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Non-finite numbers serialize as `null`; integral numbers serialize
/// without a fractional part.
impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Number(v) if !v.is_finite() => serializer.serialize_none(),
            Self::Number(v) if v.fract() == 0.0 && v.abs() < 9.0e15 => {
                serializer.serialize_i64(*v as i64)
            }
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Hashable identity of a cell used for row equality.
///
/// Nulls are equal to each other, as in the duplicate-row rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum CellKey<'a> {
    Null,
    Number(u64),
    Text(&'a str),
}

/// Column values, tagged by kind.
#[derive(Debug, Clone)]
pub enum ColumnData {
    Numeric(Float64Chunked),
    Text(StringChunked),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Text(_) => ColumnKind::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(ca) => ca.len(),
            Self::Text(ca) => ca.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn null_count(&self) -> usize {
        match self {
            Self::Numeric(ca) => ca.null_count(),
            Self::Text(ca) => ca.null_count(),
        }
    }

    /// Value at `idx` as a [`Cell`]. `idx` must be in bounds.
    pub fn cell(&self, idx: usize) -> Cell {
        match self {
            Self::Numeric(ca) => ca.get(idx).map_or(Cell::Null, Cell::Number),
            Self::Text(ca) => ca
                .get(idx)
                .map_or(Cell::Null, |s| Cell::Text(s.to_string())),
        }
    }

    pub(crate) fn key(&self, idx: usize) -> CellKey<'_> {
        match self {
            Self::Numeric(ca) => ca
                .get(idx)
                .map_or(CellKey::Null, |v| CellKey::Number(number_key(v))),
            Self::Text(ca) => ca.get(idx).map_or(CellKey::Null, CellKey::Text),
        }
    }

    /// Count of distinct non-null values.
    pub fn unique_count(&self) -> usize {
        match self {
            Self::Numeric(ca) => ca
                .into_iter()
                .flatten()
                .map(number_key)
                .collect::<HashSet<_>>()
                .len(),
            Self::Text(ca) => ca.into_iter().flatten().collect::<HashSet<_>>().len(),
        }
    }

    fn filter(&self, mask: &BooleanChunked) -> Result<Self> {
        Ok(match self {
            Self::Numeric(ca) => Self::Numeric(ca.filter(mask)?),
            Self::Text(ca) => Self::Text(ca.filter(mask)?),
        })
    }

    fn slice(&self, len: usize) -> Self {
        match self {
            Self::Numeric(ca) => Self::Numeric(ca.slice(0, len)),
            Self::Text(ca) => Self::Text(ca.slice(0, len)),
        }
    }
}

/// A named column.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values.into_iter().collect()))
    }

    pub fn text<S: AsRef<str>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        Self::new(name, ColumnData::Text(values.into_iter().collect()))
    }

    /// Build a column from cells, choosing numeric when every non-null cell is
    /// a number. Numbers in a text column keep their textual rendering.
    pub fn from_cells(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let all_numeric = cells
            .iter()
            .all(|c| matches!(c, Cell::Null | Cell::Number(_)));

        if all_numeric {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Number(v) => Some(v),
                    _ => None,
                })
                .collect();
            Self::numeric(name, values)
        } else {
            let values = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Null => None,
                    Cell::Number(v) => Some(format_number(v).unwrap_or_else(|| v.to_string())),
                    Cell::Text(s) => Some(s),
                })
                .collect();
            Self::text(name, values)
        }
    }

    pub fn kind(&self) -> ColumnKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.data.null_count()
    }

    /// Missing fraction (0.0 - 1.0); 0 when the column has no rows.
    pub fn missing_fraction(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.null_count() as f64 / self.len() as f64
        }
    }

    /// Rows where the column is null, in ascending order.
    pub fn null_indices(&self) -> Vec<usize> {
        match &self.data {
            ColumnData::Numeric(ca) => ca
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| v.is_none().then_some(i))
                .collect(),
            ColumnData::Text(ca) => ca
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| v.is_none().then_some(i))
                .collect(),
        }
    }
}

/// Ordered collection of equally long columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

// Each request builds and owns its table; it may move across worker threads.
static_assertions::assert_impl_all!(Table: Send, Sync);

impl Table {
    /// Create a table, checking that every column has the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let height = columns.first().map_or(0, Column::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != height) {
            return Err(CleanerError::Internal(format!(
                "column '{}' has {} rows, expected {}",
                bad.name,
                bad.len(),
                height
            )));
        }
        Ok(Self { columns, height })
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Number of occurrences of each column name.
    pub fn name_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for col in &self.columns {
            *counts.entry(col.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Unique keys for the columns in order: a repeated name's later
    /// occurrences become `name.1`, `name.2`, ... never reusing a real name.
    pub fn display_names(&self) -> Vec<String> {
        unique_keys(self.columns.iter().map(|c| c.name.as_str()))
    }

    /// Cells of row `idx`, in column order.
    pub fn row(&self, idx: usize) -> Vec<Cell> {
        self.columns.iter().map(|c| c.data.cell(idx)).collect()
    }

    pub(crate) fn row_key(&self, idx: usize) -> Vec<CellKey<'_>> {
        self.columns.iter().map(|c| c.data.key(idx)).collect()
    }

    /// For each row, whether it equals an earlier row (all cells equal,
    /// null equal to null).
    pub fn duplicate_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(self.height);
        (0..self.height)
            .map(|i| !seen.insert(self.row_key(i)))
            .collect()
    }

    /// Number of rows that duplicate an earlier row.
    pub fn duplicate_count(&self) -> usize {
        self.duplicate_mask().into_iter().filter(|d| *d).count()
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(Column::null_count).sum()
    }

    /// Keep only the rows whose mask entry is `true`.
    pub fn filter_rows(&self, keep: &[bool]) -> Result<Self> {
        if keep.len() != self.height {
            return Err(CleanerError::Internal(format!(
                "row mask has {} entries, table has {} rows",
                keep.len(),
                self.height
            )));
        }
        let mask: BooleanChunked = keep.iter().copied().collect();
        let columns = self
            .columns
            .iter()
            .map(|c| Ok(Column::new(c.name.clone(), c.data.filter(&mask)?)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            columns,
            height: keep.iter().filter(|k| **k).count(),
        })
    }

    /// Drop rows that duplicate an earlier row. Returns the number removed.
    pub fn drop_duplicate_rows(&self) -> Result<(Self, usize)> {
        let mask = self.duplicate_mask();
        let removed = mask.iter().filter(|d| **d).count();
        if removed == 0 {
            return Ok((self.clone(), 0));
        }
        let keep: Vec<bool> = mask.into_iter().map(|d| !d).collect();
        Ok((self.filter_rows(&keep)?, removed))
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Self {
        let len = n.min(self.height);
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.slice(len)))
                .collect(),
            height: len,
        }
    }

    /// Rows as ordered records keyed by [`Table::display_names`].
    pub fn records(&self) -> Vec<serde_json::Map<String, serde_json::Value>> {
        let names = self.display_names();
        (0..self.height)
            .map(|i| {
                names
                    .iter()
                    .zip(self.row(i))
                    .map(|(name, cell)| {
                        let value = serde_json::to_value(&cell).unwrap_or(serde_json::Value::Null);
                        (name.clone(), value)
                    })
                    .collect()
            })
            .collect()
    }

    /// Convert to a polars `DataFrame` (repeated names are made unique).
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .display_names()
            .into_iter()
            .zip(&self.columns)
            .map(|(name, col)| {
                let series = match &col.data {
                    ColumnData::Numeric(ca) => ca.clone().into_series(),
                    ColumnData::Text(ca) => ca.clone().into_series(),
                };
                polars::prelude::Column::from(series.with_name(PlSmallStr::from(name)))
            })
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}
