use crate::config::CleaningConfig;
use crate::utils::unique_keys;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Items serialized as a JSON object keyed by column name. Repeated names
/// are disambiguated with [`unique_keys`] so no entry is lost.
pub trait ColumnKeyed {
    fn column_name(&self) -> &str;
}

fn serialize_keyed<T, S>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
where
    T: ColumnKeyed + Serialize,
    S: Serializer,
{
    let keys = unique_keys(items.iter().map(ColumnKeyed::column_name));
    let mut map = serializer.serialize_map(Some(items.len()))?;
    for (key, item) in keys.iter().zip(items) {
        map.serialize_entry(key, item)?;
    }
    map.end()
}

// ============================================================================
// Analysis Report
// ============================================================================

/// Per-column profile. Read-only once computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    #[serde(skip)]
    pub name: String,
    pub dtype: String,
    pub missing_count: usize,
    /// Missing share in percent, rounded to 2 decimals.
    pub missing_percentage: f64,
    pub unique_count: usize,
    pub outlier_count: usize,
    pub mixed_capitalization: bool,
    pub is_numeric_like: bool,
    pub has_problem: bool,
    pub reasons: Vec<String>,
}

impl ColumnKeyed for ColumnProfile {
    fn column_name(&self) -> &str {
        &self.name
    }
}

/// Dataset-level counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub total_missing_values: usize,
    pub duplicate_rows: usize,
}

/// Output of the column profiler.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub overview: Overview,
    /// One profile per column occurrence, in column order.
    #[serde(serialize_with = "serialize_keyed")]
    pub column_details: Vec<ColumnProfile>,
}

static_assertions::assert_impl_all!(Report: Send, Sync);

impl Report {
    /// Profile of the first column with the given name.
    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_details.iter().find(|p| p.name == name)
    }
}

// ============================================================================
// Cleaning Summary
// ============================================================================

/// What happened (or is predicted to happen) to one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ColumnAction {
    Kept,
    Dropped { missing_percentage: f64 },
    FilledMean { value: f64 },
    FilledMedian { value: f64 },
    FilledZero,
    FilledMode { value: String },
    FilledUnknown,
}

impl ColumnAction {
    pub fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped { .. })
    }

    /// Human-readable description for a column.
    pub fn describe(&self, column: &str) -> String {
        match self {
            Self::Kept => format!("Kept '{}' unchanged", column),
            Self::Dropped { missing_percentage } => {
                format!("Dropped '{}' ({:.1}% missing)", column, missing_percentage)
            }
            Self::FilledMean { value } => format!("Filled '{}' with mean ({:.4})", column, value),
            Self::FilledMedian { value } => {
                format!("Filled '{}' with median ({:.4})", column, value)
            }
            Self::FilledZero => format!("Filled '{}' with 0", column),
            Self::FilledMode { value } => format!("Filled '{}' with mode '{}'", column, value),
            Self::FilledUnknown => format!("Filled '{}' with 'Unknown'", column),
        }
    }
}

/// Action applied to one column, under its original name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutcome {
    pub column: String,
    #[serde(flatten)]
    pub action: ColumnAction,
}

/// Column name before and after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// What the cleaning engine did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningSummary {
    pub original_column_count: usize,
    pub final_column_count: usize,
    pub dropped_column_count: usize,
    pub rows_before: usize,
    pub rows_after: usize,
    pub duplicate_rows_removed: usize,
    pub actions: Vec<ColumnOutcome>,
    pub renamed_columns: Vec<ColumnRename>,
    pub warnings: Vec<String>,
}

// ============================================================================
// Cleaning Preview
// ============================================================================

/// Basic facts about the uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub filename: String,
    pub file_type: String,
    pub total_rows: usize,
    pub total_columns: usize,
}

/// Predicted handling of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnPrediction {
    pub column_name: String,
    pub data_type: String,
    pub missing_count: usize,
    /// Missing share in percent, unrounded.
    pub missing_percentage: f64,
    pub unique_values: usize,
    pub will_be_dropped: bool,
    /// Fill label, `column will be dropped` or `no action needed`.
    pub fill_strategy: String,
}

impl ColumnKeyed for ColumnPrediction {
    fn column_name(&self) -> &str {
        &self.column_name
    }
}

/// Aggregate counts of a cleaning preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewSummary {
    pub total_missing_columns: usize,
    pub high_missing_columns: usize,
    pub columns_after_cleaning: usize,
    pub estimated_improvement: String,
}

/// Output of the cleaning predictor. Nothing is modified to produce it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningPreview {
    pub file_info: FileInfo,
    #[serde(serialize_with = "serialize_keyed")]
    pub missing_value_analysis: Vec<ColumnPrediction>,
    pub cleaning_strategy: CleaningConfig,
    pub predicted_actions: Vec<String>,
    pub columns_to_drop: Vec<String>,
    pub columns_to_fill: Vec<String>,
    pub summary: PreviewSummary,
}

// ============================================================================
// Issue Detection
// ============================================================================

/// Missing values found by the issue detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingValues {
    /// Delimited text: every column with its missing count.
    Counts(Vec<(String, usize)>),
    /// Structured records: columns with missing values and their null rows.
    RowIndices(Vec<(String, Vec<usize>)>),
}

impl MissingValues {
    /// Missing count per column name.
    pub fn counts(&self) -> Vec<(String, usize)> {
        match self {
            Self::Counts(counts) => counts.clone(),
            Self::RowIndices(rows) => rows
                .iter()
                .map(|(name, idx)| (name.clone(), idx.len()))
                .collect(),
        }
    }

    pub fn total(&self) -> usize {
        self.counts().iter().map(|(_, n)| n).sum()
    }
}

/// Serialized as a JSON object keyed by column name.
impl Serialize for MissingValues {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Counts(counts) => {
                let mut map = serializer.serialize_map(Some(counts.len()))?;
                for (name, count) in counts {
                    map.serialize_entry(name, count)?;
                }
                map.end()
            }
            Self::RowIndices(rows) => {
                let mut map = serializer.serialize_map(Some(rows.len()))?;
                for (name, idx) in rows {
                    map.serialize_entry(name, idx)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile(name: &str, missing: usize) -> ColumnProfile {
        ColumnProfile {
            name: name.to_string(),
            dtype: "numeric".to_string(),
            missing_count: missing,
            missing_percentage: 0.0,
            unique_count: 1,
            outlier_count: 0,
            mixed_capitalization: false,
            is_numeric_like: false,
            has_problem: missing > 0,
            reasons: vec![],
        }
    }

    #[test]
    fn test_report_serializes_repeated_names() {
        let report = Report {
            overview: Overview {
                rows: 1,
                columns: 2,
                total_missing_values: 1,
                duplicate_rows: 0,
            },
            column_details: vec![profile("a", 0), profile("a", 1)],
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["column_details"]["a"]["missing_count"], json!(0));
        assert_eq!(value["column_details"]["a.1"]["missing_count"], json!(1));
        assert!(value["column_details"]["a"].get("name").is_none());
        assert_eq!(report.column("a").unwrap().missing_count, 0);
    }

    #[test]
    fn test_column_outcome_is_flat() {
        let outcome = ColumnOutcome {
            column: "age".to_string(),
            action: ColumnAction::FilledMean { value: 31.5 },
        };
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({ "column": "age", "action": "filled_mean", "value": 31.5 })
        );
    }

    #[test]
    fn test_action_describe() {
        let dropped = ColumnAction::Dropped {
            missing_percentage: 85.0,
        };
        assert!(dropped.is_dropped());
        assert_eq!(dropped.describe("notes"), "Dropped 'notes' (85.0% missing)");
        assert_eq!(
            ColumnAction::FilledUnknown.describe("city"),
            "Filled 'city' with 'Unknown'"
        );
    }

    #[test]
    fn test_missing_values_serialization() {
        let rows = MissingValues::RowIndices(vec![("b".to_string(), vec![0, 2])]);
        assert_eq!(serde_json::to_value(&rows).unwrap(), json!({ "b": [0, 2] }));
        assert_eq!(rows.total(), 2);

        let counts = MissingValues::Counts(vec![("a".to_string(), 0), ("b".to_string(), 3)]);
        assert_eq!(
            serde_json::to_value(&counts).unwrap(),
            json!({ "a": 0, "b": 3 })
        );
    }
}
