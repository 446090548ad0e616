use crate::loader::{Dataset, SourceFormat};
use crate::types::MissingValues;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Missing values and duplicates found in a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedIssues {
    pub missing_values: MissingValues,
    pub duplicates: usize,
}

/// Format-aware missing-value and duplicate detection.
///
/// Both detectors read the loaded table, so their counts agree with the
/// profiler on the same input.
pub struct IssueDetector;

impl IssueDetector {
    pub fn detect(dataset: &Dataset) -> DetectedIssues {
        DetectedIssues {
            missing_values: Self::detect_missing_values(dataset),
            duplicates: Self::detect_duplicates(dataset),
        }
    }

    /// Delimited text: missing count for every column.
    /// Structured records: ascending null row indices for columns with any
    /// missing value. Repeated column names are merged.
    pub fn detect_missing_values(dataset: &Dataset) -> MissingValues {
        let columns = dataset.table.columns();

        match dataset.format {
            SourceFormat::DelimitedText => {
                let mut counts: Vec<(String, usize)> = Vec::new();
                let mut index: HashMap<&str, usize> = HashMap::new();
                for col in columns {
                    match index.get(col.name.as_str()) {
                        Some(&i) => counts[i].1 += col.null_count(),
                        None => {
                            index.insert(col.name.as_str(), counts.len());
                            counts.push((col.name.clone(), col.null_count()));
                        }
                    }
                }
                MissingValues::Counts(counts)
            }
            SourceFormat::StructuredRecords => {
                let mut rows: Vec<(String, Vec<usize>)> = Vec::new();
                let mut index: HashMap<&str, usize> = HashMap::new();
                for col in columns.iter().filter(|c| c.null_count() > 0) {
                    let nulls = col.null_indices();
                    match index.get(col.name.as_str()) {
                        Some(&i) => {
                            let merged = &mut rows[i].1;
                            merged.extend(nulls);
                            merged.sort_unstable();
                            merged.dedup();
                        }
                        None => {
                            index.insert(col.name.as_str(), rows.len());
                            rows.push((col.name.clone(), nulls));
                        }
                    }
                }
                MissingValues::RowIndices(rows)
            }
        }
    }

    /// Delimited text: rows equal to an earlier row.
    /// Structured records: records whose canonical (key-sorted) serialization
    /// equals an earlier record's.
    pub fn detect_duplicates(dataset: &Dataset) -> usize {
        let table = &dataset.table;

        let duplicates = match dataset.format {
            SourceFormat::DelimitedText => table.duplicate_count(),
            SourceFormat::StructuredRecords => {
                let keys = table.display_names();
                let mut seen = HashSet::with_capacity(table.height());
                (0..table.height())
                    .filter(|&i| {
                        let record: BTreeMap<&str, Value> = keys
                            .iter()
                            .map(String::as_str)
                            .zip(table.row(i))
                            .map(|(k, cell)| {
                                (k, serde_json::to_value(&cell).unwrap_or(Value::Null))
                            })
                            .collect();
                        let canonical = serde_json::to_string(&record).unwrap_or_default();
                        !seen.insert(canonical)
                    })
                    .count()
            }
        };

        debug!("Detected {} duplicate records ({})", duplicates, dataset.format);
        duplicates
    }
}
