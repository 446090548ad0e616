//! Data cleaning for loaded tables.
//!
//! This module provides functionality for:
//! - Removing duplicate rows
//! - Dropping columns at or above the missing threshold
//! - Imputing missing values (mean / median / 0, mode / `Unknown`)
//! - Trimming text values and normalizing column names
//! - Predicting all of the above without touching the data

mod predictor;
mod sanitizers;

pub use predictor::CleaningPredictor;

use crate::config::CleaningConfig;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::table::{Column, ColumnData, Table};
use crate::types::{ColumnAction, ColumnOutcome, ColumnRename, CleaningSummary};
use crate::utils::round_to;
use sanitizers::{normalize_column_name, trim_text};
use tracing::{debug, info, warn};

/// Configurable cleaning pipeline.
///
/// Cleaning works on new column buffers; the input table is never modified.
///
/// # Example
///
/// ```rust,ignore
/// use data_cleaner::{CleaningConfig, CleaningEngine};
///
/// let engine = CleaningEngine::new(CleaningConfig::default());
/// let (cleaned, summary) = engine.clean(&table)?;
/// println!("Dropped {} columns", summary.dropped_column_count);
/// ```
pub struct CleaningEngine {
    config: CleaningConfig,
}

impl CleaningEngine {
    pub fn new(config: CleaningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Clean a table.
    ///
    /// Steps, in order:
    /// 1. Remove exact-duplicate rows
    /// 2. Drop columns whose missing fraction reaches the threshold (kept
    ///    under the `fill` strategy)
    /// 3. Fill numeric gaps with mean, then median, then 0
    /// 4. Fill text gaps with the mode, then `Unknown`
    /// 5. Trim whitespace in text columns
    /// 6. Normalize column names
    /// 7. Remove rows made identical by steps 3 - 5
    pub fn clean(&self, table: &Table) -> Result<(Table, CleaningSummary)> {
        info!(
            "Cleaning {} rows x {} columns (threshold {}, strategy {})",
            table.height(),
            table.width(),
            self.config.missing_threshold,
            self.config.fill_strategy
        );

        let mut warnings = Vec::new();

        // 1. Duplicate rows
        let (deduped, mut duplicate_rows_removed) = table.drop_duplicate_rows()?;
        if duplicate_rows_removed > 0 {
            debug!("Removed {} duplicate rows", duplicate_rows_removed);
        }

        let mut columns = Vec::with_capacity(deduped.width());
        let mut actions = Vec::with_capacity(deduped.width());
        let mut renamed_columns = Vec::new();

        for col in deduped.columns() {
            let fraction = col.missing_fraction();

            // 2. High-missing columns
            if fraction >= self.config.missing_threshold && deduped.height() > 0 {
                let message = if self.config.should_drop(fraction) {
                    format!(
                        "Column '{}' has {:.1}% missing values - dropped",
                        col.name,
                        fraction * 100.0
                    )
                } else {
                    format!(
                        "Column '{}' has {:.1}% missing values - kept and filled",
                        col.name,
                        fraction * 100.0
                    )
                };
                warn!("{}", message);
                warnings.push(message);
            }
            if self.config.should_drop(fraction) {
                actions.push(ColumnOutcome {
                    column: col.name.clone(),
                    action: ColumnAction::Dropped {
                        missing_percentage: round_to(fraction * 100.0, 2),
                    },
                });
                continue;
            }

            // 3-5. Imputation and trimming
            let (data, action) = Self::clean_values(col, &mut warnings);
            actions.push(ColumnOutcome {
                column: col.name.clone(),
                action,
            });

            // 6. Column names
            let name = normalize_column_name(&col.name);
            if name != col.name {
                renamed_columns.push(ColumnRename {
                    from: col.name.clone(),
                    to: name.clone(),
                });
            }
            columns.push(Column::new(name, data));
        }

        let dropped = deduped.width() - columns.len();
        if dropped > 0 {
            info!(
                "Dropped {} columns with >= {:.1}% missing values",
                dropped,
                self.config.missing_threshold * 100.0
            );
        }

        // 7. Rows that became identical
        let (cleaned, collapsed) = if columns.is_empty() {
            (Table::default(), 0)
        } else {
            Table::new(columns)?.drop_duplicate_rows()?
        };
        if collapsed > 0 {
            debug!("Removed {} rows made identical by cleaning", collapsed);
            duplicate_rows_removed += collapsed;
        }

        let summary = CleaningSummary {
            original_column_count: table.width(),
            final_column_count: cleaned.width(),
            dropped_column_count: table.width() - cleaned.width(),
            rows_before: table.height(),
            rows_after: cleaned.height(),
            duplicate_rows_removed,
            actions,
            renamed_columns,
            warnings,
        };

        info!(
            "Cleaning complete: {} -> {} columns, {} -> {} rows",
            summary.original_column_count,
            summary.final_column_count,
            summary.rows_before,
            summary.rows_after
        );

        Ok((cleaned, summary))
    }

    /// Fill missing values and trim text for one kept column.
    fn clean_values(col: &Column, warnings: &mut Vec<String>) -> (ColumnData, ColumnAction) {
        match &col.data {
            ColumnData::Numeric(values) => {
                if values.null_count() == 0 {
                    return (col.data.clone(), ColumnAction::Kept);
                }
                let (filled, action) = StatisticalImputer::impute_numeric(values);
                match &action {
                    ColumnAction::FilledZero => {
                        let message =
                            format!("Column '{}' had no usable values - filled with 0", col.name);
                        warn!("{}", message);
                        warnings.push(message);
                    }
                    ColumnAction::FilledMedian { .. } => {
                        let message = format!(
                            "Column '{}' filled with median due to unusable mean",
                            col.name
                        );
                        warn!("{}", message);
                        warnings.push(message);
                    }
                    _ => {}
                }
                debug!("{}", action.describe(&col.name));
                (ColumnData::Numeric(filled), action)
            }
            ColumnData::Text(values) => {
                let (filled, action) = if values.null_count() == 0 {
                    (values.clone(), ColumnAction::Kept)
                } else {
                    StatisticalImputer::impute_text(values)
                };
                if action == ColumnAction::FilledUnknown {
                    let message = format!(
                        "Column '{}' had all null values - filled with 'Unknown'",
                        col.name
                    );
                    warn!("{}", message);
                    warnings.push(message);
                }
                debug!("{}", action.describe(&col.name));
                (ColumnData::Text(trim_text(&filled)), action)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FillStrategy;
    use crate::loader::read_delimited;
    use crate::table::{Cell, ColumnKind};
    use pretty_assertions::assert_eq;

    fn engine(threshold: f64, strategy: FillStrategy) -> CleaningEngine {
        CleaningEngine::new(
            CleaningConfig::builder()
                .missing_threshold(threshold)
                .fill_strategy(strategy)
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_clean_basic() {
        let table = read_delimited(
            "First Name,Age,Notes\n alice ,30,\nbob,,\nalice,30,\n alice ,30,\ncarl,40,\n",
        )
        .unwrap();
        let (cleaned, summary) = engine(0.8, FillStrategy::Auto).clean(&table).unwrap();

        assert_eq!(cleaned.column_names(), vec!["first_name", "age"]);
        assert_eq!(summary.original_column_count, 3);
        assert_eq!(summary.final_column_count, 2);
        assert_eq!(summary.dropped_column_count, 1);
        // exact duplicate " alice ",30 removed first; "alice" rows collapse after trimming
        assert_eq!(summary.duplicate_rows_removed, 2);
        assert_eq!(cleaned.height(), 3);
        assert_eq!(cleaned.total_missing(), 0);
        assert_eq!(
            cleaned.row(0),
            vec![Cell::Text("alice".to_string()), Cell::Number(30.0)]
        );
        assert!(
            summary
                .renamed_columns
                .iter()
                .any(|r| r.from == "First Name" && r.to == "first_name")
        );
    }

    #[test]
    fn test_input_not_mutated() {
        let table = read_delimited("a,b\n1,\n1,\n2,x\n").unwrap();
        let before = table.clone();
        let _ = engine(0.8, FillStrategy::Auto).clean(&table).unwrap();
        assert_eq!(table.height(), before.height());
        assert_eq!(table.total_missing(), before.total_missing());
    }

    #[test]
    fn test_fill_strategy_keeps_all_null_numeric_column() {
        let table = Table::new(vec![
            Column::numeric("id", vec![Some(1.0), Some(2.0)]),
            Column::numeric("empty", vec![None, None]),
        ])
        .unwrap();
        let (cleaned, summary) = engine(0.8, FillStrategy::Fill).clean(&table).unwrap();

        assert_eq!(cleaned.width(), 2);
        assert_eq!(cleaned.columns()[1].kind(), ColumnKind::Numeric);
        assert_eq!(cleaned.row(0)[1], Cell::Number(0.0));
        assert_eq!(summary.actions[1].action, ColumnAction::FilledZero);
        assert!(!summary.warnings.is_empty());
    }

    #[test]
    fn test_drop_behaves_as_auto() {
        let table = read_delimited("a,b\n1,\n2,\n3,\n4,x\n").unwrap();
        let auto = engine(0.75, FillStrategy::Auto).clean(&table).unwrap();
        let drop = engine(0.75, FillStrategy::Drop).clean(&table).unwrap();

        assert_eq!(auto.0.column_names(), vec!["a"]);
        assert_eq!(auto.0.column_names(), drop.0.column_names());
        assert_eq!(auto.1, drop.1);
    }

    #[test]
    fn test_threshold_one_keeps_complete_columns() {
        let table = read_delimited("a,b\n1,2\n3,4\n").unwrap();
        let (cleaned, _) = engine(1.0, FillStrategy::Auto).clean(&table).unwrap();
        assert_eq!(cleaned.width(), 2);
    }

    #[test]
    fn test_text_mode_fill() {
        let table = read_delimited("c,d\nx,1\ny,2\ny,3\n,4\n").unwrap();
        let (cleaned, summary) = engine(0.8, FillStrategy::Auto).clean(&table).unwrap();
        assert_eq!(
            summary.actions[0].action,
            ColumnAction::FilledMode {
                value: "y".to_string()
            }
        );
        assert_eq!(cleaned.total_missing(), 0);
    }

    #[test]
    fn test_idempotent() {
        let table = read_delimited("Name,Age\nalice,30\nALICE,30\nbob,\n alice,30\n").unwrap();
        let engine = engine(0.8, FillStrategy::Auto);
        let (once, _) = engine.clean(&table).unwrap();
        let (twice, summary) = engine.clean(&once).unwrap();

        assert_eq!(once.column_names(), twice.column_names());
        assert_eq!(once.records(), twice.records());
        assert_eq!(summary.duplicate_rows_removed, 0);
        assert!(summary.renamed_columns.is_empty());
    }
}
