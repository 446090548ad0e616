//! Dry-run prediction of the cleaning engine.

use crate::config::{CleaningConfig, ProfilerConfig};
use crate::table::{ColumnKind, Table};
use crate::types::{CleaningPreview, ColumnPrediction, FileInfo, PreviewSummary};
use crate::utils::percentage;
use tracing::{debug, info, warn};

/// Predicts what [`CleaningEngine`](super::CleaningEngine) will do to each
/// column without modifying anything.
pub struct CleaningPredictor {
    config: CleaningConfig,
    profiler_config: ProfilerConfig,
}

impl CleaningPredictor {
    pub fn new(config: CleaningConfig) -> Self {
        Self::with_profiler_config(config, ProfilerConfig::default())
    }

    pub fn with_profiler_config(config: CleaningConfig, profiler_config: ProfilerConfig) -> Self {
        Self {
            config,
            profiler_config,
        }
    }

    /// Label describing how missing values in a kept column will be filled.
    fn fill_label(&self, kind: ColumnKind, fraction: f64) -> &'static str {
        let high_rate = fraction > self.profiler_config.predictor_high_missing_fraction;
        match (kind, high_rate) {
            (ColumnKind::Numeric, true) => "median (high missing rate)",
            (ColumnKind::Numeric, false) => "mean",
            (ColumnKind::Text, true) => "Unknown (high missing rate)",
            (ColumnKind::Text, false) => "mode",
        }
    }

    /// Predict per-column actions.
    ///
    /// Missing statistics are taken after duplicate rows are removed, the
    /// same point at which cleaning decides what to drop.
    pub fn predict(&self, table: &Table, file_info: FileInfo) -> CleaningPreview {
        let deduped = match table.drop_duplicate_rows() {
            Ok((deduped, removed)) => {
                if removed > 0 {
                    debug!("Predicting over {} rows after removing duplicates", deduped.height());
                }
                deduped
            }
            Err(e) => {
                warn!("Duplicate removal failed, predicting over all rows: {}", e);
                table.clone()
            }
        };
        let table = &deduped;
        let rows = table.height();
        let mut analysis = Vec::with_capacity(table.width());
        let mut predicted_actions = Vec::new();
        let mut columns_to_drop = Vec::new();
        let mut columns_to_fill = Vec::new();

        for col in table.columns() {
            let missing_count = col.null_count();
            let fraction = col.missing_fraction();
            let missing_percentage = percentage(missing_count, rows);
            let will_be_dropped = self.config.should_drop(fraction);

            let fill_strategy = if will_be_dropped {
                columns_to_drop.push(col.name.clone());
                predicted_actions.push(format!(
                    "Drop column '{}' ({:.1}% missing)",
                    col.name, missing_percentage
                ));
                "column will be dropped"
            } else if missing_count > 0 {
                let label = self.fill_label(col.kind(), fraction);
                columns_to_fill.push(col.name.clone());
                predicted_actions.push(format!(
                    "Fill missing values in '{}' using {}",
                    col.name, label
                ));
                label
            } else {
                "no action needed"
            };

            debug!("Column '{}': {}", col.name, fill_strategy);

            analysis.push(ColumnPrediction {
                column_name: col.name.clone(),
                data_type: col.kind().label().to_string(),
                missing_count,
                missing_percentage,
                unique_values: col.data.unique_count(),
                will_be_dropped,
                fill_strategy: fill_strategy.to_string(),
            });
        }

        let total_columns = table.width();
        let high_missing_columns = columns_to_drop.len();
        let summary = PreviewSummary {
            total_missing_columns: table.columns().iter().filter(|c| c.null_count() > 0).count(),
            high_missing_columns,
            columns_after_cleaning: total_columns - high_missing_columns,
            estimated_improvement: format!(
                "{:.1}% reduction in problematic columns",
                percentage(high_missing_columns, total_columns)
            ),
        };

        info!(
            "Predicted {} columns to drop and {} to fill",
            columns_to_drop.len(),
            columns_to_fill.len()
        );

        CleaningPreview {
            file_info,
            missing_value_analysis: analysis,
            cleaning_strategy: self.config,
            predicted_actions,
            columns_to_drop,
            columns_to_fill,
            summary,
        }
    }
}
