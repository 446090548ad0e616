//! Column profiling for dataset analysis.
//!
//! This module computes, for every column by position:
//! - Missing counts and percentages
//! - Distinct value counts
//! - IQR outlier counts (numeric columns)
//! - Capitalization and numeric-looking checks (text columns)
//!
//! plus a dataset overview with duplicate rows and total missing values.

mod statistics;

pub(crate) use statistics::{has_mixed_capitalization, is_numeric_like, outlier_count};

use crate::config::ProfilerConfig;
use crate::table::{Column, ColumnData, Table};
use crate::types::{ColumnProfile, Overview, Report};
use crate::utils::{format_percentage, percentage, round_to};
use std::collections::HashMap;
use tracing::{debug, info};

/// Data profiler for analyzing table structure and quality.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile a table with the default heuristics.
    pub fn profile(table: &Table) -> Report {
        Self::profile_with(table, &ProfilerConfig::default())
    }

    /// Profile every column and compute the dataset overview.
    ///
    /// Statistics that cannot be computed degrade to 0 / false, so profiling
    /// never fails.
    pub fn profile_with(table: &Table, config: &ProfilerConfig) -> Report {
        let name_counts = table.name_counts();

        let column_details: Vec<ColumnProfile> = table
            .columns()
            .iter()
            .map(|col| Self::profile_column(col, table.height(), &name_counts, config))
            .collect();

        let overview = Overview {
            rows: table.height(),
            columns: table.width(),
            total_missing_values: column_details.iter().map(|p| p.missing_count).sum(),
            duplicate_rows: table.duplicate_count(),
        };

        info!(
            "Profiled {} columns: {} missing values, {} duplicate rows",
            overview.columns, overview.total_missing_values, overview.duplicate_rows
        );

        Report {
            overview,
            column_details,
        }
    }

    fn profile_column(
        col: &Column,
        rows: usize,
        name_counts: &HashMap<&str, usize>,
        config: &ProfilerConfig,
    ) -> ColumnProfile {
        let missing_count = col.null_count();
        let missing_percentage = round_to(percentage(missing_count, rows), 2);

        let (outliers, mixed_capitalization, numeric_like) = match &col.data {
            ColumnData::Numeric(values) => {
                (outlier_count(values, config.iqr_multiplier), false, false)
            }
            ColumnData::Text(values) => (
                0,
                has_mixed_capitalization(values, config.capitalization_ratio),
                is_numeric_like(values, config.numeric_like_percentage),
            ),
        };

        let mut reasons = Vec::new();
        if missing_percentage > config.high_missing_percentage {
            reasons.push(format!(
                "High missing rate: {}%",
                format_percentage(missing_percentage)
            ));
        }
        if mixed_capitalization {
            reasons.push("Inconsistent capitalization".to_string());
        }
        if outliers > 0 {
            reasons.push(format!("{} potential outliers", outliers));
        }
        if numeric_like {
            reasons.push("Numeric-looking strings".to_string());
        }

        let duplicated_name = name_counts.get(col.name.as_str()).copied().unwrap_or(0) > 1;
        if duplicated_name {
            reasons.push(format!("Duplicate column name: {}", col.name));
        }

        debug!(
            "Column '{}': {} missing, {} outliers, reasons: {:?}",
            col.name, missing_count, outliers, reasons
        );

        ColumnProfile {
            name: col.name.clone(),
            dtype: col.kind().label().to_string(),
            missing_count,
            missing_percentage,
            unique_count: col.data.unique_count(),
            outlier_count: outliers,
            mixed_capitalization,
            is_numeric_like: numeric_like,
            has_problem: duplicated_name || missing_count > 0,
            reasons,
        }
    }
}
