//! Rule-based recommendations from a profiling report.

use crate::config::ProfilerConfig;
use crate::table::Table;
use crate::types::Report;
use crate::utils::format_percentage;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Recommendation emitted when no rule fires.
pub const NO_ISSUES_MESSAGE: &str = "Good News: No major data quality issues found!";

static UNNAMED_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^unnamed:").expect("valid header regex"));

/// Turns a [`Report`] into ordered, human-readable suggestions.
///
/// Dataset-level rules come first (duplicates, missing values, headers),
/// then per-column rules in column order.
pub struct RecommendationEngine {
    config: ProfilerConfig,
}

impl Default for RecommendationEngine {
    fn default() -> Self {
        Self::new(ProfilerConfig::default())
    }
}

impl RecommendationEngine {
    pub fn new(config: ProfilerConfig) -> Self {
        Self { config }
    }

    pub fn recommend(&self, table: &Table, report: &Report) -> Vec<String> {
        let mut recommendations = Vec::new();
        let overview = &report.overview;

        if overview.duplicate_rows > 0 {
            recommendations.push(format!(
                "Found {} duplicate rows. Consider removing them.",
                overview.duplicate_rows
            ));
        }

        if overview.total_missing_values > 0 {
            recommendations.push(
                "The dataset contains missing values. Consider a strategy to fill or remove them."
                    .to_string(),
            );
        }

        if table
            .columns()
            .iter()
            .any(|c| UNNAMED_HEADER.is_match(&c.name))
        {
            recommendations.push("The file seems to be missing proper headers.".to_string());
        }

        for profile in &report.column_details {
            let name = &profile.name;
            if profile.missing_percentage > self.config.high_missing_percentage {
                recommendations.push(format!(
                    "Column '{}' is {}% empty. Consider dropping it.",
                    name,
                    format_percentage(profile.missing_percentage)
                ));
            }
            if profile.mixed_capitalization {
                recommendations.push(format!(
                    "Column '{}' has inconsistent capitalization. Standardize it.",
                    name
                ));
            }
            if profile.is_numeric_like {
                recommendations.push(format!(
                    "Column '{}' seems numeric but is stored as text. Convert its data type.",
                    name
                ));
            }
            if profile.outlier_count > 0 {
                recommendations.push(format!(
                    "Column '{}' has {} potential outliers.",
                    name, profile.outlier_count
                ));
            }
        }

        if recommendations.is_empty() {
            recommendations.push(NO_ISSUES_MESSAGE.to_string());
        }

        debug!("Generated {} recommendations", recommendations.len());
        recommendations
    }
}
