//! Statistical imputation methods.
//!
//! Numeric columns are filled with the mean, falling back to the median and
//! then 0. Text columns are filled with the mode, falling back to `Unknown`.

use crate::types::ColumnAction;
use crate::utils::string_mode;
use polars::prelude::*;

/// Placeholder written into text columns without a usable mode.
pub const UNKNOWN_FILL: &str = "Unknown";

/// Statistical imputation methods for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Choose the numeric fill: mean, else median, else 0.
    /// Non-finite statistics are skipped.
    pub fn numeric_fill(values: &Float64Chunked) -> (f64, ColumnAction) {
        if let Some(mean) = values.mean().filter(|m| m.is_finite()) {
            return (mean, ColumnAction::FilledMean { value: mean });
        }
        if let Some(median) = values.median().filter(|m| m.is_finite()) {
            return (median, ColumnAction::FilledMedian { value: median });
        }
        (0.0, ColumnAction::FilledZero)
    }

    /// Choose the text fill: most frequent value (smallest on ties), else
    /// [`UNKNOWN_FILL`].
    pub fn text_fill(values: &StringChunked) -> (String, ColumnAction) {
        match string_mode(values.into_iter().flatten()) {
            Some(mode) => (mode.clone(), ColumnAction::FilledMode { value: mode }),
            None => (UNKNOWN_FILL.to_string(), ColumnAction::FilledUnknown),
        }
    }

    /// Replace nulls with a value, producing a new array.
    pub fn fill_numeric_nulls(values: &Float64Chunked, fill_value: f64) -> Float64Chunked {
        values
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect()
    }

    /// Replace nulls with a value, producing a new array.
    pub fn fill_string_nulls(values: &StringChunked, fill_value: &str) -> StringChunked {
        values
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect()
    }

    /// Fill a numeric column. Returns the new values and the action taken.
    pub fn impute_numeric(values: &Float64Chunked) -> (Float64Chunked, ColumnAction) {
        let (fill_value, action) = Self::numeric_fill(values);
        (Self::fill_numeric_nulls(values, fill_value), action)
    }

    /// Fill a text column. Returns the new values and the action taken.
    pub fn impute_text(values: &StringChunked) -> (StringChunked, ColumnAction) {
        let (fill_value, action) = Self::text_fill(values);
        (Self::fill_string_nulls(values, &fill_value), action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_mean() {
        let values: Float64Chunked = [Some(1.0), None, Some(3.0)].into_iter().collect();
        let (filled, action) = StatisticalImputer::impute_numeric(&values);
        assert_eq!(action, ColumnAction::FilledMean { value: 2.0 });
        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(1), Some(2.0));
    }

    #[test]
    fn test_numeric_all_null_fills_zero() {
        let values: Float64Chunked = [None::<f64>, None].into_iter().collect();
        let (filled, action) = StatisticalImputer::impute_numeric(&values);
        assert_eq!(action, ColumnAction::FilledZero);
        assert_eq!(filled.get(0), Some(0.0));
        assert_eq!(filled.get(1), Some(0.0));
    }

    #[test]
    fn test_numeric_non_finite_mean_falls_back_to_median() {
        let values: Float64Chunked =
            [Some(f64::INFINITY), Some(f64::NEG_INFINITY), Some(1.0), None]
                .into_iter()
                .collect();
        let (_, action) = StatisticalImputer::numeric_fill(&values);
        assert_eq!(action, ColumnAction::FilledMedian { value: 1.0 });
    }

    #[test]
    fn test_text_mode_ties_pick_smallest() {
        let values: StringChunked = [Some("b"), Some("a"), None, Some("b"), Some("a")]
            .into_iter()
            .collect();
        let (filled, action) = StatisticalImputer::impute_text(&values);
        assert_eq!(
            action,
            ColumnAction::FilledMode {
                value: "a".to_string()
            }
        );
        assert_eq!(filled.get(2), Some("a"));
    }

    #[test]
    fn test_text_all_null_fills_unknown() {
        let values: StringChunked = [None::<&str>, None].into_iter().collect();
        let (filled, action) = StatisticalImputer::impute_text(&values);
        assert_eq!(action, ColumnAction::FilledUnknown);
        assert_eq!(filled.get(0), Some(UNKNOWN_FILL));
    }
}
