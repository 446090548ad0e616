//! Statistical checks used by the column profiler.

use crate::utils::coerces_to_number;
use polars::prelude::*;
use std::collections::HashSet;
use tracing::warn;

/// Count values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]`, with linearly
/// interpolated quartiles over non-null values. Degrades to 0.
pub(crate) fn outlier_count(values: &Float64Chunked, multiplier: f64) -> usize {
    let quartiles = values
        .quantile(0.25, QuantileMethod::Linear)
        .and_then(|q1| Ok((q1, values.quantile(0.75, QuantileMethod::Linear)?)));

    let (q1, q3) = match quartiles {
        Ok((Some(q1), Some(q3))) => (q1, q3),
        Ok(_) => return 0,
        Err(e) => {
            warn!("Quartile computation failed: {}", e);
            return 0;
        }
    };

    let iqr = q3 - q1;
    let lower_bound = q1 - multiplier * iqr;
    let upper_bound = q3 + multiplier * iqr;

    values
        .into_iter()
        .flatten()
        .filter(|v| *v < lower_bound || *v > upper_bound)
        .count()
}

/// Whether at least `ratio` of the distinct values collapse when lowercased.
pub(crate) fn has_mixed_capitalization(values: &StringChunked, ratio: f64) -> bool {
    let unique: HashSet<&str> = values.into_iter().flatten().collect();
    if unique.is_empty() {
        return false;
    }
    let lowered: HashSet<String> = unique.iter().map(|s| s.to_lowercase()).collect();

    let diff_ratio = (unique.len() - lowered.len()) as f64 / unique.len() as f64;
    diff_ratio >= ratio
}

/// Whether more than `percentage` percent of all cells coerce to a number.
/// Null cells count as failures.
pub(crate) fn is_numeric_like(values: &StringChunked, percentage: f64) -> bool {
    if values.is_empty() {
        return false;
    }
    let numeric = values
        .into_iter()
        .flatten()
        .filter(|s| coerces_to_number(s))
        .count();

    numeric as f64 / values.len() as f64 * 100.0 > percentage
}
