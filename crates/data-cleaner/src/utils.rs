//! Shared utilities for loading, profiling and cleaning.
//!
//! This module contains common helper functions used across multiple modules
//! to keep parsing and number formatting consistent.

use std::collections::{HashMap, HashSet};

// =============================================================================
// Missing Value Markers
// =============================================================================

/// Field values read as null in delimited text.
pub const NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN",
];

/// Check if a raw field is a missing-value marker.
#[inline]
pub fn is_na_marker(s: &str) -> bool {
    NA_MARKERS.contains(&s)
}

// =============================================================================
// Number Parsing & Formatting
// =============================================================================

/// Parse a string as a number, ignoring surrounding whitespace.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Whether a string coerces to a non-NaN number.
#[inline]
pub fn coerces_to_number(s: &str) -> bool {
    parse_number(s).is_some_and(|v| !v.is_nan())
}

/// Render a number as text. Integral values have no fractional part;
/// non-finite values have no rendering.
pub fn format_number(v: f64) -> Option<String> {
    if !v.is_finite() {
        None
    } else if v.fract() == 0.0 && v.abs() < 9.0e15 {
        Some(format!("{}", v as i64))
    } else {
        Some(v.to_string())
    }
}

/// Bit pattern identifying a number for equality and hashing.
/// `-0.0` maps to `0.0` and every NaN to one canonical NaN.
#[inline]
pub fn number_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

/// Round to a fixed number of decimals.
#[inline]
pub fn round_to(v: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (v * factor).round() / factor
}

/// Render a percentage in shortest form, keeping one decimal for whole
/// values (`50.0`, `33.33`).
pub fn format_percentage(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        format!("{}", v)
    }
}

/// Percentage of `part` in `total`, 0 when `total` is zero.
#[inline]
pub fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

// =============================================================================
// Column Names
// =============================================================================

/// Unique keys for a sequence of possibly repeated names: the first
/// occurrence keeps its name and later ones become `name.1`, `name.2`, ...
/// skipping any key that is already a real name or was generated earlier.
pub fn unique_keys<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let names: Vec<&str> = names.into_iter().collect();
    let mut taken: HashSet<String> = names.iter().map(|n| n.to_string()).collect();
    let mut first_seen: HashSet<&str> = HashSet::new();
    let mut next_suffix: HashMap<&str, usize> = HashMap::new();

    names
        .iter()
        .map(|&name| {
            if first_seen.insert(name) {
                return name.to_string();
            }
            let suffix = next_suffix.entry(name).or_insert(1);
            loop {
                let key = format!("{}.{}", name, suffix);
                *suffix += 1;
                if taken.insert(key.clone()) {
                    return key;
                }
            }
        })
        .collect()
}

// =============================================================================
// String Statistics
// =============================================================================

/// Most frequent value; ties resolve to the smallest value.
pub fn string_mode<'a, I>(values: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in values {
        *counts.entry(val).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(va, ca), (vb, cb)| ca.cmp(cb).then_with(|| vb.cmp(va)))
        .map(|(val, _)| val.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_na_markers() {
        assert!(is_na_marker(""));
        assert!(is_na_marker("NA"));
        assert!(is_na_marker("#N/A N/A"));
        assert!(!is_na_marker("na"));
        assert!(!is_na_marker(" NA"));
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number("-3.5e2"), Some(-350.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("   "), None);
    }

    #[test]
    fn test_coerces_to_number() {
        assert!(coerces_to_number("1.5"));
        assert!(!coerces_to_number("nan"));
        assert!(!coerces_to_number("twelve"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(30.0).as_deref(), Some("30"));
        assert_eq!(format_number(-2.5).as_deref(), Some("-2.5"));
        assert_eq!(format_number(f64::NAN), None);
        assert_eq!(format_number(f64::INFINITY), None);
    }

    #[test]
    fn test_number_key() {
        assert_eq!(number_key(0.0), number_key(-0.0));
        assert_eq!(number_key(f64::NAN), number_key(-f64::NAN));
        assert_ne!(number_key(1.0), number_key(2.0));
    }

    #[test]
    fn test_round_and_percentage() {
        assert_eq!(round_to(33.33333, 2), 33.33);
        assert!((percentage(1, 3) - 33.333).abs() < 1e-3);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(50.0), "50.0");
        assert_eq!(format_percentage(33.33), "33.33");
        assert_eq!(format_percentage(0.0), "0.0");
    }

    #[test]
    fn test_unique_keys() {
        assert_eq!(unique_keys(["a", "b", "a", "a"]), vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn test_unique_keys_skip_real_names() {
        assert_eq!(unique_keys(["a", "a", "a.1"]), vec!["a", "a.2", "a.1"]);
        assert_eq!(
            unique_keys(["a.1", "a", "a", "a"]),
            vec!["a.1", "a", "a.2", "a.3"]
        );
    }

    #[test]
    fn test_string_mode_ties_pick_smallest() {
        assert_eq!(string_mode(["b", "a", "b", "a"]), Some("a".to_string()));
        assert_eq!(string_mode(["x", "y", "y"]), Some("y".to_string()));
        assert_eq!(string_mode(Vec::<&str>::new()), None);
    }
}
