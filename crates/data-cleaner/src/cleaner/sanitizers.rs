//! Value and column-name sanitization.

use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

static DISALLOWED_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9_]").expect("valid column name regex"));

/// Trim surrounding whitespace from every non-null value.
pub(crate) fn trim_text(values: &StringChunked) -> StringChunked {
    values.into_iter().map(|v| v.map(str::trim)).collect()
}

/// Normalize a column name: trim, lowercase, spaces to underscores, then
/// drop every character outside `[a-z0-9_]`.
pub(crate) fn normalize_column_name(name: &str) -> String {
    let lowered = name.trim().to_lowercase().replace(' ', "_");
    DISALLOWED_NAME_CHARS.replace_all(&lowered, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("  First Name "), "first_name");
        assert_eq!(normalize_column_name("Price ($)"), "price_");
        assert_eq!(normalize_column_name("Unnamed: 0"), "unnamed_0");
        assert_eq!(normalize_column_name("Café-Größe"), "cafgre");
        assert_eq!(normalize_column_name("already_ok_1"), "already_ok_1");
    }

    #[test]
    fn test_normalize_is_stable() {
        for name in ["  Mixed Case ", "a.b[0]", "Total (USD)"] {
            let once = normalize_column_name(name);
            assert_eq!(normalize_column_name(&once), once);
        }
    }

    #[test]
    fn test_trim_text_keeps_nulls() {
        let values: StringChunked = [Some("  a "), None, Some("b")].into_iter().collect();
        let trimmed = trim_text(&values);
        assert_eq!(trimmed.get(0), Some("a"));
        assert_eq!(trimmed.get(1), None);
        assert_eq!(trimmed.get(2), Some("b"));
    }
}
