//! Property-based tests for profiling, detection and cleaning.
//!
//! These tests use proptest to generate random tables and verify that the
//! engine keeps its invariants on all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p data-cleaner --test property_tests
//!
//! # More cases
//! PROPTEST_CASES=10000 cargo test -p data-cleaner --test property_tests
//! ```

use proptest::prelude::*;

use data_cleaner::{
    CleaningConfig, CleaningEngine, Column, DataProfiler, Dataset, FillStrategy, IssueDetector,
    SourceFormat, Table,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Numeric cells drawn from a small range so duplicates are common.
fn numeric_cells(height: usize) -> impl Strategy<Value = Vec<Option<f64>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            3 => (-5i32..5).prop_map(|v| Some(f64::from(v))),
        ],
        height,
    )
}

/// Text cells with case and whitespace variants.
fn text_cells(height: usize) -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(
        prop_oneof![
            1 => Just(None),
            3 => prop::sample::select(vec!["a", "A", " a ", "b", "B", "c", "Oslo", "oslo"])
                .prop_map(|s| Some(s.to_string())),
        ],
        height,
    )
}

/// Lowercase-only text cells.
fn lowercase_cells(height: usize) -> impl Strategy<Value = Vec<Option<String>>> {
    prop::collection::vec(proptest::option::of("[a-z ]{0,6}"), height)
}

/// A column of either kind with a name that normalization leaves unchanged.
fn column(index: usize, height: usize) -> impl Strategy<Value = Column> {
    let name = format!("c{}", index);
    let text_name = name.clone();
    prop_oneof![
        numeric_cells(height).prop_map(move |cells| Column::numeric(name.clone(), cells)),
        text_cells(height).prop_map(move |cells| Column::text(text_name.clone(), cells)),
    ]
}

fn table() -> impl Strategy<Value = Table> {
    (0usize..12, 1usize..5).prop_flat_map(|(height, width)| {
        (0..width)
            .map(|i| column(i, height))
            .collect::<Vec<_>>()
            .prop_map(|columns| Table::new(columns).expect("equal column lengths"))
    })
}

fn strategy() -> impl Strategy<Value = FillStrategy> {
    prop::sample::select(vec![FillStrategy::Auto, FillStrategy::Drop, FillStrategy::Fill])
}

fn engine(threshold: f64, fill_strategy: FillStrategy) -> CleaningEngine {
    CleaningEngine::new(
        CleaningConfig::builder()
            .missing_threshold(threshold)
            .fill_strategy(fill_strategy)
            .build()
            .expect("valid config"),
    )
}

fn rows(table: &Table) -> Vec<Vec<data_cleaner::Cell>> {
    (0..table.height()).map(|i| table.row(i)).collect()
}

// =============================================================================
// Profiling
// =============================================================================

proptest! {
    #[test]
    fn total_missing_is_sum_of_column_missing(table in table()) {
        let report = DataProfiler::profile(&table);
        let sum: usize = report.column_details.iter().map(|p| p.missing_count).sum();
        prop_assert_eq!(report.overview.total_missing_values, sum);
        prop_assert_eq!(report.overview.total_missing_values, table.total_missing());
    }

    #[test]
    fn lowercase_text_is_never_mixed_capitalization(
        cells in (0usize..15).prop_flat_map(lowercase_cells)
    ) {
        let table = Table::new(vec![Column::text("city", cells)]).unwrap();
        let report = DataProfiler::profile(&table);
        prop_assert!(!report.column_details[0].mixed_capitalization);
    }

    #[test]
    fn missing_percentage_is_bounded(table in table()) {
        let report = DataProfiler::profile(&table);
        for profile in &report.column_details {
            prop_assert!((0.0..=100.0).contains(&profile.missing_percentage));
            prop_assert!(profile.missing_count <= report.overview.rows);
        }
    }
}

// =============================================================================
// Detection
// =============================================================================

proptest! {
    #[test]
    fn detector_agrees_with_profiler(table in table(), records in any::<bool>()) {
        let format = if records {
            SourceFormat::StructuredRecords
        } else {
            SourceFormat::DelimitedText
        };
        let report = DataProfiler::profile(&table);
        let dataset = Dataset { table, format };
        let issues = IssueDetector::detect(&dataset);

        prop_assert_eq!(issues.duplicates, report.overview.duplicate_rows);
        prop_assert_eq!(issues.missing_values.total(), report.overview.total_missing_values);
    }
}

// =============================================================================
// Cleaning
// =============================================================================

proptest! {
    #[test]
    fn cleaning_is_idempotent(
        table in table(),
        threshold in 0.0f64..=1.0,
        fill_strategy in strategy(),
    ) {
        let engine = engine(threshold, fill_strategy);
        let (once, _) = engine.clean(&table).unwrap();
        let (twice, summary) = engine.clean(&once).unwrap();

        prop_assert_eq!(once.column_names(), twice.column_names());
        prop_assert_eq!(rows(&once), rows(&twice));
        prop_assert_eq!(summary.duplicate_rows_removed, 0);
    }

    #[test]
    fn high_missing_columns_are_dropped_unless_filling(
        table in table(),
        threshold in 0.0f64..=1.0,
        fill_strategy in strategy(),
    ) {
        let (cleaned, summary) = engine(threshold, fill_strategy).clean(&table).unwrap();
        let remaining = cleaned.column_names();
        let (deduped, _) = table.drop_duplicate_rows().unwrap();

        for col in deduped.columns() {
            let dropped = col.missing_fraction() >= threshold;
            if fill_strategy == FillStrategy::Fill {
                prop_assert!(remaining.contains(&col.name));
            } else if dropped {
                prop_assert!(!remaining.contains(&col.name));
            }
        }
        prop_assert_eq!(
            summary.dropped_column_count,
            summary.original_column_count - summary.final_column_count
        );
    }

    #[test]
    fn cleaned_tables_have_no_missing_values(
        table in table(),
        threshold in 0.0f64..=1.0,
        fill_strategy in strategy(),
    ) {
        let (cleaned, summary) = engine(threshold, fill_strategy).clean(&table).unwrap();
        prop_assert_eq!(cleaned.total_missing(), 0);
        prop_assert_eq!(cleaned.duplicate_count(), 0);
        prop_assert!(summary.rows_after <= summary.rows_before);
    }
}
