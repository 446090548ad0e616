//! Data Quality Analysis and Cleaning Library
//!
//! Analyzes uploaded tabular datasets (CSV or JSON) for data-quality issues
//! and produces cleaned versions, built with Rust and Polars.
//!
//! # Overview
//!
//! This library provides:
//!
//! - **Loading**: UTF-8 / Latin-1 decoding, delimiter detection, JSON records
//!   and nested objects
//! - **Profiling**: Missing values, distinct counts, IQR outliers, mixed
//!   capitalization and numeric-looking text per column
//! - **Recommendations**: Ordered, human-readable suggestions from a report
//! - **Issue Detection**: Format-aware missing-value and duplicate detection
//! - **Cleaning**: Duplicate removal, threshold-based column dropping,
//!   mean/median/mode imputation, whitespace trimming and name normalization
//! - **Preview**: A dry run that predicts cleaning impact without touching data
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_cleaner::{CleaningConfig, FillStrategy, Pipeline};
//!
//! let bytes = std::fs::read("customers.csv")?;
//!
//! // Analyze
//! let pipeline = Pipeline::builder().build()?;
//! let analysis = pipeline.analyze(&bytes, "customers.csv")?;
//! for recommendation in &analysis.recommendations {
//!     println!("- {}", recommendation);
//! }
//!
//! // Preview, then clean with a custom configuration
//! let config = CleaningConfig::builder()
//!     .missing_threshold(0.6)
//!     .fill_strategy(FillStrategy::Auto)
//!     .build()?;
//! let pipeline = Pipeline::builder().cleaning_config(config).build()?;
//!
//! let preview = pipeline.preview(&bytes, "customers.csv")?;
//! println!("Will drop: {:?}", preview.columns_to_drop);
//!
//! let cleaned = pipeline.clean(&bytes, "customers.csv")?;
//! std::fs::write(&cleaned.metadata.filename, &cleaned.content)?;
//! ```
//!
//! # Working with Tables Directly
//!
//! The stages can also be used on their own:
//!
//! ```rust,ignore
//! use data_cleaner::{CleaningEngine, CleaningConfig, DataProfiler, SourceFormat, TableLoader};
//!
//! let table = TableLoader::load(&bytes, SourceFormat::DelimitedText)?;
//! let report = DataProfiler::profile(&table);
//! let (cleaned, summary) = CleaningEngine::new(CleaningConfig::default()).clean(&table)?;
//! ```
//!
//! # Errors
//!
//! All fallible operations return [`CleanerError`], which serializes to a
//! `{code, message}` payload. Statistics that cannot be computed degrade to
//! 0 / false and cleaning falls back to documented defaults instead of failing.

pub mod cleaner;
pub mod config;
pub mod decisions;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod table;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{CleaningEngine, CleaningPredictor};
pub use config::{
    CleaningConfig, CleaningConfigBuilder, ConfigValidationError, FillStrategy, ProfilerConfig,
};
pub use decisions::RecommendationEngine;
pub use error::{CleanerError, Result as CleanerResult, ResultExt};
pub use imputers::StatisticalImputer;
pub use loader::{Dataset, SourceFormat, TableLoader};
pub use pipeline::{Pipeline, PipelineBuilder, cleaning_options};
pub use profiler::DataProfiler;
pub use quality::{DetectedIssues, IssueDetector};
pub use reporting::{AnalysisResponse, CleanedOutput, CleaningMetadata, ReportGenerator};
pub use table::{Cell, Column, ColumnData, ColumnKind, Table};
pub use types::{
    CleaningPreview, CleaningSummary, ColumnAction, ColumnOutcome, ColumnPrediction,
    ColumnProfile, ColumnRename, FileInfo, MissingValues, Overview, PreviewSummary, Report,
};
