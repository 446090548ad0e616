//! Request-level pipeline over uploaded bytes.
//!
//! This module provides the `Pipeline` struct and builder that wire the
//! loader, profiler, recommendation engine, detector, cleaning engine and
//! predictor into the three request operations.

use crate::cleaner::{CleaningEngine, CleaningPredictor};
use crate::config::{CleaningConfig, ConfigValidationError, FillStrategy, ProfilerConfig};
use crate::decisions::RecommendationEngine;
use crate::error::Result;
use crate::loader::{Dataset, TableLoader};
use crate::profiler::DataProfiler;
use crate::quality::{DetectedIssues, IssueDetector};
use crate::reporting::{AnalysisResponse, CleanedOutput, ReportGenerator};
use crate::table::Table;
use crate::types::{CleaningPreview, FileInfo};
use tracing::{error, info};

/// Build a validated cleaning configuration from raw request options.
///
/// The strategy is parsed case-insensitively; an unknown strategy or a
/// threshold outside `[0, 1]` is an `InvalidConfig` error.
pub fn cleaning_options(missing_threshold: f64, fill_strategy: &str) -> Result<CleaningConfig> {
    let strategy: FillStrategy = fill_strategy.parse()?;
    Ok(CleaningConfig::builder()
        .missing_threshold(missing_threshold)
        .fill_strategy(strategy)
        .build()?)
}

/// Analysis and cleaning pipeline for uploaded files.
///
/// Every call is independent: the upload is loaded into a table owned by the
/// call and nothing is kept afterwards.
///
/// # Example
///
/// ```rust,ignore
/// use data_cleaner::{CleaningConfig, FillStrategy, Pipeline};
///
/// let pipeline = Pipeline::builder()
///     .cleaning_config(
///         CleaningConfig::builder()
///             .missing_threshold(0.5)
///             .fill_strategy(FillStrategy::Fill)
///             .build()?,
///     )
///     .build()?;
///
/// let analysis = pipeline.analyze(&bytes, "sales.csv")?;
/// let cleaned = pipeline.clean(&bytes, "sales.csv")?;
/// std::fs::write(&cleaned.metadata.filename, cleaned.content)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    cleaning_config: CleaningConfig,
    profiler_config: ProfilerConfig,
}

static_assertions::assert_impl_all!(Pipeline: Send, Sync);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn cleaning_config(&self) -> &CleaningConfig {
        &self.cleaning_config
    }

    fn load(&self, bytes: &[u8], filename: &str) -> Result<Dataset> {
        TableLoader::load_file(bytes, filename).inspect_err(|e| {
            error!("Failed to load '{}': {}", filename, e);
        })
    }

    /// Profile an upload and suggest fixes.
    pub fn analyze(&self, bytes: &[u8], filename: &str) -> Result<AnalysisResponse> {
        info!("Analyzing '{}'", filename);
        let dataset = self.load(bytes, filename)?;
        Ok(self.analyze_table(&dataset.table))
    }

    /// Profile an already loaded table and suggest fixes.
    pub fn analyze_table(&self, table: &Table) -> AnalysisResponse {
        let report = DataProfiler::profile_with(table, &self.profiler_config);
        let recommendations =
            RecommendationEngine::new(self.profiler_config).recommend(table, &report);

        ReportGenerator::analysis_response(
            table,
            report,
            recommendations,
            self.profiler_config.preview_rows,
        )
    }

    /// Clean an upload and re-encode it in its source format.
    pub fn clean(&self, bytes: &[u8], filename: &str) -> Result<CleanedOutput> {
        info!("Cleaning '{}'", filename);
        let dataset = self.load(bytes, filename)?;

        let (cleaned, summary) = CleaningEngine::new(self.cleaning_config).clean(&dataset.table)?;
        ReportGenerator::cleaned_output(
            &cleaned,
            dataset.format,
            filename,
            &self.cleaning_config,
            summary,
        )
    }

    /// Predict what [`Pipeline::clean`] would do, without cleaning.
    pub fn preview(&self, bytes: &[u8], filename: &str) -> Result<CleaningPreview> {
        info!("Previewing cleaning of '{}'", filename);
        let dataset = self.load(bytes, filename)?;

        let file_info = FileInfo {
            filename: filename.to_string(),
            file_type: dataset.format.file_type().to_string(),
            total_rows: dataset.table.height(),
            total_columns: dataset.table.width(),
        };

        Ok(
            CleaningPredictor::with_profiler_config(self.cleaning_config, self.profiler_config)
                .predict(&dataset.table, file_info),
        )
    }

    /// Format-aware missing-value and duplicate detection.
    pub fn detect(&self, bytes: &[u8], filename: &str) -> Result<DetectedIssues> {
        let dataset = self.load(bytes, filename)?;
        Ok(IssueDetector::detect(&dataset))
    }
}

/// Builder for [`Pipeline`].
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    cleaning_config: Option<CleaningConfig>,
    profiler_config: Option<ProfilerConfig>,
}

impl PipelineBuilder {
    /// Set the cleaning configuration (threshold and fill strategy).
    pub fn cleaning_config(mut self, config: CleaningConfig) -> Self {
        self.cleaning_config = Some(config);
        self
    }

    /// Override the analysis heuristics.
    pub fn profiler_config(mut self, config: ProfilerConfig) -> Self {
        self.profiler_config = Some(config);
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the cleaning configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let cleaning_config = self.cleaning_config.unwrap_or_default();
        cleaning_config.validate()?;

        Ok(Pipeline {
            cleaning_config,
            profiler_config: self.profiler_config.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CleanerError;

    const CSV: &[u8] = b"Name,Age\nalice,30\nALICE,30\nbob,\n";

    #[test]
    fn test_pipeline_builder_default() {
        let pipeline = Pipeline::builder().build().unwrap();
        assert_eq!(pipeline.cleaning_config(), &CleaningConfig::default());
    }

    #[test]
    fn test_pipeline_builder_rejects_invalid_threshold() {
        let config = CleaningConfig {
            missing_threshold: -0.1,
            ..CleaningConfig::default()
        };
        assert!(Pipeline::builder().cleaning_config(config).build().is_err());
    }

    #[test]
    fn test_cleaning_options() {
        let config = cleaning_options(0.5, "FILL").unwrap();
        assert_eq!(config.fill_strategy, FillStrategy::Fill);

        let err = cleaning_options(0.5, "median").unwrap_err();
        assert!(matches!(err, CleanerError::InvalidConfig(_)));
        assert!(err.is_client_error());

        assert!(matches!(
            cleaning_options(2.0, "auto"),
            Err(CleanerError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_analyze() {
        let response = Pipeline::default().analyze(CSV, "people.csv").unwrap();
        assert_eq!(response.columns, vec!["Name", "Age"]);
        assert_eq!(response.preview.len(), 3);
        assert!(
            response
                .recommendations
                .iter()
                .any(|r| r.contains("missing values"))
        );
    }

    #[test]
    fn test_analyze_table_matches_analyze() {
        let pipeline = Pipeline::default();
        let dataset = TableLoader::load_file(CSV, "people.csv").unwrap();
        let direct = pipeline.analyze_table(&dataset.table);
        let from_bytes = pipeline.analyze(CSV, "people.csv").unwrap();

        assert_eq!(direct.columns, from_bytes.columns);
        assert_eq!(direct.preview, from_bytes.preview);
        assert_eq!(direct.recommendations, from_bytes.recommendations);
    }

    #[test]
    fn test_unsupported_format() {
        let err = Pipeline::default().analyze(CSV, "people.xlsx").unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_clean_and_preview() {
        let pipeline = Pipeline::default();
        let cleaned = pipeline.clean(CSV, "people.csv").unwrap();
        assert_eq!(cleaned.metadata.filename, "cleaned_people.csv");
        assert!(cleaned.content.starts_with("name,age\n"));

        let preview = pipeline.preview(CSV, "people.csv").unwrap();
        assert_eq!(preview.file_info.total_rows, 3);
        assert_eq!(preview.columns_to_fill, vec!["Age"]);
    }
}
