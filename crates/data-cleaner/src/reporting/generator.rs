use crate::config::{CleaningConfig, FillStrategy};
use crate::error::{CleanerError, Result};
use crate::loader::SourceFormat;
use crate::table::Table;
use crate::types::{CleaningSummary, Report};
use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

// ============================================================================
// Response Types
// ============================================================================

/// Result of analyzing an upload.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    /// Timestamp when the response was generated
    pub generated_at: String,
    pub report: Report,
    /// First rows of the table as records
    pub preview: Vec<Map<String, Value>>,
    /// Column names in order (repeats included)
    pub columns: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Metadata accompanying a cleaned file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningMetadata {
    /// Suggested download name (`cleaned_{filename}`)
    pub filename: String,
    pub media_type: String,
    pub strategy: FillStrategy,
    pub threshold: f64,
    pub original_columns: usize,
    pub final_columns: usize,
    pub dropped_columns: usize,
}

/// A cleaned table encoded in its source format.
#[derive(Debug, Clone, Serialize)]
pub struct CleanedOutput {
    pub generated_at: String,
    /// CSV text or a pretty-printed JSON array of records
    pub content: String,
    pub metadata: CleaningMetadata,
    pub summary: CleaningSummary,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Builds response objects and writes them to disk.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn analysis_response(
        table: &Table,
        report: Report,
        recommendations: Vec<String>,
        preview_rows: usize,
    ) -> AnalysisResponse {
        AnalysisResponse {
            generated_at: Self::timestamp(),
            report,
            preview: table.head(preview_rows).records(),
            columns: table.column_names(),
            recommendations,
        }
    }

    pub fn cleaned_output(
        table: &Table,
        format: SourceFormat,
        filename: &str,
        config: &CleaningConfig,
        summary: CleaningSummary,
    ) -> Result<CleanedOutput> {
        let metadata = CleaningMetadata {
            filename: format!("cleaned_{}", filename),
            media_type: format.media_type().to_string(),
            strategy: config.fill_strategy,
            threshold: config.missing_threshold,
            original_columns: summary.original_column_count,
            final_columns: summary.final_column_count,
            dropped_columns: summary.dropped_column_count,
        };

        Ok(CleanedOutput {
            generated_at: Self::timestamp(),
            content: Self::encode_table(table, format)?,
            metadata,
            summary,
        })
    }

    /// Encode a table in the given format. Non-finite numbers and nulls are
    /// written as empty CSV fields or JSON `null`.
    pub fn encode_table(table: &Table, format: SourceFormat) -> Result<String> {
        match format {
            SourceFormat::DelimitedText => Self::encode_csv(table),
            SourceFormat::StructuredRecords => Self::encode_json(table),
        }
    }

    fn encode_csv(table: &Table) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if table.width() > 0 {
            writer.write_record(table.column_names())?;
        }
        for i in 0..table.height() {
            writer.write_record(table.row(i).iter().map(|cell| cell.render()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CleanerError::Io(e.into_error()))?;
        String::from_utf8(bytes).map_err(|e| CleanerError::Internal(e.to_string()))
    }

    fn encode_json(table: &Table) -> Result<String> {
        let records = table.records();
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        records.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|e| CleanerError::Internal(e.to_string()))
    }

    /// Write cleaned content to `{output_dir}/{metadata.filename}`.
    pub fn write_cleaned_file(&self, output: &CleanedOutput) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(&output.metadata.filename);
        let mut file = File::create(&path)?;
        file.write_all(output.content.as_bytes())?;

        info!("Cleaned file saved: {}", path.display());
        Ok(path)
    }

    /// Write any response as pretty JSON to `{output_dir}/{base_name}_report.json`.
    pub fn write_report_to_file<T: Serialize>(
        &self,
        report: &T,
        base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}
