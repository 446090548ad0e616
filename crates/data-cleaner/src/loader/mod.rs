//! Table loading from uploaded bytes.
//!
//! This module turns raw bytes plus a declared format into a [`Table`]:
//! - Decoding with an ordered encoding fallback (UTF-8, then Latin-1)
//! - Delimited text with automatic delimiter detection
//! - Structured records (JSON arrays of objects or a single nested object)

mod decode;
mod delimited;
mod records;

pub use decode::{ENCODINGS, TextEncoding, decode_bytes};
pub use delimited::{DELIMITER_CANDIDATES, read_delimited, sniff_delimiter};
pub use records::read_records;

use crate::error::{CleanerError, Result, ResultExt};
use crate::table::Table;
use serde::Serialize;
use std::fmt;
use tracing::info;

/// Format of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// Comma-, semicolon-, tab-, pipe- or colon-separated text with a header row.
    DelimitedText,
    /// A JSON array of records or a single JSON object.
    StructuredRecords,
}

impl SourceFormat {
    /// Parse a format tag (`delimited-text` or `structured-records`).
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "delimited-text" => Ok(Self::DelimitedText),
            "structured-records" => Ok(Self::StructuredRecords),
            other => Err(CleanerError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Derive the format from a filename suffix (`csv` or `json`, any case).
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(Self::DelimitedText),
            "json" => Ok(Self::StructuredRecords),
            _ => Err(CleanerError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Self::DelimitedText => "delimited-text",
            Self::StructuredRecords => "structured-records",
        }
    }

    /// Short file type label (`csv` / `json`).
    pub fn file_type(&self) -> &'static str {
        match self {
            Self::DelimitedText => "csv",
            Self::StructuredRecords => "json",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            Self::DelimitedText => "text/csv",
            Self::StructuredRecords => "application/json",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A loaded table together with the format it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub table: Table,
    pub format: SourceFormat,
}

static_assertions::assert_impl_all!(Dataset: Send, Sync);

/// Loads tables from raw bytes.
pub struct TableLoader;

impl TableLoader {
    /// Decode and parse `bytes` as `format`.
    pub fn load(bytes: &[u8], format: SourceFormat) -> Result<Table> {
        let (text, encoding) = decode_bytes(bytes)?;

        let table = match format {
            SourceFormat::DelimitedText => read_delimited(&text),
            SourceFormat::StructuredRecords => read_records(&text),
        }?;

        info!(
            "Loaded {} rows x {} columns ({}, {})",
            table.height(),
            table.width(),
            format,
            encoding.name()
        );
        Ok(table)
    }

    /// Load an upload, deriving the format from its filename.
    pub fn load_file(bytes: &[u8], filename: &str) -> Result<Dataset> {
        let format = SourceFormat::from_filename(filename)?;
        let table = Self::load(bytes, format).context(format!("Loading '{}'", filename))?;
        Ok(Dataset { table, format })
    }
}
