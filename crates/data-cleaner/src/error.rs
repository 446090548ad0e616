//! Custom error types for the analysis and cleaning engine.
//!
//! This module provides the error hierarchy using `thiserror`.
//!
//! Errors are serializable so the surrounding service can hand them
//! straight back to the caller as a `{code, message}` payload.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the engine.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The declared file type is neither delimited text nor structured records.
    #[error("Unsupported file type: '{0}'")]
    UnsupportedFormat(String),

    /// The payload could not be decoded under any of the attempted encodings.
    #[error("Failed to decode file: {0}")]
    DecodeFailure(String),

    /// Malformed delimited text or structured document.
    #[error("Error parsing file: {0}")]
    ParseFailure(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (invariant broken while building a table).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleanerError>,
    },
}

impl CleanerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleanerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for the caller.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::DecodeFailure(_) => "DECODE_FAILURE",
            Self::ParseFailure(_) => "PARSE_FAILURE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the error was caused by the request itself (bad file, bad options)
    /// rather than by the engine.
    ///
    /// Client errors map to a 4xx-style response in the outer service.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::UnsupportedFormat(_)
            | Self::DecodeFailure(_)
            | Self::ParseFailure(_)
            | Self::InvalidConfig(_)
            | Self::Json(_)
            | Self::Csv(_) => true,
            Self::WithContext { source, .. } => source.is_client_error(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleanerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleanerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, CleanerError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleanerError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleanerError::UnsupportedFormat("xlsx".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
        assert_eq!(
            CleanerError::ParseFailure("bad".to_string()).error_code(),
            "PARSE_FAILURE"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(CleanerError::DecodeFailure("x".to_string()).is_client_error());
        assert!(CleanerError::InvalidConfig("x".to_string()).is_client_error());
        assert!(!CleanerError::Internal("x".to_string()).is_client_error());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleanerError::UnsupportedFormat("xlsx".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("UNSUPPORTED_FORMAT"));
        assert!(json.contains("xlsx"));
    }

    #[test]
    fn test_with_context() {
        let error = CleanerError::ParseFailure("row 3".to_string()).with_context("Loading upload");
        assert!(error.to_string().contains("Loading upload"));
        assert_eq!(error.error_code(), "PARSE_FAILURE");
        assert!(error.is_client_error());
    }
}
