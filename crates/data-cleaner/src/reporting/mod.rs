//! Response generation module.
//!
//! This module builds the serializable responses handed back to callers and
//! re-encodes cleaned tables in their source format:
//! - Delimited text is written as CSV with nulls and non-finite numbers as
//!   empty fields
//! - Structured records are written as a pretty-printed JSON array with nulls
//!   and non-finite numbers as `null`
//!
//! # Example
//!
//! ```rust,ignore
//! use data_cleaner::reporting::ReportGenerator;
//! use data_cleaner::loader::SourceFormat;
//!
//! let csv = ReportGenerator::encode_table(&table, SourceFormat::DelimitedText)?;
//! ```

mod generator;

pub use generator::{AnalysisResponse, CleanedOutput, CleaningMetadata, ReportGenerator};
