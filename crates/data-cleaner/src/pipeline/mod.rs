//! Pipeline module.
//!
//! This module provides the request-level entry points: `analyze`, `clean`
//! and `preview` over uploaded bytes plus a filename.

mod builder;

pub use builder::{Pipeline, PipelineBuilder, cleaning_options};
