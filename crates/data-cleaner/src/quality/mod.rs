//! Data quality issue detection.
//!
//! This module provides lightweight, format-aware detection of missing values
//! and duplicate rows or records.

mod detector;

pub use detector::{DetectedIssues, IssueDetector};
