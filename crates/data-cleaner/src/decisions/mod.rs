//! Recommendation generation for analysis results.
//!
//! This module maps a profiling report to ordered, human-readable
//! suggestions using fixed rules.

mod recommendations;

pub use recommendations::{NO_ISSUES_MESSAGE, RecommendationEngine};
