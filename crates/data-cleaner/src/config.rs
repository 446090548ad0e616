//! Configuration types for analysis and cleaning.
//!
//! [`CleaningConfig`] is built with the builder pattern and validated before
//! use. [`ProfilerConfig`] holds the fixed heuristics used by the profiler,
//! the recommendation engine and the cleaning predictor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default fraction of missing values at which a column is dropped.
pub const DEFAULT_MISSING_THRESHOLD: f64 = 0.8;

/// Missing percentage above which a column is reported as "high missing rate".
pub const HIGH_MISSING_PERCENTAGE: f64 = 20.0;

/// Share of unique values that must collapse under lowercasing to flag
/// inconsistent capitalization.
pub const CAPITALIZATION_RATIO: f64 = 0.2;

/// Percentage of cells that must coerce to numbers for a text column to be
/// flagged as numeric-looking.
pub const NUMERIC_LIKE_PERCENTAGE: f64 = 90.0;

/// IQR multiplier for the outlier fences.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Missing fraction above which the predictor labels a fill as "high missing rate".
pub const PREDICTOR_HIGH_MISSING_FRACTION: f64 = 0.5;

/// Number of rows returned in the analysis preview.
pub const PREVIEW_ROWS: usize = 5;

/// How columns whose missing fraction reaches the threshold are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Drop high-missing columns, impute the rest.
    #[default]
    Auto,
    /// Same as `Auto`: drop high-missing columns, impute the rest.
    Drop,
    /// Keep every column and impute all missing values.
    Fill,
}

impl FillStrategy {
    /// Whether columns at or above the threshold are removed.
    pub fn drops_high_missing(&self) -> bool {
        !matches!(self, Self::Fill)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Drop => "drop",
            Self::Fill => "fill",
        }
    }
}

impl fmt::Display for FillStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FillStrategy {
    type Err = ConfigValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "drop" => Ok(Self::Drop),
            "fill" => Ok(Self::Fill),
            other => Err(ConfigValidationError::InvalidFillStrategy(other.to_string())),
        }
    }
}

/// Configuration for the cleaning engine and the cleaning predictor.
///
/// Use [`CleaningConfig::builder()`] to create a validated configuration.
///
/// # Example
///
/// ```rust,ignore
/// use data_cleaner::config::{CleaningConfig, FillStrategy};
///
/// let config = CleaningConfig::builder()
///     .missing_threshold(0.5)
///     .fill_strategy(FillStrategy::Fill)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Fraction of missing values (0.0 - 1.0) at which a column is dropped.
    /// Default: 0.8 (80%)
    pub missing_threshold: f64,

    /// How high-missing columns are handled.
    /// Default: Auto
    pub fill_strategy: FillStrategy,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            missing_threshold: DEFAULT_MISSING_THRESHOLD,
            fill_strategy: FillStrategy::default(),
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !(0.0..=1.0).contains(&self.missing_threshold) {
            return Err(ConfigValidationError::InvalidThreshold {
                field: "missing_threshold".to_string(),
                value: self.missing_threshold,
            });
        }
        Ok(())
    }

    /// Whether a column with the given missing fraction is removed.
    pub fn should_drop(&self, missing_fraction: f64) -> bool {
        self.fill_strategy.drops_high_missing() && missing_fraction >= self.missing_threshold
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid fill strategy '{0}' (expected auto, drop or fill)")]
    InvalidFillStrategy(String),
}

impl From<ConfigValidationError> for crate::error::CleanerError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleanerError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    missing_threshold: Option<f64>,
    fill_strategy: Option<FillStrategy>,
}

impl CleaningConfigBuilder {
    /// Set the fraction of missing values at which a column is dropped.
    ///
    /// # Arguments
    /// * `threshold` - Value between 0.0 and 1.0 (e.g., 0.8 = 80%)
    pub fn missing_threshold(mut self, threshold: f64) -> Self {
        self.missing_threshold = Some(threshold);
        self
    }

    /// Set the handling of high-missing columns.
    pub fn fill_strategy(mut self, strategy: FillStrategy) -> Self {
        self.fill_strategy = Some(strategy);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            missing_threshold: self.missing_threshold.unwrap_or(DEFAULT_MISSING_THRESHOLD),
            fill_strategy: self.fill_strategy.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Heuristic thresholds used while profiling and predicting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Missing percentage above which a column has a "high missing rate".
    pub high_missing_percentage: f64,
    /// Collapse ratio at which capitalization is considered inconsistent.
    pub capitalization_ratio: f64,
    /// Percentage of numeric-coercible cells for a numeric-looking text column.
    pub numeric_like_percentage: f64,
    /// IQR multiplier for the outlier fences.
    pub iqr_multiplier: f64,
    /// Missing fraction above which the predictor reports a high-rate fill.
    pub predictor_high_missing_fraction: f64,
    /// Number of rows included in the analysis preview.
    pub preview_rows: usize,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            high_missing_percentage: HIGH_MISSING_PERCENTAGE,
            capitalization_ratio: CAPITALIZATION_RATIO,
            numeric_like_percentage: NUMERIC_LIKE_PERCENTAGE,
            iqr_multiplier: IQR_MULTIPLIER,
            predictor_high_missing_fraction: PREDICTOR_HIGH_MISSING_FRACTION,
            preview_rows: PREVIEW_ROWS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CleaningConfig::default();
        assert_eq!(config.missing_threshold, 0.8);
        assert_eq!(config.fill_strategy, FillStrategy::Auto);
    }

    #[test]
    fn test_builder_custom_values() {
        let config = CleaningConfig::builder()
            .missing_threshold(0.5)
            .fill_strategy(FillStrategy::Fill)
            .build()
            .unwrap();

        assert_eq!(config.missing_threshold, 0.5);
        assert_eq!(config.fill_strategy, FillStrategy::Fill);
    }

    #[test]
    fn test_validation_invalid_threshold() {
        let result = CleaningConfig::builder().missing_threshold(1.5).build();

        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_fill_strategy_from_str() {
        assert_eq!("auto".parse::<FillStrategy>().unwrap(), FillStrategy::Auto);
        assert_eq!(" Fill ".parse::<FillStrategy>().unwrap(), FillStrategy::Fill);
        assert_eq!("DROP".parse::<FillStrategy>().unwrap(), FillStrategy::Drop);
        assert!("median".parse::<FillStrategy>().is_err());
    }

    #[test]
    fn test_should_drop() {
        let auto = CleaningConfig::default();
        assert!(auto.should_drop(0.8));
        assert!(auto.should_drop(1.0));
        assert!(!auto.should_drop(0.79));

        let fill = CleaningConfig::builder()
            .fill_strategy(FillStrategy::Fill)
            .build()
            .unwrap();
        assert!(!fill.should_drop(1.0));
    }

    #[test]
    fn test_threshold_one_keeps_complete_columns() {
        let config = CleaningConfig::builder().missing_threshold(1.0).build().unwrap();
        assert!(!config.should_drop(0.0));
        assert!(!config.should_drop(0.99));
        assert!(config.should_drop(1.0));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{ "missing_threshold": 0.6, "fill_strategy": "fill" }"#;
        let config: CleaningConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.missing_threshold, 0.6);
        assert_eq!(config.fill_strategy, FillStrategy::Fill);

        let partial: CleaningConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(partial, CleaningConfig::default());
    }
}
