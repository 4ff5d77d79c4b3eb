//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::{Config, FeatureType};

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.parallel == 0 {
            return Err(ConfigError::ValidationError(
                "processing.parallel must be > 0".into(),
            ));
        }
        if self.limits.provider_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.provider_timeout_ms must be > 0".into(),
            ));
        }
        if !self.google.features.contains(&FeatureType::LabelDetection) {
            return Err(ConfigError::ValidationError(
                "google.features must include LABEL_DETECTION".into(),
            ));
        }
        if self.rekognition.max_labels < 1 {
            return Err(ConfigError::ValidationError(
                "rekognition.max_labels must be >= 1".into(),
            ));
        }
        if !(0.0..=100.0).contains(&self.rekognition.min_confidence) {
            return Err(ConfigError::ValidationError(
                "rekognition.min_confidence must be between 0 and 100".into(),
            ));
        }
        if self.report.table_rows == 0 {
            return Err(ConfigError::ValidationError(
                "report.table_rows must be > 0".into(),
            ));
        }
        if self.report.search_terms == 0 {
            return Err(ConfigError::ValidationError(
                "report.search_terms must be > 0".into(),
            ));
        }
        if self.report.score_chars == 0 {
            return Err(ConfigError::ValidationError(
                "report.score_chars must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.report.brand_confidence) {
            return Err(ConfigError::ValidationError(
                "report.brand_confidence must be between 0.0 and 1.0".into(),
            ));
        }
        if self.product_search.item_count == 0 {
            return Err(ConfigError::ValidationError(
                "product_search.item_count must be > 0".into(),
            ));
        }
        Ok(())
    }
}
