//! Vision provider integration.
//!
//! Provides the `LabelDetector` abstraction over the compared vendors
//! (Google Cloud Vision, AWS Rekognition) and a factory that builds both
//! from configuration and on-disk credentials.

pub(crate) mod detector;
pub(crate) mod google;
pub(crate) mod google_auth;
pub(crate) mod rekognition;

pub use detector::LabelDetector;
pub use google::{GoogleAuth, GoogleVisionDetector};
pub use google_auth::ServiceAccountTokens;
pub use rekognition::RekognitionDetector;

use crate::config::{expand, Config};
use crate::credentials::{self, AwsCredentials, GoogleCredentials};
use crate::error::ConfigError;
use std::sync::Arc;

/// Builds the configured detectors once at startup.
pub struct DetectorFactory;

impl DetectorFactory {
    /// Create the Google Vision detector (provider A).
    pub fn google(config: &Config) -> Result<Arc<dyn LabelDetector>, ConfigError> {
        let cfg = &config.google;
        let auth = match credentials::google_credentials(&cfg.api_key, &cfg.credentials)? {
            GoogleCredentials::ApiKey(key) => GoogleAuth::ApiKey(key),
            GoogleCredentials::ServiceAccount(key) => {
                tracing::debug!("Google Vision service account: {}", key.client_email);
                let tokens =
                    ServiceAccountTokens::new(&key).map_err(|e| ConfigError::Credentials {
                        path: expand(&cfg.credentials),
                        message: e.to_string(),
                    })?;
                GoogleAuth::ServiceAccount(tokens)
            }
        };
        tracing::debug!("Google Vision features: {:?}", cfg.features);
        Ok(Arc::new(GoogleVisionDetector::new(
            auth,
            &cfg.endpoint,
            cfg.features.clone(),
        )))
    }

    /// Create the Rekognition detector (provider B).
    pub fn rekognition(config: &Config) -> Result<Arc<dyn LabelDetector>, ConfigError> {
        let cfg = &config.rekognition;
        let creds: AwsCredentials = credentials::load(&cfg.credentials)?;
        Ok(Arc::new(RekognitionDetector::new(
            &creds,
            cfg.region.as_deref(),
            cfg.max_labels,
            cfg.min_confidence,
        )))
    }
}
