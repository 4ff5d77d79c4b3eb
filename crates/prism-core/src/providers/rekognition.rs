//! AWS Rekognition detector using the `DetectLabels` operation.
//!
//! Confidences come back on a 0-100 scale and are kept that way.

use super::detector::LabelDetector;
use crate::credentials::AwsCredentials;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::types::{KeywordMap, ProviderResult};
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_rekognition::config::{BehaviorVersion, Region};
use aws_sdk_rekognition::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Image, Label};

const DEFAULT_REGION: &str = "us-east-1";

/// AWS Rekognition detector (provider B).
pub struct RekognitionDetector {
    client: aws_sdk_rekognition::Client,
    max_labels: i32,
    min_confidence: f32,
}

impl RekognitionDetector {
    /// Build a client from a static key pair.
    ///
    /// `region` overrides the region stored alongside the keys.
    pub fn new(
        credentials: &AwsCredentials,
        region: Option<&str>,
        max_labels: i32,
        min_confidence: f32,
    ) -> Self {
        let region = region
            .map(str::to_string)
            .or_else(|| credentials.region.clone())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());

        let config = aws_sdk_rekognition::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region))
            .credentials_provider(Credentials::new(
                credentials.access_key_id.clone(),
                credentials.secret_access_key.clone(),
                None,
                None,
                "prism-credentials-file",
            ))
            .build();

        Self {
            client: aws_sdk_rekognition::Client::from_conf(config),
            max_labels,
            min_confidence,
        }
    }
}

/// Normalize Rekognition labels into a keyword map.
///
/// Labels without a name or confidence are skipped; repeated names keep the
/// later confidence.
pub(crate) fn normalize_labels(labels: &[Label]) -> KeywordMap {
    labels
        .iter()
        .filter_map(|label| Some((label.name()?, label.confidence()?)))
        .collect()
}

/// Classify a modeled service error by its error code.
fn classify_code(code: Option<&str>) -> ProviderErrorKind {
    match code {
        Some(
            "ThrottlingException"
            | "ProvisionedThroughputExceededException"
            | "LimitExceededException",
        ) => ProviderErrorKind::Quota,
        Some(
            "AccessDeniedException"
            | "UnrecognizedClientException"
            | "InvalidSignatureException"
            | "ExpiredTokenException",
        ) => ProviderErrorKind::Auth,
        _ => ProviderErrorKind::Service,
    }
}

/// Map an SDK failure to a provider error.
fn sdk_error<E, R>(err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let kind = match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => ProviderErrorKind::Network,
        SdkError::ResponseError(_) => ProviderErrorKind::MalformedResponse,
        _ => classify_code(err.code()),
    };
    ProviderError::new(kind, DisplayErrorContext(&err).to_string())
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    fn name(&self) -> &str {
        "rekognition"
    }

    async fn detect_labels(&self, image: &[u8]) -> Result<ProviderResult, ProviderError> {
        let output = self
            .client
            .detect_labels()
            .image(Image::builder().bytes(Blob::new(image)).build())
            .max_labels(self.max_labels)
            .min_confidence(self.min_confidence)
            .send()
            .await
            .map_err(sdk_error)?;

        Ok(ProviderResult::labels_only(normalize_labels(output.labels())))
    }
}
