//! Google Cloud Vision detector using the `images:annotate` REST endpoint.
//!
//! Sends the image inline as base64 content with the configured feature list.
//! Label and logo annotations are kept; text annotations are never consumed.

use super::detector::LabelDetector;
use super::google_auth::ServiceAccountTokens;
use crate::config::FeatureType;
use crate::error::{ProviderError, ProviderErrorKind};
use crate::types::{KeywordMap, ProviderResult};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// How requests are authorized.
pub enum GoogleAuth {
    ApiKey(String),
    ServiceAccount(ServiceAccountTokens),
}

/// Google Cloud Vision detector (provider A).
pub struct GoogleVisionDetector {
    auth: GoogleAuth,
    endpoint: String,
    features: Vec<FeatureType>,
    client: reqwest::Client,
}

impl GoogleVisionDetector {
    pub fn new(auth: GoogleAuth, endpoint: &str, features: Vec<FeatureType>) -> Self {
        Self {
            auth,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            features,
            client: reqwest::Client::new(),
        }
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.endpoint)
    }
}

// --- Request types ---

#[derive(Serialize)]
struct AnnotateRequest {
    requests: Vec<AnnotateImageRequest>,
}

#[derive(Serialize)]
struct AnnotateImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Serialize)]
struct Feature {
    #[serde(rename = "type")]
    feature_type: FeatureType,
}

// --- Response types ---

#[derive(Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<EntityAnnotation>,
    #[serde(default)]
    logo_annotations: Vec<EntityAnnotation>,
    error: Option<Status>,
}

#[derive(Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f32,
}

#[derive(Deserialize)]
struct Status {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

/// Map a per-image status to a provider error.
///
/// Codes are gRPC canonical codes: 7 PERMISSION_DENIED, 16 UNAUTHENTICATED,
/// 8 RESOURCE_EXHAUSTED.
fn status_error(status: &Status) -> ProviderError {
    let kind = match status.code {
        7 | 16 => ProviderErrorKind::Auth,
        8 => ProviderErrorKind::Quota,
        _ => ProviderErrorKind::Service,
    };
    ProviderError::new(kind, format!("code {}: {}", status.code, status.message))
}

/// Normalize one image's annotations into keyword maps.
///
/// Repeated descriptions keep the later score.
pub(crate) fn normalize_annotations(
    response: AnnotateImageResponse,
) -> Result<ProviderResult, ProviderError> {
    if let Some(status) = &response.error {
        return Err(status_error(status));
    }

    let labels: KeywordMap = response
        .label_annotations
        .into_iter()
        .map(|a| (a.description, a.score))
        .collect();
    let logos: KeywordMap = response
        .logo_annotations
        .into_iter()
        .map(|a| (a.description, a.score))
        .collect();

    Ok(ProviderResult::new(labels, logos))
}

/// Parse a full `images:annotate` body and normalize its first response.
pub(crate) fn parse_response(body: &str) -> Result<ProviderResult, ProviderError> {
    let parsed: AnnotateResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::new(
            ProviderErrorKind::MalformedResponse,
            format!("Failed to parse Vision response: {e}"),
        )
    })?;

    let first = parsed.responses.into_iter().next().ok_or_else(|| {
        ProviderError::new(
            ProviderErrorKind::MalformedResponse,
            "Vision returned an empty responses array",
        )
    })?;

    normalize_annotations(first)
}

#[async_trait]
impl LabelDetector for GoogleVisionDetector {
    fn name(&self) -> &str {
        "google"
    }

    async fn detect_labels(&self, image: &[u8]) -> Result<ProviderResult, ProviderError> {
        let body = AnnotateRequest {
            requests: vec![AnnotateImageRequest {
                image: ImageContent {
                    content: base64::engine::general_purpose::STANDARD.encode(image),
                },
                features: self
                    .features
                    .iter()
                    .map(|&feature_type| Feature { feature_type })
                    .collect(),
            }],
        };

        let request = self.client.post(self.annotate_url());
        let request = match &self.auth {
            GoogleAuth::ApiKey(key) => request.query(&[("key", key.as_str())]),
            GoogleAuth::ServiceAccount(tokens) => {
                request.bearer_auth(tokens.access_token().await?)
            }
        };

        let resp = request
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(
                    ProviderErrorKind::Network,
                    format!("Vision request failed: {e}"),
                )
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::Network,
                format!("Failed to read Vision response: {e}"),
            )
        })?;
        if !status.is_success() {
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }

        parse_response(&text)
    }
}
