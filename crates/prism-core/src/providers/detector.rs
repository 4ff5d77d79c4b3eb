//! Label detector trait shared by every vision provider.

use crate::error::ProviderError;
use crate::types::ProviderResult;
use async_trait::async_trait;

/// A vision service that turns raw image bytes into ranked keywords.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the analyzer holds `Arc<dyn LabelDetector>`).
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Provider name for logging and error attribution (e.g., "google", "rekognition").
    fn name(&self) -> &str;

    /// Detect labels (and logos, where supported) in one image.
    async fn detect_labels(&self, image: &[u8]) -> Result<ProviderResult, ProviderError>;
}
