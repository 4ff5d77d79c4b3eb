//! Sub-configuration structs with defaults matching the stock comparison run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Image input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory whose files are compared
    pub dir: PathBuf,

    /// Optional extension allow-list. Empty means every file is treated as an image.
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./img"),
            extensions: Vec::new(),
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// HTML report path, overwritten on every run
    pub report: PathBuf,

    /// Pretty-print JSON dumps
    pub json_pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report: PathBuf::from("./out/index.html"),
            json_pretty: false,
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Max images analyzed at once
    pub parallel: usize,

    /// Report failed images alongside successes instead of aborting the batch
    pub keep_going: bool,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            parallel: 16,
            keep_going: false,
        }
    }
}

/// Timeouts for vendor calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Per-call timeout for each detector, in milliseconds
    pub provider_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            provider_timeout_ms: 30_000,
        }
    }
}

/// Detection feature types accepted by the Vision `images:annotate` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    LabelDetection,
    LogoDetection,
    TextDetection,
}

/// Google Cloud Vision settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleConfig {
    /// API base URL
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax). Falls back to the credentials file.
    pub api_key: String,

    /// JSON credentials file holding `api_key`
    pub credentials: PathBuf,

    /// Detection features requested per image
    pub features: Vec<FeatureType>,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://vision.googleapis.com".to_string(),
            api_key: "${GOOGLE_VISION_API_KEY}".to_string(),
            credentials: PathBuf::from("./credentials/google-creds.json"),
            features: vec![FeatureType::LabelDetection, FeatureType::LogoDetection],
        }
    }
}

/// AWS Rekognition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RekognitionConfig {
    /// JSON credentials file (`accessKeyId`, `secretAccessKey`, `region`)
    pub credentials: PathBuf,

    /// Region override; the credentials file region is used when unset
    pub region: Option<String>,

    /// `MaxLabels` sent with every request
    pub max_labels: i32,

    /// `MinConfidence` floor, 0-100 scale
    pub min_confidence: f32,
}

impl Default for RekognitionConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("./credentials/aws-creds.json"),
            region: None,
            max_labels: 70,
            min_confidence: 50.0,
        }
    }
}

/// Report ranking rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Rows rendered per image table
    pub table_rows: usize,

    /// Label keys joined into each search string
    pub search_terms: usize,

    /// Top logo score must exceed this to be appended as the brand
    pub brand_confidence: f32,

    /// Characters of score text shown per cell
    pub score_chars: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            table_rows: 10,
            search_terms: 4,
            brand_confidence: 0.75,
            score_chars: 6,
        }
    }
}

/// Product advertising API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSearchConfig {
    /// JSON credentials file (`accessKey`, `secretKey`, `partnerTag`)
    pub credentials: PathBuf,

    /// API host
    pub host: String,

    /// Signing region
    pub region: String,

    /// Items requested per search
    pub item_count: u32,
}

impl Default for ProductSearchConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("./credentials/paapi-creds.json"),
            host: "webservices.amazon.com".to_string(),
            region: "us-east-1".to_string(),
            item_count: 1,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
