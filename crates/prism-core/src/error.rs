//! Error types for the Prism comparison pipeline.
//!
//! Errors are organized by stage so the top-level message always names the
//! stage plus the offending path or provider.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism operations.
#[derive(Error, Debug)]
pub enum PrismError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A credentials file is missing or malformed
    #[error("Credentials error for {path}: {message}")]
    Credentials { path: PathBuf, message: String },
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The image directory could not be listed
    #[error("Cannot list image directory {path}: {source}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// One image could not be read into memory
    #[error("Cannot read image {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A detector call failed for one image
    #[error("{provider} failed for {path} ({kind}): {message}")]
    Provider {
        path: PathBuf,
        provider: String,
        kind: ProviderErrorKind,
        message: String,
    },

    /// A detector call did not complete in time
    #[error("{provider} timed out for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        provider: String,
        timeout_ms: u64,
    },

    /// The analysis task for one image panicked or was cancelled
    #[error("Analysis task for {path} did not complete: {message}")]
    Task { path: PathBuf, message: String },

    /// The report could not be written
    #[error("Cannot write report {path}: {message}")]
    Render { path: PathBuf, message: String },
}

impl PipelineError {
    /// Attach an image path and provider name to a detector failure.
    pub fn from_provider(path: PathBuf, provider: &str, error: ProviderError) -> Self {
        Self::Provider {
            path,
            provider: provider.to_string(),
            kind: error.kind,
            message: error.message,
        }
    }
}

/// Failure category of a single vendor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Credentials rejected or missing permissions
    Auth,
    /// Quota exhausted or throttled
    Quota,
    /// The response could not be decoded
    MalformedResponse,
    /// Transport failure (DNS, connect, TLS, reset)
    Network,
    /// Any other vendor-side error
    Service,
}

impl ProviderErrorKind {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::Quota,
            _ => Self::Service,
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "auth"),
            Self::Quota => write!(f, "quota"),
            Self::MalformedResponse => write!(f, "malformed response"),
            Self::Network => write!(f, "network"),
            Self::Service => write!(f, "service"),
        }
    }
}

/// Error returned by a detector, before it is tied to an image path.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// HTTP status, when the failure came from a response
    pub status_code: Option<u16>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    /// Build an error from a non-success HTTP response.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self {
            kind: ProviderErrorKind::from_status(status),
            message: format!("HTTP {status}: {body}"),
            status_code: Some(status),
        }
    }
}

/// Convenience type alias for Prism results.
pub type Result<T> = std::result::Result<T, PrismError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ProviderErrorKind::from_status(401), ProviderErrorKind::Auth);
        assert_eq!(ProviderErrorKind::from_status(403), ProviderErrorKind::Auth);
        assert_eq!(ProviderErrorKind::from_status(429), ProviderErrorKind::Quota);
        assert_eq!(ProviderErrorKind::from_status(500), ProviderErrorKind::Service);
        assert_eq!(ProviderErrorKind::from_status(400), ProviderErrorKind::Service);
    }

    #[test]
    fn test_provider_error_names_path_and_provider() {
        let err = PipelineError::from_provider(
            PathBuf::from("./img/shovel.jpg"),
            "rekognition",
            ProviderError::from_status(429, "slow down"),
        );
        let msg = err.to_string();
        assert!(msg.contains("rekognition"));
        assert!(msg.contains("./img/shovel.jpg"));
        assert!(msg.contains("quota"));
    }

    #[test]
    fn test_file_read_error_names_path() {
        let err = PipelineError::FileRead {
            path: PathBuf::from("./img/missing.jpg"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("./img/missing.jpg"));
    }
}
