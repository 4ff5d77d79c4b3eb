//! Configuration management for Prism.
//!
//! Configuration is loaded from the platform config directory with defaults
//! that reproduce the stock comparison run (`./img` in, `./out/index.html` out).

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Prism.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Image input settings
    pub input: InputConfig,

    /// Report and JSON output settings
    pub output: OutputConfig,

    /// Batch processing settings
    pub processing: ProcessingConfig,

    /// Timeouts
    pub limits: LimitsConfig,

    /// Google Cloud Vision (provider A)
    pub google: GoogleConfig,

    /// AWS Rekognition (provider B)
    pub rekognition: RekognitionConfig,

    /// Report ranking rules
    pub report: ReportConfig,

    /// Product advertising API lookups
    pub product_search: ProductSearchConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// - macOS: ~/Library/Application Support/com.prism.prism/config.toml
    /// - Linux: ~/.config/prism/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\prism\prism\config\config.toml
    ///
    /// Falls back to ~/.prism/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "prism", "prism")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".prism").join("config.toml")
            })
    }

    /// Image directory with `~` expanded.
    pub fn input_dir(&self) -> PathBuf {
        expand(&self.input.dir)
    }

    /// Report path with `~` expanded.
    pub fn report_path(&self) -> PathBuf {
        expand(&self.output.report)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Expand a leading `~` in a configured path.
pub fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
