//! Prism Core - side-by-side comparison of image labeling services.
//!
//! Prism sends every image of a directory to two vision providers, merges
//! their labels (and provider A's logos) into one record per image, and
//! renders a static HTML page comparing them with a ready-made product search
//! string per provider.
//!
//! # Architecture
//!
//! ```text
//! Discover → Load (all) → Analyze (A ‖ B per image) → Merge → HTML report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use prism_core::{Config, Prism};
//!
//! #[tokio::main]
//! async fn main() -> prism_core::Result<()> {
//!     let prism = Prism::new(Config::load()?)?;
//!     let batch = prism.compare(|_| {}).await?;
//!     println!("{} images compared", batch.analyses.len());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod credentials;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod product;
pub mod providers;
pub mod report;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{
    ConfigError, PipelineError, PipelineResult, PrismError, ProviderError, ProviderErrorKind,
    Result,
};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{
    load_images, AnalysisOutcome, AnalyzeOptions, Analyzer, BatchReport, ImageFailure, ImageSource,
};
pub use product::{ProductItem, ProductSearchClient};
pub use providers::{DetectorFactory, LabelDetector};
pub use report::HtmlReport;
pub use types::{ImageRecord, KeywordMap, MergedAnalysis, ProviderResult};

use std::path::PathBuf;
use std::sync::Arc;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prism comparison run - the main entry point.
///
/// Holds the configuration and an analyzer wired to both detectors. The
/// detectors are created once and shared by every image of the batch.
pub struct Prism {
    config: Config,
    analyzer: Analyzer,
}

impl Prism {
    /// Build both detectors from configuration and credentials files.
    pub fn new(config: Config) -> Result<Self> {
        tracing::debug!("Initializing Prism v{}", VERSION);
        let provider_a = DetectorFactory::google(&config)?;
        let provider_b = DetectorFactory::rekognition(&config)?;
        Ok(Self::with_detectors(config, provider_a, provider_b))
    }

    /// Use caller-supplied detectors (provider A, provider B).
    pub fn with_detectors(
        config: Config,
        provider_a: Arc<dyn LabelDetector>,
        provider_b: Arc<dyn LabelDetector>,
    ) -> Self {
        let options = Self::analyze_options(&config);
        Self {
            analyzer: Analyzer::new(provider_a, provider_b, options),
            config,
        }
    }

    /// Analyzer settings taken from the processing and limits sections.
    pub fn analyze_options(config: &Config) -> AnalyzeOptions {
        AnalyzeOptions {
            parallel: config.processing.parallel,
            timeout_ms: config.limits.provider_timeout_ms,
            keep_going: config.processing.keep_going,
        }
    }

    /// Get a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// List the images of the configured input directory.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let source = ImageSource::new(&self.config.input);
        Ok(source.discover(&self.config.input_dir())?)
    }

    /// Load every image, then analyze the batch.
    ///
    /// No provider call is made unless every file was read.
    pub async fn analyze<F>(&self, paths: Vec<PathBuf>, on_result: F) -> Result<BatchReport>
    where
        F: Fn(&AnalysisOutcome) + Send + Sync + 'static,
    {
        let records = load_images(paths).await?;
        tracing::info!("Loaded {} image(s)", records.len());
        Ok(self.analyzer.analyze_batch(records, on_result).await?)
    }

    /// Write the HTML report to the configured path.
    pub fn write_report(&self, batch: &BatchReport) -> Result<PathBuf> {
        let path = self.config.report_path();
        HtmlReport::new(self.config.report.clone()).write(batch, &path)?;
        Ok(path)
    }

    /// Discover, load, analyze and write the report in one go.
    pub async fn compare<F>(&self, on_result: F) -> Result<BatchReport>
    where
        F: Fn(&AnalysisOutcome) + Send + Sync + 'static,
    {
        let paths = self.discover()?;
        let batch = self.analyze(paths, on_result).await?;
        self.write_report(&batch)?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_analyze_options_from_config() {
        let mut config = Config::default();
        config.processing.parallel = 3;
        config.processing.keep_going = true;
        config.limits.provider_timeout_ms = 500;

        let options = Prism::analyze_options(&config);
        assert_eq!(options.parallel, 3);
        assert!(options.keep_going);
        assert_eq!(options.timeout_ms, 500);
    }

    #[test]
    fn test_new_fails_without_credentials() {
        let mut config = Config::default();
        config.google.api_key = "inline-key".to_string();
        config.rekognition.credentials = PathBuf::from("/nonexistent/aws-creds.json");

        let err = Prism::new(config).err().unwrap();
        assert!(matches!(
            err,
            PrismError::Config(ConfigError::Credentials { .. })
        ));
    }
}
