//! Comparison setup: config overrides and detector creation.

use prism_core::config::FeatureType;
use prism_core::{Config, Prism};

use super::{CompareArgs, CompareContext};

/// Apply CLI overrides, validate, and build both detectors.
pub fn setup_comparison(args: &CompareArgs, config: Config) -> anyhow::Result<CompareContext> {
    let config = apply_overrides(args, config)?;

    let input_dir = config.input_dir();
    if !input_dir.is_dir() {
        anyhow::bail!(
            "Image directory does not exist: {:?}\n\n  Hint: Pass --input or set input.dir in the config.",
            input_dir
        );
    }

    tracing::info!(
        "Comparing images in {:?} (parallel: {}, timeout: {}ms)",
        input_dir,
        config.processing.parallel,
        config.limits.provider_timeout_ms
    );
    let prism = Prism::new(config)?;

    Ok(CompareContext { prism })
}

/// Fold command-line options into the loaded config and re-validate.
pub fn apply_overrides(args: &CompareArgs, mut config: Config) -> anyhow::Result<Config> {
    if let Some(input) = &args.input {
        config.input.dir = input.clone();
    }
    if let Some(output) = &args.output {
        config.output.report = output.clone();
    }
    if let Some(parallel) = args.parallel {
        config.processing.parallel = parallel;
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.limits.provider_timeout_ms = timeout_ms;
    }
    if args.keep_going {
        config.processing.keep_going = true;
    }
    if args.with_text && !config.google.features.contains(&FeatureType::TextDetection) {
        config.google.features.push(FeatureType::TextDetection);
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_no_overrides_keeps_config() {
        let config = apply_overrides(&CompareArgs::default(), Config::default()).unwrap();
        assert_eq!(config.input.dir, PathBuf::from("./img"));
        assert_eq!(config.processing.parallel, 16);
        assert!(!config.processing.keep_going);
        assert!(!config
            .google
            .features
            .contains(&FeatureType::TextDetection));
    }

    #[test]
    fn test_overrides_applied() {
        let args = CompareArgs {
            input: Some(PathBuf::from("./photos")),
            output: Some(PathBuf::from("./site/index.html")),
            parallel: Some(2),
            timeout_ms: Some(1000),
            keep_going: true,
            with_text: true,
            ..Default::default()
        };
        let config = apply_overrides(&args, Config::default()).unwrap();

        assert_eq!(config.input.dir, PathBuf::from("./photos"));
        assert_eq!(config.output.report, PathBuf::from("./site/index.html"));
        assert_eq!(config.processing.parallel, 2);
        assert_eq!(config.limits.provider_timeout_ms, 1000);
        assert!(config.processing.keep_going);
        assert!(config
            .google
            .features
            .contains(&FeatureType::TextDetection));
    }

    #[test]
    fn test_with_text_not_duplicated() {
        let args = CompareArgs {
            with_text: true,
            ..Default::default()
        };
        let config = apply_overrides(&args, Config::default()).unwrap();
        let config = apply_overrides(&args, config).unwrap();
        let text_count = config
            .google
            .features
            .iter()
            .filter(|f| **f == FeatureType::TextDetection)
            .count();
        assert_eq!(text_count, 1);
    }

    #[test]
    fn test_zero_parallel_rejected() {
        let args = CompareArgs {
            parallel: Some(0),
            ..Default::default()
        };
        assert!(apply_overrides(&args, Config::default()).is_err());
    }

    #[test]
    fn test_missing_input_dir_fails_setup() {
        let dir = tempfile::tempdir().unwrap();
        let args = CompareArgs {
            input: Some(dir.path().join("missing")),
            ..Default::default()
        };
        let err = setup_comparison(&args, Config::default()).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
    }
}
