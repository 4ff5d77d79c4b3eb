//! Full comparison run against stub detectors.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use prism_core::{
    Config, KeywordMap, LabelDetector, MergedAnalysis, PipelineError, Prism, PrismError,
    ProviderError, ProviderErrorKind, ProviderResult,
};

struct StubDetector {
    name: &'static str,
    result: ProviderResult,
    fail_on: Option<&'static [u8]>,
}

#[async_trait]
impl LabelDetector for StubDetector {
    fn name(&self) -> &str {
        self.name
    }

    async fn detect_labels(&self, image: &[u8]) -> Result<ProviderResult, ProviderError> {
        if self.fail_on == Some(image) {
            return Err(ProviderError::new(ProviderErrorKind::Quota, "limit reached"));
        }
        Ok(self.result.clone())
    }
}

fn google() -> StubDetector {
    StubDetector {
        name: "google",
        result: ProviderResult::new(
            [("Shovel", 0.95), ("Tool", 0.8)].into_iter().collect(),
            KeywordMap::new(),
        ),
        fail_on: None,
    }
}

fn rekognition() -> StubDetector {
    StubDetector {
        name: "rekognition",
        result: ProviderResult::labels_only([("Shovel", 92.1)].into_iter().collect()),
        fail_on: None,
    }
}

fn config_for(root: &std::path::Path) -> Config {
    let mut config = Config::default();
    config.input.dir = root.join("img");
    config.output.report = root.join("out").join("index.html");
    config
}

#[tokio::test]
async fn test_shovel_comparison_writes_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img").join("shovel.jpg"), b"shovel-bytes").unwrap();

    let prism = Prism::with_detectors(
        config_for(dir.path()),
        Arc::new(google()),
        Arc::new(rekognition()),
    );

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let batch = prism
        .compare(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(batch.analyses.len(), 1);
    assert!(batch.failures.is_empty());

    let expected = MergedAnalysis::merge(
        dir.path().join("img").join("shovel.jpg"),
        ProviderResult::new(
            [("Shovel", 0.95), ("Tool", 0.8)].into_iter().collect(),
            KeywordMap::new(),
        ),
        ProviderResult::labels_only([("Shovel", 92.1)].into_iter().collect()),
    );
    assert_eq!(batch.analyses[0], expected);

    let html = std::fs::read_to_string(dir.path().join("out").join("index.html")).unwrap();
    assert!(html.contains("shovel.jpg"));
    assert!(html.contains("Shovel Tool "));
    assert!(html.contains("<td>92.1</td>"));
}

#[tokio::test]
async fn test_empty_directory_renders_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();

    let prism = Prism::with_detectors(
        config_for(dir.path()),
        Arc::new(google()),
        Arc::new(rekognition()),
    );
    let batch = prism.compare(|_| {}).await.unwrap();

    assert!(batch.analyses.is_empty());
    let html = std::fs::read_to_string(dir.path().join("out").join("index.html")).unwrap();
    assert!(!html.contains("<table"));
}

#[tokio::test]
async fn test_missing_directory_fails_before_any_call() {
    let dir = tempfile::tempdir().unwrap();
    let prism = Prism::with_detectors(
        config_for(dir.path()),
        Arc::new(google()),
        Arc::new(rekognition()),
    );

    let err = prism.compare(|_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        PrismError::Pipeline(PipelineError::DirectoryList { .. })
    ));
    assert!(!dir.path().join("out").join("index.html").exists());
}

#[tokio::test]
async fn test_provider_failure_aborts_without_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img").join("a.jpg"), b"ok").unwrap();
    std::fs::write(dir.path().join("img").join("b.jpg"), b"bad").unwrap();

    let mut failing = rekognition();
    failing.fail_on = Some(&b"bad"[..]);
    let prism = Prism::with_detectors(
        config_for(dir.path()),
        Arc::new(google()),
        Arc::new(failing),
    );

    let err = prism.compare(|_| {}).await.unwrap_err();
    match err {
        PrismError::Pipeline(PipelineError::Provider {
            path,
            provider,
            kind,
            ..
        }) => {
            assert_eq!(path, dir.path().join("img").join("b.jpg"));
            assert_eq!(provider, "rekognition");
            assert_eq!(kind, ProviderErrorKind::Quota);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!dir.path().join("out").join("index.html").exists());
}

#[tokio::test]
async fn test_keep_going_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("img")).unwrap();
    std::fs::write(dir.path().join("img").join("a.jpg"), b"ok").unwrap();
    std::fs::write(dir.path().join("img").join("b.jpg"), b"bad").unwrap();

    let mut config = config_for(dir.path());
    config.processing.keep_going = true;
    let mut failing = google();
    failing.fail_on = Some(&b"bad"[..]);
    let prism = Prism::with_detectors(config, Arc::new(failing), Arc::new(rekognition()));

    let batch = prism.compare(|_| {}).await.unwrap();
    assert_eq!(batch.analyses.len(), 1);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].path, dir.path().join("img").join("b.jpg"));

    let html = std::fs::read_to_string(prism.config().report_path()).unwrap();
    assert!(html.contains("Failed images"));
}
