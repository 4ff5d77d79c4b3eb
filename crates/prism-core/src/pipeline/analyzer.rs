//! Multi-provider analyzer.
//!
//! Sends every image to both detectors at once and merges their normalized
//! results into one `MergedAnalysis`. Batches spawn one tokio task per image,
//! bounded by a semaphore, and either abort on the first failure or collect
//! failures per image.

use crate::error::{PipelineError, PipelineResult};
use crate::providers::LabelDetector;
use crate::types::{ImageRecord, MergedAnalysis, ProviderResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Batch behavior for the analyzer.
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Maximum images analyzed at once
    pub parallel: usize,
    /// Per-call timeout for each detector, in milliseconds
    pub timeout_ms: u64,
    /// Collect per-image failures instead of failing the batch
    pub keep_going: bool,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            parallel: 16,
            timeout_ms: 30_000,
            keep_going: false,
        }
    }
}

/// Result of analyzing a single image.
#[derive(Debug)]
pub enum AnalysisOutcome {
    Success(MergedAnalysis),
    Failure(PathBuf, PipelineError),
}

/// An image that could not be analyzed, kept for the report.
#[derive(Debug, Clone)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Everything a batch produced, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub analyses: Vec<MergedAnalysis>,
    pub failures: Vec<ImageFailure>,
}

/// Runs both detectors against each image.
#[derive(Clone)]
pub struct Analyzer {
    provider_a: Arc<dyn LabelDetector>,
    provider_b: Arc<dyn LabelDetector>,
    options: AnalyzeOptions,
}

impl Analyzer {
    pub fn new(
        provider_a: Arc<dyn LabelDetector>,
        provider_b: Arc<dyn LabelDetector>,
        options: AnalyzeOptions,
    ) -> Self {
        Self {
            provider_a,
            provider_b,
            options,
        }
    }

    /// Analyze one image with both providers concurrently.
    ///
    /// The image bytes are consumed and released once both calls return.
    pub async fn analyze(&self, record: ImageRecord) -> PipelineResult<MergedAnalysis> {
        let ImageRecord { path, bytes } = record;

        let (result_a, result_b) = tokio::join!(
            self.call(&self.provider_a, &path, &bytes),
            self.call(&self.provider_b, &path, &bytes),
        );
        drop(bytes);

        let merged = MergedAnalysis::merge(path, result_a?, result_b?);
        tracing::debug!(
            "{:?}: {} {} labels / {} logos, {} {} labels",
            merged.path,
            self.provider_a.name(),
            merged.provider_a.labels.len(),
            merged.provider_a.logos.len(),
            self.provider_b.name(),
            merged.provider_b.labels.len(),
        );
        Ok(merged)
    }

    async fn call(
        &self,
        detector: &Arc<dyn LabelDetector>,
        path: &Path,
        bytes: &[u8],
    ) -> PipelineResult<ProviderResult> {
        match tokio::time::timeout(
            Duration::from_millis(self.options.timeout_ms),
            detector.detect_labels(bytes),
        )
        .await
        {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(PipelineError::from_provider(
                path.to_path_buf(),
                detector.name(),
                e,
            )),
            Err(_) => Err(PipelineError::Timeout {
                path: path.to_path_buf(),
                provider: detector.name().to_string(),
                timeout_ms: self.options.timeout_ms,
            }),
        }
    }

    /// Analyze a loaded batch.
    ///
    /// Spawns one task per image, bounded by a semaphore. Calls `on_result`
    /// for each completed image so the CLI can report progress. Results are
    /// returned in input order.
    ///
    /// Without `keep_going` the first failure (in input order) aborts the
    /// remaining tasks and is returned as the batch error, so every returned
    /// analysis corresponds to one input record.
    pub async fn analyze_batch<F>(
        &self,
        records: Vec<ImageRecord>,
        on_result: F,
    ) -> PipelineResult<BatchReport>
    where
        F: Fn(&AnalysisOutcome) + Send + Sync + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.options.parallel.max(1)));
        let on_result = Arc::new(on_result);
        let mut handles = Vec::with_capacity(records.len());

        for record in records {
            let path = record.path.clone();
            let semaphore = semaphore.clone();
            let analyzer = self.clone();
            let on_result = on_result.clone();

            let handle = tokio::spawn(async move {
                let outcome = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        let path = record.path.clone();
                        match analyzer.analyze(record).await {
                            Ok(merged) => AnalysisOutcome::Success(merged),
                            Err(e) => AnalysisOutcome::Failure(path, e),
                        }
                    }
                    Err(e) => AnalysisOutcome::Failure(
                        record.path.clone(),
                        PipelineError::Task {
                            path: record.path,
                            message: e.to_string(),
                        },
                    ),
                };
                on_result(&outcome);
                outcome
            });

            handles.push((path, handle));
        }

        let mut report = BatchReport::default();
        let mut handles = handles.into_iter();

        while let Some((path, handle)) = handles.next() {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!("Analysis task panicked for {:?}: {e}", path);
                    AnalysisOutcome::Failure(
                        path.clone(),
                        PipelineError::Task {
                            path,
                            message: e.to_string(),
                        },
                    )
                }
            };

            match outcome {
                AnalysisOutcome::Success(merged) => report.analyses.push(merged),
                AnalysisOutcome::Failure(path, error) => {
                    if !self.options.keep_going {
                        for (_, remaining) in handles {
                            remaining.abort();
                        }
                        return Err(error);
                    }
                    tracing::warn!("Analysis failed: {error}");
                    report.failures.push(ImageFailure {
                        path,
                        message: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}
