//! Image loader: reads every discovered file into memory.

use futures_util::future::try_join_all;
use std::path::PathBuf;

use crate::error::{PipelineError, PipelineResult};
use crate::types::ImageRecord;

/// Read all files concurrently.
///
/// Every read is issued up front and the batch resolves only when all of
/// them have completed. The first failure aborts the whole batch with an
/// error naming the unreadable file. Output order matches input order.
pub async fn load_images(paths: Vec<PathBuf>) -> PipelineResult<Vec<ImageRecord>> {
    let reads = paths.into_iter().map(|path| async move {
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(ImageRecord::new(path, bytes)),
            Err(source) => Err(PipelineError::FileRead { path, source }),
        }
    });

    let records = try_join_all(reads).await?;
    let total: usize = records.iter().map(|r| r.bytes.len()).sum();
    tracing::debug!("Loaded {} image(s), {} bytes", records.len(), total);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_preserves_order_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("b.jpg");
        std::fs::write(&a, b"first").unwrap();
        std::fs::write(&b, b"second").unwrap();

        let records = load_images(vec![b.clone(), a.clone()]).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].path, b);
        assert_eq!(records[0].bytes, b"second");
        assert_eq!(records[1].path, a);
    }

    #[tokio::test]
    async fn test_load_failure_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.jpg");
        std::fs::write(&good, b"ok").unwrap();
        let missing = dir.path().join("missing.jpg");

        let err = load_images(vec![good, missing.clone()]).await.unwrap_err();
        match err {
            PipelineError::FileRead { path, .. } => assert_eq!(path, missing),
            other => panic!("Expected FileRead, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_load_empty() {
        let records = load_images(Vec::new()).await.unwrap();
        assert!(records.is_empty());
    }
}
