//! Image source: enumerates the files of the input directory.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::InputConfig;
use crate::error::{PipelineError, PipelineResult};

/// Lists candidate images in a directory.
pub struct ImageSource {
    extensions: Vec<String>,
}

impl ImageSource {
    /// Create a source from input settings.
    pub fn new(config: &InputConfig) -> Self {
        Self {
            extensions: config
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// List the regular files directly inside `dir`, sorted by path.
    ///
    /// Without an extension allow-list every file is treated as an image.
    /// Subdirectories are not descended into.
    pub fn discover(&self, dir: &Path) -> PipelineResult<Vec<PathBuf>> {
        let list_err = |source: io::Error| PipelineError::DirectoryList {
            path: dir.to_path_buf(),
            source,
        };
        // WalkDir yields nothing for a regular-file root at min_depth(1)
        if !std::fs::metadata(dir).map_err(list_err)?.is_dir() {
            return Err(list_err(io::Error::other("not a directory")));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| list_err(e.into()))?;
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        tracing::debug!("Discovered {} file(s) in {:?}", files.len(), dir);
        Ok(files)
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.extensions.iter().any(|allowed| *allowed == ext)
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn test_discover_lists_every_file_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "shovel.jpg");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "axe.png");
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested"), "hidden.jpg");

        let source = ImageSource::new(&InputConfig::default());
        let files = source.discover(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["axe.png", "notes.txt", "shovel.jpg"]);
    }

    #[test]
    fn test_discover_with_extension_filter() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "shovel.JPG");
        touch(dir.path(), "notes.txt");

        let config = InputConfig {
            extensions: vec![".jpg".to_string(), "png".to_string()],
            ..InputConfig::default()
        };
        let files = ImageSource::new(&config).discover(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("shovel.JPG"));
    }

    #[test]
    fn test_discover_missing_directory_fails() {
        let source = ImageSource::new(&InputConfig::default());
        let err = source
            .discover(Path::new("/definitely/not/a/prism/dir"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryList { .. }));
        assert!(err.to_string().contains("/definitely/not/a/prism/dir"));
    }

    #[test]
    fn test_discover_file_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("shovel.jpg");
        std::fs::write(&file, b"jpeg").unwrap();

        let source = ImageSource::new(&InputConfig::default());
        let err = source.discover(&file).unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryList { .. }));
        assert!(err.to_string().contains("not a directory"));
    }
}
