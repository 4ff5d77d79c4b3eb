//! Machine-readable dump of merged analyses.
//!
//! Complements the HTML report with the raw keyword maps, either as one JSON
//! array or as JSON Lines (one `MergedAnalysis` per line).

use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::report::html::write_atomic;
use crate::types::MergedAnalysis;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Serializes analyses to a writer in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// `pretty` only affects the JSON array format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write a whole batch.
    pub fn write_all<T: Serialize>(&mut self, items: &[T]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, items)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, items).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                for item in items {
                    serde_json::to_writer(&mut self.writer, item).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Dump analyses to `path`, replacing any previous file atomically.
pub fn write_analyses(
    path: &Path,
    analyses: &[MergedAnalysis],
    format: OutputFormat,
    pretty: bool,
) -> PipelineResult<()> {
    let mut writer = OutputWriter::new(Vec::new(), format, pretty);
    writer
        .write_all(analyses)
        .map_err(|e| PipelineError::Render {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    write_atomic(path, &writer.into_inner())?;
    tracing::info!("{} analyses written to {:?}", analyses.len(), path);
    Ok(())
}
