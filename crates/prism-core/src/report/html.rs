//! Static HTML rendering of a comparison batch.
//!
//! The page is rebuilt in full on every run and written through a temp file
//! in the target directory, so a failed run never leaves a half-written
//! report behind.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Component, Path, PathBuf};

use super::{provider_a_search_string, provider_b_search_string, score_text, table_rows};
use crate::config::ReportConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::BatchReport;
use crate::types::MergedAnalysis;

const STYLESHEET: &str =
    "https://stackpath.bootstrapcdn.com/bootstrap/4.5.0/css/bootstrap.min.css";

/// Column headings for provider A and provider B.
const PROVIDER_A: &str = "Google";
const PROVIDER_B: &str = "Amazon";

/// Renders the side-by-side comparison page.
pub struct HtmlReport {
    config: ReportConfig,
}

impl HtmlReport {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Render the whole document. Image links are made relative to `report_path`.
    pub fn render(&self, batch: &BatchReport, report_path: &Path) -> String {
        let mut html = String::new();
        let _ = write!(
            html,
            "<html><head><meta charset=\"utf-8\"><title>Label comparison</title>\
             <link rel=\"stylesheet\" href=\"{STYLESHEET}\"></head>\
             <body><div class=\"container\">"
        );

        for analysis in &batch.analyses {
            self.render_image(&mut html, analysis, report_path);
        }

        if !batch.failures.is_empty() {
            html.push_str("<br><h2>Failed images</h2><ul>");
            for failure in &batch.failures {
                let _ = write!(
                    html,
                    "<li><b>{}</b>: {}</li>",
                    escape(&failure.path.display().to_string()),
                    escape(&failure.message)
                );
            }
            html.push_str("</ul>");
        }

        html.push_str("</div></body></html>\n");
        html
    }

    fn render_image(&self, html: &mut String, analysis: &MergedAnalysis, report_path: &Path) {
        let chars = self.config.score_chars;

        let _ = write!(
            html,
            "<br><br><h1 class=\"text-center\">{}</h1><br>\
             <div class=\"text-center\"><img src=\"{}\" style=\"height:200px\"></div>",
            escape(&analysis.display_name()),
            escape(&image_src(&analysis.path, report_path)),
        );

        let _ = write!(
            html,
            "<table class=\"table\"><tr><th colspan=\"2\">{b}</th><th colspan=\"4\">{a}</th></tr>\
             <tr><th>Label</th><th>%</th><th>Label</th><th>%</th><th>Brand</th><th>%</th></tr>",
            a = PROVIDER_A,
            b = PROVIDER_B,
        );
        for row in table_rows(analysis, &self.config) {
            html.push_str("<tr>");
            for cell in [row.provider_b_label, row.provider_a_label, row.provider_a_logo] {
                match cell {
                    Some((text, score)) => {
                        let _ = write!(
                            html,
                            "<td>{}</td><td>{}</td>",
                            escape(text),
                            score_text(score, chars)
                        );
                    }
                    None => html.push_str("<td></td><td></td>"),
                }
            }
            html.push_str("</tr>");
        }
        html.push_str("</table>");

        let _ = write!(
            html,
            "<div><b>Search Strings</b><br>\
             <p><b>{b}: </b>{b_search}</p>\
             <p><b>{a}: </b>{a_search}</p></div>",
            a = PROVIDER_A,
            b = PROVIDER_B,
            a_search = escape(&provider_a_search_string(analysis, &self.config)),
            b_search = escape(&provider_b_search_string(analysis, &self.config)),
        );
    }

    /// Render and write the report, replacing any previous file atomically.
    pub fn write(&self, batch: &BatchReport, report_path: &Path) -> PipelineResult<()> {
        let html = self.render(batch, report_path);
        write_atomic(report_path, html.as_bytes())?;
        tracing::info!("Report written to {:?}", report_path);
        Ok(())
    }
}

/// Write through a temp file in the same directory, then rename over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> PipelineResult<()> {
    let render_err = |message: String| PipelineError::Render {
        path: path.to_path_buf(),
        message,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| render_err(e.to_string()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| render_err(e.to_string()))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.flush())
        .map_err(|e| render_err(e.to_string()))?;
    tmp.persist(path).map_err(|e| render_err(e.error.to_string()))?;
    Ok(())
}

/// Link to an image from the report's directory.
///
/// Both paths are resolved against the working directory, so `./img/a.jpg`
/// seen from `./out/index.html` becomes `../img/a.jpg`.
pub fn image_src(image: &Path, report_path: &Path) -> String {
    match std::env::current_dir() {
        Ok(cwd) => image_src_from(&cwd, image, report_path),
        Err(_) => slashed(image),
    }
}

fn image_src_from(cwd: &Path, image: &Path, report_path: &Path) -> String {
    let image = normalize(&cwd.join(image));
    let report = normalize(&cwd.join(report_path));
    let report_dir = report.parent().unwrap_or(&report);
    match pathdiff::diff_paths(&image, report_dir) {
        Some(relative) => slashed(&relative),
        None => slashed(&image),
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Escape text for HTML element content and double-quoted attributes.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
