//! Batch run: progress tracking, report and JSON dump, summary.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use prism_core::{output, AnalysisOutcome, BatchReport};

use super::{CompareArgs, CompareContext};

/// Analyze every image, then write the report and the optional JSON dump.
pub async fn run_comparison(ctx: CompareContext, args: &CompareArgs) -> anyhow::Result<()> {
    let paths = ctx.prism.discover()?;
    if paths.is_empty() {
        tracing::warn!(
            "No images found in {:?}; writing an empty report",
            ctx.prism.config().input_dir()
        );
    } else {
        tracing::info!("Found {} image(s) to compare", paths.len());
    }

    let progress = create_progress_bar(paths.len() as u64);
    let start_time = Instant::now();

    let on_result = {
        let progress = progress.clone();
        move |outcome: &AnalysisOutcome| {
            match outcome {
                AnalysisOutcome::Success(merged) => progress.set_message(merged.display_name()),
                AnalysisOutcome::Failure(path, e) => {
                    progress.println(format!("  failed: {} ({e})", path.display()));
                }
            }
            progress.inc(1);
        }
    };

    let batch = match ctx.prism.analyze(paths, on_result).await {
        Ok(batch) => batch,
        Err(e) => {
            progress.abandon();
            return Err(e.into());
        }
    };
    progress.finish_and_clear();

    let report_path = write_outputs(&ctx, args, &batch)?;

    print_summary(
        batch.analyses.len(),
        batch.failures.len(),
        start_time.elapsed(),
        &report_path,
    );

    Ok(())
}

/// Write the JSON dump, then the report.
///
/// A dump failure leaves any previous report untouched.
fn write_outputs(
    ctx: &CompareContext,
    args: &CompareArgs,
    batch: &BatchReport,
) -> anyhow::Result<PathBuf> {
    if let Some(json_path) = &args.json {
        output::write_analyses(
            json_path,
            &batch.analyses,
            args.format.into(),
            ctx.prism.config().output.json_pretty,
        )?;
    }
    Ok(ctx.prism.write_report(batch)?)
}

/// Create a progress bar for the analysis phase.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("analyzing...");
    pb
}

/// Print a formatted summary after the run.
fn print_summary(succeeded: usize, failed: usize, elapsed: Duration, report_path: &Path) {
    let rate = if elapsed.as_secs_f64() > 0.0 {
        succeeded as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Compared:     {:>8}", succeeded);
    if failed > 0 {
        eprintln!("    Failed:       {:>8}", failed);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.1} img/sec", rate);
    eprintln!("  ====================================");
    eprintln!("    Report: {}", report_path.display());
}
