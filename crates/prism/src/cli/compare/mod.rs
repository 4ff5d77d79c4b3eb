//! The `prism compare` command: label a directory with both providers and
//! render the comparison report.

mod batch;
mod setup;
pub mod types;

pub use types::OutputFormat;

use clap::Args;
use prism_core::{Config, Prism};
use std::path::PathBuf;

use batch::run_comparison;
use setup::setup_comparison;

/// Arguments for the `compare` command.
///
/// Every option left unset keeps the value from the config file.
#[derive(Args, Debug, Default)]
pub struct CompareArgs {
    /// Directory of images to compare (default: ./img)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// HTML report path (default: ./out/index.html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also dump the merged analyses to this file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Format of the --json dump
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Maximum images analyzed at once
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Report failed images instead of aborting the run
    #[arg(long)]
    pub keep_going: bool,

    /// Also request text detection from Google Vision (results are discarded)
    #[arg(long)]
    pub with_text: bool,

    /// Per-call provider timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}

/// Comparison context assembled by setup_comparison().
pub(crate) struct CompareContext {
    pub prism: Prism,
}

/// Execute the compare command.
pub async fn execute(args: CompareArgs, config: Config) -> anyhow::Result<()> {
    let ctx = setup_comparison(&args, config)?;
    run_comparison(ctx, &args).await
}
