//! Prism CLI - compare cloud vision label detectors on a directory of images.
//!
//! Every image is sent to Google Cloud Vision and AWS Rekognition; the
//! detected labels are laid out side by side in a static HTML page together
//! with a product search string per provider.
//!
//! # Usage
//!
//! ```bash
//! # Compare every image in ./img, write ./out/index.html
//! prism compare
//!
//! # Different folders, keep going past failed images, dump raw results
//! prism compare --input ./photos --output ./site/index.html --keep-going --json raw.json
//!
//! # Look up a product
//! prism search "garden shovel"
//!
//! # View configuration
//! prism config show
//! ```

use clap::{Parser, Subcommand};
use prism_core::Config;
use std::path::{Path, PathBuf};

mod cli;
mod logging;

/// Prism - side-by-side comparison of cloud vision label detectors.
#[derive(Parser, Debug)]
#[command(name = "prism")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "PRISM_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Label every image with both providers and render the comparison report
    Compare(cli::compare::CompareArgs),

    /// Search the product catalog for keywords
    Search(cli::search::SearchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // `config init` may target a file that does not exist yet.
    let creating = matches!(cli.command, Commands::Config(_));
    let config = load_config(cli.config.as_deref(), creating)?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Prism v{}", prism_core::VERSION);

    match cli.command {
        Commands::Compare(args) => cli::compare::execute(args, config).await,
        Commands::Search(args) => cli::search::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}

/// Load the effective configuration.
///
/// An explicit path must load unless `missing_ok` and the file is absent;
/// the default location falls back to defaults with a warning. Logging isn't
/// initialized yet, so warnings go through eprintln.
fn load_config(explicit: Option<&Path>, missing_ok: bool) -> anyhow::Result<Config> {
    match explicit {
        Some(path) if missing_ok && !path.exists() => Ok(Config::default()),
        Some(path) => Ok(Config::load_from(path)?),
        None => match Config::load() {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `prism config path`."
                );
                Ok(Config::default())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert!(load_config(Some(&path), false).is_err());
    }

    #[tokio::test]
    async fn config_init_creates_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("new").join("prism.toml");
        let cli = Cli::parse_from([
            "prism",
            "--config",
            path.to_str().unwrap(),
            "config",
            "init",
        ]);

        let creating = matches!(cli.command, Commands::Config(_));
        let config = load_config(cli.config.as_deref(), creating).unwrap();
        let Commands::Config(args) = cli.command else {
            panic!("expected the config command");
        };
        cli::config::execute(args, config, cli.config).await.unwrap();

        let loaded = load_config(Some(&path), false).unwrap();
        assert_eq!(loaded.processing.parallel, 16);
    }
}
