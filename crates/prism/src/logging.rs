//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Logs go to stderr; stdout is reserved for command output.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Crates whose request-level chatter is capped at `warn` unless RUST_LOG says otherwise.
const NOISY_TARGETS: [&str; 4] = ["aws_smithy_runtime", "aws_config", "hyper", "rustls"];

/// Build the default filter directive for a base level.
fn default_directive(level: &str) -> String {
    let mut directive = level.to_string();
    for target in NOISY_TARGETS {
        directive.push_str(&format!(",{target}=warn"));
    }
    directive
}

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` section with CLI overrides.
pub fn init_from_config(config: &prism_core::Config, verbose: bool, json_logs: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let json_format = json_logs || config.logging.format == "json";
    init(level, json_format);
}
