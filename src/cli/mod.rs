//! CLI interface and argument parsing
//!
//! This module handles command-line interface parsing, logging setup
//! and shell completion.

pub mod app;

use crate::runner::Verbosity;

// Re-export main types
pub use app::*;

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbosity: Verbosity) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        match verbosity {
            Verbosity::Verbose => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("warn"),
        }
    });

    // A subscriber may already be set (e.g. when embedded); keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
