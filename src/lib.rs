//! script-runner - discover, pick and run project scripts
//!
//! Scripts are found under a scripts directory (by default `./scripts`, then
//! `./src/scripts`), picked by name or from an interactive list, and run as a
//! child process with inherited stdio and forwarded termination signals.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod scripts;
pub mod ui;

// Re-export commonly used types
pub use error::{Result, RunnerError};

/// Current version of script-runner
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
