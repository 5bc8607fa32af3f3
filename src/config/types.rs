//! Core configuration types
//!
//! This module defines the data structures that represent a script-runner.yml
//! configuration file. Every field has a default, so an absent file and an
//! empty file behave the same.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default directories searched for scripts, in order
pub const DEFAULT_DIRECTORIES: &[&str] = &["./scripts", "./src/scripts"];

/// Top-level configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Candidate script directories, tried in order
    pub directories: Vec<String>,

    /// Interpreter the script path is handed to (e.g., ["bun"] or ["node"]).
    /// An empty list executes the script file directly.
    pub interpreter: Vec<String>,

    /// File extensions recognised as scripts, without the leading dot
    pub extensions: Vec<String>,

    /// File that marks a sub-directory as a script
    pub entry_point: String,

    /// Sub-directory name that is never treated as a script
    pub reserved_dir: String,

    /// Files starting with this prefix are private helpers
    pub private_prefix: String,

    /// Delay between signal cleanup and the forced exit
    pub grace_period_ms: u64,

    /// Number of choices visible at once in the interactive prompt
    pub page_size: usize,

    /// Load `.env` from the working directory before running a script
    pub dotenv: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            directories: DEFAULT_DIRECTORIES.iter().map(|d| d.to_string()).collect(),
            interpreter: vec!["bun".to_string()],
            extensions: vec!["js".to_string(), "ts".to_string()],
            entry_point: "_main.ts".to_string(),
            reserved_dir: "runner".to_string(),
            private_prefix: "_".to_string(),
            grace_period_ms: 100,
            page_size: 10,
            dotenv: false,
        }
    }
}

impl Config {
    /// Grace delay as a `Duration`
    pub fn grace_period(&self) -> Duration {
        Duration::from_millis(self.grace_period_ms)
    }

    /// Private prefix as a single character (validated by `validate_config`)
    pub fn private_prefix_char(&self) -> Option<char> {
        self.private_prefix.chars().next()
    }
}
