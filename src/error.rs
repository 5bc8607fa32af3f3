//! Error types for script-runner

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for script-runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Error type for loading script-runner configuration
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Configuration parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to read config file '{}': {}", .path.display(), .error)]
    Read { path: PathBuf, error: String },
}

/// Script directory scanning errors
///
/// Both variants are recoverable: the registry treats the directory as empty
/// and moves on to the next candidate.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Scripts directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Error reading scripts directory '{}': {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Script selection errors
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("No scripts found in the specified directories")]
    NoScriptsFound,

    #[error("No script was selected")]
    SelectionCancelled,

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

/// Script execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Script '{script}' failed with code {code}")]
    AbnormalExit { script: String, code: i32 },

    #[error("Failed to run script '{script}': {source}")]
    Spawn {
        script: String,
        #[source]
        source: io::Error,
    },

    #[error("A script is already running (pid {0:?})")]
    AlreadyRunning(Option<u32>),

    #[error("Failed to install signal handlers: {0}")]
    SignalSetup(#[source] io::Error),
}

/// Errors reported by a process spawner or a running child
#[derive(Error, Debug)]
pub enum SpawnError {
    /// The cancellation token fired before or while the process ran
    #[error("Script execution was cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for discovery operations
pub type DiscoveryResult<T> = std::result::Result<T, DiscoveryError>;

/// Specialized result type for selection operations
pub type SelectResult<T> = std::result::Result<T, SelectError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

impl ExecutionError {
    /// Exit code the CLI should surface for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::AbnormalExit { code, .. } if (1..=255).contains(code) => *code,
            _ => 1,
        }
    }
}
