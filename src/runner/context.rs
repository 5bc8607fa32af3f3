//! Execution context for script running
//!
//! The context tracks the settings needed while a script runs and owns the
//! user-facing message helpers.

use crate::config::Config;
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Execution context shared by the selector and the lifecycle manager
#[derive(Debug, Clone)]
pub struct Context {
    /// Current working directory (scripts run here)
    pub working_dir: PathBuf,

    /// Interpreter the script path is appended to (e.g., ["bun"])
    pub interpreter: Vec<String>,

    /// Delay between signal cleanup and the forced exit
    pub grace_period: Duration,

    /// Verbosity level
    pub verbosity: Verbosity,
}

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Normal = 1,
    Verbose = 2,
}

impl Context {
    /// Create a new context with default settings
    pub fn new() -> Self {
        Context::from_config(&Config::default())
    }

    /// Create a context from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Context {
            working_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            interpreter: config.interpreter.clone(),
            grace_period: config.grace_period(),
            verbosity: Verbosity::Normal,
        }
    }

    /// Create a context with a specific working directory
    pub fn with_working_dir(mut self, dir: PathBuf) -> Self {
        self.working_dir = dir;
        self
    }

    /// Set the interpreter
    pub fn with_interpreter(mut self, interpreter: Vec<String>) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Set the grace period
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{}", message);
        }
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{}", message.green());
        }
    }

    /// Print warning message
    pub fn print_warn(&self, message: &str) {
        if self.verbosity >= Verbosity::Normal {
            eprintln!("{}", message.yellow());
        }
    }

    /// Print error message (shown even in quiet mode)
    pub fn print_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    /// Print debug message (only in verbose mode)
    pub fn print_debug(&self, message: &str) {
        if self.is_verbose() {
            eprintln!("{}", message.dimmed());
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
