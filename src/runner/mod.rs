//! Script execution engine
//!
//! This module handles choosing a script and running it as a child process,
//! including signal forwarding and terminal resolution.

pub mod context;
pub mod lifecycle;
pub mod process;
pub mod select;
pub mod signals;
pub mod slot;

// Re-export main types
pub use context::*;
pub use lifecycle::*;
pub use process::*;
pub use select::*;
pub use signals::*;
pub use slot::*;
