//! Script registry
//!
//! This module finds runnable scripts on disk and turns them into
//! `ScriptEntry` listings.

pub mod discover;
pub mod entry;

// Re-export main types
pub use discover::*;
pub use entry::*;
