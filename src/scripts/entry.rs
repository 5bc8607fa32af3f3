//! Discovered script entries

use std::fmt;
use std::path::{Path, PathBuf};

/// A runnable script found during discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptEntry {
    name: String,
    path: PathBuf,
}

impl ScriptEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        ScriptEntry {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Name used to select the script
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File handed to the interpreter
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Display for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// Find a script by exact name. The first match wins.
pub fn find_script<'a>(registry: &'a [ScriptEntry], name: &str) -> Option<&'a ScriptEntry> {
    registry.iter().find(|s| s.name == name)
}
