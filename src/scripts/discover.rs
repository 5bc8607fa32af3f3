//! Script discovery
//!
//! Scans candidate directories for scripts. A script is either a file with a
//! recognised extension, or a sub-directory holding an entry-point file.

use crate::config::Config;
use crate::error::{DiscoveryError, DiscoveryResult};
use crate::scripts::ScriptEntry;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Kind of a directory entry as reported by a `DirectoryProvider`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
}

/// A single directory listing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub kind: EntryKind,
}

impl DirEntryInfo {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        DirEntryInfo {
            name: name.into(),
            kind,
        }
    }
}

/// Read-only view of a file system
pub trait DirectoryProvider {
    /// Whether `path` exists
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing regular file
    fn is_file(&self, path: &Path) -> bool;

    /// Entries of the directory at `path`, in listing order
    fn entries(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>>;
}

/// `DirectoryProvider` backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectoryProvider;

impl DirectoryProvider for FsDirectoryProvider {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn entries(&self, path: &Path) -> io::Result<Vec<DirEntryInfo>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                EntryKind::Other
            };
            // A script name must round-trip to its path
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::debug!(name = ?raw, dir = %path.display(), "skipping entry with non UTF-8 name");
                    continue;
                }
            };
            entries.push(DirEntryInfo::new(name, kind));
        }
        Ok(entries)
    }
}

/// Rules deciding which directory entries are scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRules {
    pub extensions: Vec<String>,
    pub entry_point: String,
    pub reserved_dir: String,
    pub private_prefix: char,
}

impl Default for DiscoveryRules {
    fn default() -> Self {
        DiscoveryRules::from_config(&Config::default())
    }
}

impl DiscoveryRules {
    pub fn from_config(config: &Config) -> Self {
        DiscoveryRules {
            extensions: config.extensions.clone(),
            entry_point: config.entry_point.clone(),
            reserved_dir: config.reserved_dir.clone(),
            private_prefix: config.private_prefix_char().unwrap_or('_'),
        }
    }

    /// Script name for a file entry, or `None` when the file is not a script
    fn script_name_for_file<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        if file_name.starts_with(self.private_prefix) {
            return None;
        }
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || !self.extensions.iter().any(|e| e == ext) {
            return None;
        }
        Some(stem)
    }
}

/// Result of a discovery pass over several candidate directories
#[derive(Debug, Default)]
pub struct Discovery {
    /// Scripts from the winning directory
    pub entries: Vec<ScriptEntry>,

    /// Directory the entries came from, if any
    pub directory: Option<PathBuf>,

    /// Directories scanned, in order
    pub searched: Vec<PathBuf>,

    /// Recoverable problems met along the way
    pub problems: Vec<DiscoveryError>,
}

/// Script registry over a directory provider
pub struct Registry<P = FsDirectoryProvider> {
    provider: P,
    rules: DiscoveryRules,
}

impl Registry<FsDirectoryProvider> {
    /// Registry over the real file system
    pub fn new(rules: DiscoveryRules) -> Self {
        Registry::with_provider(FsDirectoryProvider, rules)
    }
}

impl<P: DirectoryProvider> Registry<P> {
    pub fn with_provider(provider: P, rules: DiscoveryRules) -> Self {
        Registry { provider, rules }
    }

    /// Scan a single directory
    pub fn scan(&self, dir: &Path) -> DiscoveryResult<Vec<ScriptEntry>> {
        if !self.provider.exists(dir) {
            return Err(DiscoveryError::DirectoryNotFound(dir.to_path_buf()));
        }

        let listing = self.provider.entries(dir).map_err(|source| DiscoveryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut scripts = Vec::new();
        for entry in listing {
            match entry.kind {
                EntryKind::Directory if entry.name != self.rules.reserved_dir => {
                    let main_file = dir.join(&entry.name).join(&self.rules.entry_point);
                    if self.provider.is_file(&main_file) {
                        scripts.push(ScriptEntry::new(entry.name, main_file));
                    }
                }
                EntryKind::File => {
                    if let Some(name) = self.rules.script_name_for_file(&entry.name) {
                        scripts.push(ScriptEntry::new(name, dir.join(&entry.name)));
                    }
                }
                _ => {}
            }
        }

        tracing::debug!(dir = %dir.display(), count = scripts.len(), "scanned scripts directory");
        Ok(scripts)
    }

    /// Try each candidate in order; the first directory yielding at least
    /// one script wins and later candidates are not scanned.
    pub fn discover(&self, candidates: &[PathBuf]) -> Discovery {
        let mut discovery = Discovery::default();

        for dir in candidates {
            discovery.searched.push(dir.clone());
            match self.scan(dir) {
                Ok(entries) if !entries.is_empty() => {
                    discovery.entries = entries;
                    discovery.directory = Some(dir.clone());
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(error = %e, "skipping scripts directory");
                    discovery.problems.push(e);
                }
            }
        }

        discovery
    }
}

/// Resolve candidate directories against `base`.
///
/// A custom directory, when given, is tried before the configured ones.
pub fn candidate_directories(base: &Path, custom: Option<&Path>, configured: &[String]) -> Vec<PathBuf> {
    custom
        .into_iter()
        .chain(configured.iter().map(Path::new))
        .map(|p| resolve_path(base, p))
        .collect()
}

/// Join a relative path onto `base`, dropping `.` components
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let relative: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    base.join(relative)
}
