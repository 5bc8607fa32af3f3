//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary project with the given files (relative path, content).
/// Parent directories are created as needed.
pub fn create_project(files: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for (path, content) in files {
        write_file(temp_dir.path(), path, content);
    }
    temp_dir
}

/// Write a file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Config that runs `.sh` scripts with `sh`
pub const SH_CONFIG: &str = r#"
interpreter: [sh]
extensions: [sh]
entry_point: _main.sh
grace_period_ms: 20
"#;

/// Create a project whose scripts run under `sh`, with a config file
pub fn create_sh_project(scripts: &[(&str, &str)]) -> TempDir {
    let temp_dir = create_project(scripts);
    write_file(temp_dir.path(), "script-runner.yml", SH_CONFIG);
    temp_dir
}
