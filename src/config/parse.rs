//! Configuration file parsing and discovery

use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["script-runner.yml", "script-runner.yaml"];

/// Find the configuration file starting from a specific directory and
/// walking up through its parents
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = Some(start_dir);

    while let Some(dir) = current_dir {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = dir.join(file_name);
            if config_path.is_file() {
                return Some(config_path);
            }
        }
        current_dir = dir.parent();
    }

    None
}

/// Per-user configuration file (e.g. ~/.config/script-runner/config.yml)
pub fn user_config_file() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", "script-runner")?;
    let path = dirs.config_dir().join("config.yml");
    path.is_file().then_some(path)
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config> {
    // serde_yaml rejects an empty document; treat it as "all defaults"
    if yaml.trim().is_empty() {
        return Ok(Config::default());
    }
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// Locate the configuration to use.
///
/// An explicit path must exist. Otherwise the working directory and its
/// parents are searched, then the user config directory.
pub fn locate_config(explicit: Option<&Path>, start_dir: &Path) -> ConfigResult<Option<PathBuf>> {
    if let Some(path) = explicit {
        let path = start_dir.join(path);
        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    Ok(find_config_file_from(start_dir).or_else(user_config_file))
}

/// Load configuration with automatic file discovery, falling back to defaults
pub fn load_config(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<(Config, Option<PathBuf>)> {
    match locate_config(explicit, start_dir)? {
        Some(path) => {
            let config = parse_config_file(&path)?;
            tracing::debug!(path = %path.display(), "loaded configuration");
            Ok((config, Some(path)))
        }
        None => Ok((Config::default(), None)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_simple_config() {
        let yaml = r#"
interpreter:
  - node
extensions: [js, mjs]
"#;
        let config = parse_config(yaml).unwrap();
        assert_eq!(config.interpreter, vec!["node"]);
        assert_eq!(config.extensions, vec!["js", "mjs"]);
        assert_eq!(config.entry_point, "_main.ts");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("  \n").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let result = parse_config("interpreter: {");
        assert!(matches!(result, Err(crate::RunnerError::Yaml(_))));
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("script-runner.yml");
        fs::write(&config_path, "page_size: 5\n").unwrap();

        let found = find_config_file_from(temp_dir.path()).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("script-runner.yaml");
        let sub_dir = temp_dir.path().join("subdir");

        fs::create_dir(&sub_dir).unwrap();
        fs::write(&config_path, "page_size: 5\n").unwrap();

        let found = find_config_file_from(&sub_dir).unwrap();
        assert_eq!(found, config_path);
    }

    #[test]
    fn test_explicit_config_missing() {
        let temp_dir = TempDir::new().unwrap();
        let result = locate_config(Some(Path::new("nope.yml")), temp_dir.path());
        assert!(matches!(result, Err(ConfigError::NotFound(_))));

        let result = load_config(Some(Path::new("nope.yml")), temp_dir.path());
        assert!(matches!(
            result,
            Err(crate::RunnerError::Config(ConfigError::NotFound(_)))
        ));
    }

    #[test]
    fn test_load_explicit_config() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("custom.yml"), "grace_period_ms: 250\n").unwrap();

        let (config, path) = load_config(Some(Path::new("custom.yml")), temp_dir.path()).unwrap();
        assert_eq!(config.grace_period_ms, 250);
        assert_eq!(path, Some(temp_dir.path().join("custom.yml")));
    }
}
