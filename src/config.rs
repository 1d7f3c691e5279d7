// Application configuration loaded from YAML

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_DIR: &str = "maeltodo";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite database file
    pub database: PathBuf,
    /// Default tracing filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database_path(),
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read if present, otherwise defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(eyre!("Config file not found: {}", path.display()));
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config =
            serde_yaml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))?;

        debug!(path = ?path, "Loaded config");
        Ok(config)
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("maeltodo.yml"))
}

pub fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("maeltodo.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.database.ends_with("maeltodo/maeltodo.db"));
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maeltodo.yml");
        fs::write(&path, "database: /tmp/todo.db\nlog_level: debug\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.database, PathBuf::from("/tmp/todo.db"));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maeltodo.yml");
        fs::write(&path, "log_level: info\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.database, default_database_path());
    }

    #[test]
    fn test_missing_explicit_file() {
        let temp = TempDir::new().unwrap();
        assert!(Config::load(Some(temp.path().join("nope.yml").as_path())).is_err());
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maeltodo.yml");
        fs::write(&path, "database: [unclosed\n").unwrap();

        assert!(Config::from_file(&path).is_err());
    }
}
