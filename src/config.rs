// Configuration file for the tasklist CLI

use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

const APP_DIR: &str = "tasklist";
const CONFIG_FILE: &str = "config.yaml";
const DB_FILE: &str = "tasks.db";

/// Settings read from `config.yaml`; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Database file (default: platform data dir)
    pub db_path: Option<PathBuf>,
    /// One of trace, debug, info, warn, error
    pub log_level: Option<String>,
    /// Start in the completed view instead of the pending one
    pub show_completed: bool,
}

impl Config {
    /// Load the config file
    ///
    /// An explicitly given path must exist. The default location is optional
    /// and falls back to built-in defaults when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        config.log_level()?;
        Ok(config)
    }

    /// Database path: flag, then config file, then platform default
    pub fn resolve_db_path(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.db_path.clone()).unwrap_or_else(default_db_path)
    }

    /// Log level from the config file, if set
    pub fn log_level(&self) -> Result<Option<Level>> {
        self.log_level
            .as_deref()
            .map(|s| s.parse::<Level>().map_err(|_| eyre!("Invalid log_level: {}", s)))
            .transpose()
    }
}

/// `<config dir>/tasklist/config.yaml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// `<data dir>/tasklist/tasks.db`, or `./.tasklist/tasks.db` without a data dir
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR)))
        .join(DB_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse("db_path: /tmp/t.db\nlog_level: debug\nshow_completed: true\n").unwrap();

        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(config.log_level().unwrap(), Some(Level::DEBUG));
        assert!(config.show_completed);
    }

    #[test]
    fn test_parse_empty_config() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
        assert_eq!(Config::parse("show_completed: false").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_rejects_bad_values() {
        assert!(Config::parse("log_level: loud").is_err());
        assert!(Config::parse("colour: red").is_err());
    }

    #[test]
    fn test_resolve_db_path_precedence() {
        let config = Config {
            db_path: Some(PathBuf::from("from-config.db")),
            ..Config::default()
        };

        assert_eq!(
            config.resolve_db_path(Some(PathBuf::from("from-flag.db"))),
            PathBuf::from("from-flag.db")
        );
        assert_eq!(config.resolve_db_path(None), PathBuf::from("from-config.db"));
        assert_eq!(Config::default().resolve_db_path(None), default_db_path());
    }

    #[test]
    fn test_default_db_path_file_name() {
        let path = default_db_path();
        assert!(path.ends_with("tasklist/tasks.db") || path.ends_with(".tasklist/tasks.db"));
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "show_completed: true\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(config.show_completed);

        let missing = temp.path().join("missing.yaml");
        assert!(Config::load(Some(&missing)).is_err());
    }
}
