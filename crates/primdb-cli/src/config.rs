//! Configuration file support for the CLI.
//!
//! Loads and saves CLI configuration from TOML files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use primdb_common::config::DatabaseConfig;
use primdb_common::DEFAULT_DATA_DIR;

use crate::formatter::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Directory holding the schema file and row files.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format.
    #[serde(default = "default_format")]
    pub output_format: String,

    /// Enable timing by default.
    #[serde(default)]
    pub timing: bool,

    /// Answer yes to every confirmation prompt.
    #[serde(default)]
    pub assume_yes: bool,

    /// History file path.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Maximum history size.
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

fn default_format() -> String {
    "table".to_string()
}

fn default_history_size() -> usize {
    1000
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_format: default_format(),
            timing: false,
            assume_yes: false,
            history_file: None,
            history_size: default_history_size(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        Ok(config)
    }

    /// Saves configuration to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Loads the default configuration file.
    ///
    /// Looks in the following locations:
    /// 1. `<config dir>/primdb/config.toml`
    /// 2. `~/.primdb/config.toml`
    /// 3. Returns default if not found
    pub fn load_default() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let path = home.join(".primdb").join("config.toml");
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Returns the default configuration file path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("primdb").join("config.toml"))
    }

    /// Returns the configured output format.
    pub fn format(&self) -> Result<OutputFormat> {
        self.output_format.parse()
    }

    /// Returns the database file layout for the configured data directory.
    pub fn database_config(&self) -> DatabaseConfig {
        let data_dir = self
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        DatabaseConfig::with_data_dir(data_dir)
    }

    /// Returns the history file path, falling back to the local data dir.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("primdb").join("history")))
    }

    /// Returns a builder for configuration.
    pub fn builder() -> CliConfigBuilder {
        CliConfigBuilder::new()
    }
}

/// Builder for CLI configuration.
#[derive(Default)]
pub struct CliConfigBuilder {
    config: CliConfig,
}

impl CliConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = Some(dir.into());
        self
    }

    /// Sets the output format.
    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.config.output_format = format.into();
        self
    }

    /// Enables timing.
    pub fn timing(mut self, enabled: bool) -> Self {
        self.config.timing = enabled;
        self
    }

    /// Skips confirmation prompts.
    pub fn assume_yes(mut self, enabled: bool) -> Self {
        self.config.assume_yes = enabled;
        self
    }

    /// Sets the history file.
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.history_file = Some(path.into());
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> CliConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.output_format, "table");
        assert_eq!(config.history_size, 1000);
        assert!(!config.assume_yes);
        assert_eq!(config.database_config().meta_path(), PathBuf::from("./db_meta.json"));
    }

    #[test]
    fn test_builder() {
        let config = CliConfig::builder()
            .data_dir("/srv/primdb")
            .output_format("csv")
            .timing(true)
            .assume_yes(true)
            .build();

        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/primdb")));
        assert_eq!(config.format().unwrap(), OutputFormat::Csv);
        assert!(config.timing);
        assert!(config.assume_yes);
        assert_eq!(
            config.database_config().table_path("users"),
            PathBuf::from("/srv/primdb/data/users.json")
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = CliConfig::builder()
            .data_dir("/tmp/db")
            .output_format("json")
            .history_file("/tmp/history")
            .build();

        config.save(&path).unwrap();

        let loaded = CliConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.history_path(), Some(PathBuf::from("/tmp/history")));
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            data_dir = "/var/lib/primdb"
            output_format = "json"
            timing = true
            assume_yes = true
        "#;

        let config: CliConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/primdb")));
        assert_eq!(config.format().unwrap(), OutputFormat::Json);
        assert!(config.timing);
        assert!(config.assume_yes);
        assert_eq!(config.history_size, 1000);
    }

    #[test]
    fn test_bad_format_is_an_error() {
        let config = CliConfig::builder().output_format("xml").build();
        assert!(config.format().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = CliConfig::from_file(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
