//! Database configuration structures.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_META_FILE, DEFAULT_ROWS_DIR, ROWS_FILE_EXTENSION};
use crate::error::{DbError, DbResult};

/// Where a primdb database keeps its files.
///
/// The schema file lives at `data_dir/meta_file`; each table's rows live at
/// `data_dir/rows_dir/<table>.json`.
///
/// # Example
///
/// ```rust
/// use primdb_common::config::DatabaseConfig;
///
/// let config = DatabaseConfig::with_data_dir("/tmp/db");
/// assert!(config.meta_path().ends_with("db_meta.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Root directory for persisted state.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Schema file name, relative to `data_dir`.
    #[serde(default = "default_meta_file")]
    pub meta_file: String,

    /// Row file directory, relative to `data_dir`.
    #[serde(default = "default_rows_dir")]
    pub rows_dir: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_meta_file() -> String {
    DEFAULT_META_FILE.to_string()
}

fn default_rows_dir() -> String {
    DEFAULT_ROWS_DIR.to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            meta_file: default_meta_file(),
            rows_dir: default_rows_dir(),
        }
    }
}

impl DatabaseConfig {
    /// Creates a new configuration with the specified data directory.
    #[must_use]
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Returns the full path of the schema file.
    #[must_use]
    pub fn meta_path(&self) -> PathBuf {
        self.data_dir.join(&self.meta_file)
    }

    /// Returns the directory holding row files.
    #[must_use]
    pub fn rows_path(&self) -> PathBuf {
        self.data_dir.join(&self.rows_dir)
    }

    /// Returns the row file path for a table.
    #[must_use]
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.rows_path()
            .join(format!("{table}.{ROWS_FILE_EXTENSION}"))
    }

    /// Returns the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Validates the configuration and returns an error if invalid.
    pub fn validate(&self) -> DbResult<()> {
        if self.meta_file.trim().is_empty() {
            return Err(DbError::InvalidConfig {
                message: "meta_file must not be empty".to_string(),
            });
        }

        if self.rows_dir.trim().is_empty() {
            return Err(DbError::InvalidConfig {
                message: "rows_dir must not be empty".to_string(),
            });
        }

        if Path::new(&self.meta_file).components().count() != 1 {
            return Err(DbError::InvalidConfig {
                message: format!("meta_file must be a plain file name, got {}", self.meta_file),
            });
        }

        Ok(())
    }
}
