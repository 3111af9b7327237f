//! JSON files on the local filesystem.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use primdb_common::config::DatabaseConfig;
use primdb_common::{DbError, DbResult};

use super::Persistence;
use crate::catalog::Catalog;
use crate::record::{Record, RowList};

/// Stores the catalog and each table's rows as pretty-printed JSON.
///
/// # Directory Structure
///
/// ```text
/// <data_dir>/
/// ├── db_meta.json        # table name -> ["ID:int", ...]
/// └── data/
///     └── <table>.json    # [{"ID": 1, ...}, ...]
/// ```
#[derive(Debug, Clone)]
pub struct JsonStore {
    config: DatabaseConfig,
}

impl JsonStore {
    /// Creates a store over the paths in `config`. Nothing is touched on disk
    /// until the first write.
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }
}

impl Persistence for JsonStore {
    fn load_catalog(&self) -> Catalog {
        read_json(&self.config.meta_path())
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()> {
        write_json(&self.config.meta_path(), catalog)
    }

    fn load_rows(&self, table: &str) -> RowList {
        read_json(&self.config.table_path(table))
    }

    fn save_rows(&mut self, table: &str, rows: &[Record]) -> DbResult<()> {
        write_json(&self.config.table_path(table), &rows)
    }

    fn remove_rows(&mut self, table: &str) -> DbResult<()> {
        let path = self.config.table_path(table);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "row file removed");
                Ok(())
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reads a JSON file, falling back to the default value when the file is
/// missing or cannot be decoded.
fn read_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == IoErrorKind::NotFound => return T::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read file, using empty state");
            return T::default();
        }
    };

    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed JSON, using empty state");
            T::default()
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> DbResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let text = serde_json::to_string_pretty(value)
        .map_err(|e| DbError::serialization(e.to_string()))?;
    fs::write(path, text)?;

    debug!(path = %path.display(), "file written");
    Ok(())
}
