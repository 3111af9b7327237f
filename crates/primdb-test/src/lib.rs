//! # primdb-test
//!
//! End-to-end tests for primdb.
//!
//! This crate contains:
//! - A harness that opens file-backed databases in temporary directories
//! - End-to-end tests over the real schema and row files

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use primdb_common::config::DatabaseConfig;
use primdb_common::DbResult;
use primdb_engine::{Database, StatementResult};

/// A file-backed database in a temporary directory.
///
/// The directory is removed when the value is dropped.
pub struct TestDb {
    dir: TempDir,
    db: Database,
}

impl TestDb {
    /// Opens a database in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(Self::config_for(dir.path())).expect("Failed to open database");
        Self { dir, db }
    }

    fn config_for(path: &Path) -> DatabaseConfig {
        DatabaseConfig::with_data_dir(path)
    }

    /// Runs a line, answering every confirmation with `answer`.
    pub fn run_with(&mut self, line: &str, answer: bool) -> DbResult<StatementResult> {
        let mut confirm = answer;
        self.db.run(line, &mut confirm)
    }

    /// Runs a line, confirming destructive statements.
    pub fn run(&mut self, line: &str) -> DbResult<StatementResult> {
        self.run_with(line, true)
    }

    /// Runs a line that must succeed.
    pub fn ok(&mut self, line: &str) -> StatementResult {
        match self.run(line) {
            Ok(result) => result,
            Err(e) => panic!("{line:?} failed: {e}"),
        }
    }

    /// Runs a `select` and returns the rows as JSON objects.
    pub fn rows(&mut self, line: &str) -> Vec<serde_json::Value> {
        match self.ok(line) {
            StatementResult::Rows { rows, .. } => {
                serde_json::to_value(&*rows)
                    .ok()
                    .and_then(|v| v.as_array().cloned())
                    .unwrap_or_default()
            }
            other => panic!("{line:?} returned {other:?}"),
        }
    }

    /// Drops the current `Database` and opens a new one over the same files,
    /// starting with an empty query cache.
    pub fn reopen(&mut self) {
        self.db = Database::open(Self::config_for(self.dir.path())).expect("Failed to reopen database");
    }

    /// Opens a second, independent `Database` over the same files.
    pub fn open_another(&self) -> Database {
        Database::open(Self::config_for(self.dir.path())).expect("Failed to open database")
    }

    /// Returns the database.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Returns the data directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Returns the schema file path.
    pub fn meta_path(&self) -> PathBuf {
        Self::config_for(self.dir.path()).meta_path()
    }

    /// Returns the row file path for a table.
    pub fn table_path(&self, table: &str) -> PathBuf {
        Self::config_for(self.dir.path()).table_path(table)
    }

    /// Reads a file under the data directory, or `None` if it is absent.
    pub fn read(&self, path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}
