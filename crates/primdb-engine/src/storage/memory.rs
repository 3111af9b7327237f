//! In-memory persistence.

use std::collections::HashMap;

use primdb_common::DbResult;

use super::Persistence;
use crate::catalog::Catalog;
use crate::record::{Record, RowList};

/// Keeps state in memory for the life of the value. Used by tests and
/// throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    catalog: Catalog,
    rows: HashMap<String, RowList>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if rows are stored for `table`.
    pub fn has_rows(&self, table: &str) -> bool {
        self.rows.contains_key(table)
    }
}

impl Persistence for MemoryStore {
    fn load_catalog(&self) -> Catalog {
        self.catalog.clone()
    }

    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()> {
        self.catalog = catalog.clone();
        Ok(())
    }

    fn load_rows(&self, table: &str) -> RowList {
        self.rows.get(table).cloned().unwrap_or_default()
    }

    fn save_rows(&mut self, table: &str, rows: &[Record]) -> DbResult<()> {
        self.rows.insert(table.to_string(), rows.to_vec());
        Ok(())
    }

    fn remove_rows(&mut self, table: &str) -> DbResult<()> {
        self.rows.remove(table);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load_rows("users").is_empty());

        store.save_rows("users", &[Record::with_id(1)]).unwrap();
        assert!(store.has_rows("users"));
        assert_eq!(store.load_rows("users").len(), 1);

        store.remove_rows("users").unwrap();
        assert!(!store.has_rows("users"));
    }
}
