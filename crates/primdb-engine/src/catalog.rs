//! Table catalog.
//!
//! The catalog maps table names to schemas. It is loaded from the schema file
//! at the start of every command and written back whole after every change.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use primdb_common::{DbError, DbResult};

use crate::confirm::{Confirm, Outcome};
use crate::schema::TableSchema;

/// Table catalog, persisted as a JSON object of `name -> ["ID:int", ...]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: BTreeMap<String, TableSchema>,
}

impl Catalog {
    /// Creates a new empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from caller-supplied column specs.
    ///
    /// The stored schema is `ID:int` followed by the validated columns.
    /// Fails with `AlreadyExists` if the name is taken and with
    /// `InvalidValue` if the column list is empty or any spec is invalid.
    pub fn create_table<S: AsRef<str>>(
        &mut self,
        name: &str,
        specs: &[S],
    ) -> DbResult<&TableSchema> {
        validate_table_name(name)?;

        if self.tables.contains_key(name) {
            return Err(DbError::already_exists(name));
        }

        let schema = TableSchema::from_specs(specs)?;
        debug!(table = name, columns = %schema.format_columns(), "table created");

        Ok(&*self.tables.entry(name.to_string()).or_insert(schema))
    }

    /// Drops a table once `confirm` agrees.
    ///
    /// A missing table fails with `NotFound` before the gate is consulted.
    /// A declined gate leaves the catalog unchanged.
    pub fn drop_table(
        &mut self,
        name: &str,
        confirm: &mut dyn Confirm,
    ) -> DbResult<Outcome<TableSchema>> {
        let Entry::Occupied(entry) = self.tables.entry(name.to_string()) else {
            return Err(DbError::table_not_found(name));
        };

        if !confirm.confirm(&format!("drop table {name}")) {
            debug!(table = name, "drop table cancelled");
            return Ok(Outcome::Cancelled);
        }

        let schema = entry.remove();
        debug!(table = name, "table dropped");
        Ok(Outcome::Done(schema))
    }

    /// Gets a table schema.
    pub fn get_table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Gets a table schema or fails with `NotFound`.
    pub fn require_table(&self, name: &str) -> DbResult<&TableSchema> {
        self.get_table(name)
            .ok_or_else(|| DbError::table_not_found(name))
    }

    /// Checks if a table exists.
    pub fn table_exists(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Lists table names in ascending order.
    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// Returns the number of tables.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

/// Table names become file names, so they must be a single path component.
fn validate_table_name(name: &str) -> DbResult<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_whitespace);

    if invalid {
        return Err(DbError::invalid_value(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use primdb_common::ErrorKind;

    #[test]
    fn test_catalog_create_table() {
        let mut catalog = Catalog::new();

        let schema = catalog.create_table("users", &["name:str", "age:int"]).unwrap();
        assert_eq!(schema.format_columns(), "ID:int, name:str, age:int");

        assert!(catalog.table_exists("users"));
        assert_eq!(catalog.table_count(), 1);
    }

    #[test]
    fn test_catalog_duplicate_table() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str"]).unwrap();

        let err = catalog.create_table("users", &["other:int"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);

        // Existence wins over a malformed column list.
        let err = catalog.create_table("users", &["bad"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
    }

    #[test]
    fn test_catalog_invalid_columns_leave_no_table() {
        let mut catalog = Catalog::new();

        let err = catalog.create_table("users", &["name:str", "NAME:int"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
        assert!(!catalog.table_exists("users"));

        let empty: [&str; 0] = [];
        assert!(catalog.create_table("users", &empty).is_err());
    }

    #[test]
    fn test_catalog_rejects_path_like_names() {
        let mut catalog = Catalog::new();
        for name in ["", "..", "a/b", "a\\b", "two words"] {
            let err = catalog.create_table(name, &["x:int"]).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidValue, "{name:?}");
        }
    }

    #[test]
    fn test_catalog_drop_table() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str"]).unwrap();

        catalog.create_table("orders", &["total:int"]).unwrap();

        let outcome = catalog.drop_table("users", &mut true).unwrap();
        assert_eq!(
            outcome.map(|schema| schema.format_columns()),
            Outcome::Done("ID:int, name:str".to_string())
        );
        assert!(!catalog.table_exists("users"));
        assert_eq!(catalog.list_tables(), vec!["orders"]);
    }

    #[test]
    fn test_catalog_drop_cancelled() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str"]).unwrap();
        let before = catalog.clone();

        let outcome = catalog.drop_table("users", &mut false).unwrap();
        assert!(outcome.is_cancelled());
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_catalog_drop_missing() {
        struct Asked(usize);

        impl Confirm for Asked {
            fn confirm(&mut self, _action: &str) -> bool {
                self.0 += 1;
                true
            }
        }

        let mut catalog = Catalog::new();
        let mut asked = Asked(0);

        let err = catalog.drop_table("ghost", &mut asked).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(asked.0, 0);
        assert_eq!(catalog, Catalog::new());
    }

    #[test]
    fn test_catalog_list_tables_sorted() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str"]).unwrap();
        catalog.create_table("orders", &["total:int"]).unwrap();
        catalog.create_table("Zeta", &["flag:bool"]).unwrap();

        assert_eq!(catalog.list_tables(), vec!["Zeta", "orders", "users"]);
    }

    #[test]
    fn test_catalog_json_shape() {
        let mut catalog = Catalog::new();
        catalog.create_table("users", &["name:str", "age:int"]).unwrap();

        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"users":["ID:int","name:str","age:int"]}"#);

        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
