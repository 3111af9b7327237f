//! Persistence for the catalog and table rows.
//!
//! The engine reads state at the start of every command and writes it back
//! whole after a change. Reads never fail: a missing or unreadable file is an
//! empty catalog or an empty table. Writes report errors.

mod json;
mod memory;

pub use json::JsonStore;
pub use memory::MemoryStore;

use primdb_common::DbResult;

use crate::catalog::Catalog;
use crate::record::{Record, RowList};

/// Where schemas and rows live between commands.
pub trait Persistence {
    /// Loads the catalog, or an empty one if none is stored.
    fn load_catalog(&self) -> Catalog;

    /// Replaces the stored catalog.
    fn save_catalog(&mut self, catalog: &Catalog) -> DbResult<()>;

    /// Loads the rows of `table`, or none if nothing is stored.
    fn load_rows(&self, table: &str) -> RowList;

    /// Replaces the stored rows of `table`.
    fn save_rows(&mut self, table: &str, rows: &[Record]) -> DbResult<()>;

    /// Removes the stored rows of `table`. Removing nothing is not an error.
    fn remove_rows(&mut self, table: &str) -> DbResult<()>;
}
