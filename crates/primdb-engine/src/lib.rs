//! # primdb-engine
//!
//! The schema and row engine behind primdb.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Database                             │
//! │  (parses a line, loads state, dispatches, persists)          │
//! └─────────────────────────────────────────────────────────────┘
//!            │                                  │
//!            ▼                                  ▼
//! ┌──────────────────────┐          ┌──────────────────────────┐
//! │       Catalog        │          │        Row engine         │
//! │ create / drop / list │          │ insert / select / update  │
//! │                      │          │ / delete, query cache     │
//! └──────────────────────┘          └──────────────────────────┘
//!            │                                  │
//!            └────────────────┬─────────────────┘
//!                             ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Persistence                           │
//! │  (schema file + one JSON row file per table)                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use primdb_engine::{Database, MemoryStore, StatementResult};
//!
//! let mut db = Database::with_store(MemoryStore::new());
//! let mut confirm = true;
//!
//! db.run("create_table users name:str age:int", &mut confirm).unwrap();
//! let inserted = db
//!     .run(r#"insert into users values ("Alice", 30)"#, &mut confirm)
//!     .unwrap();
//! assert!(matches!(inserted, StatementResult::Inserted { id: 1, .. }));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod confirm;
pub mod engine;
pub mod parser;
pub mod record;
pub mod result;
pub mod schema;
pub mod storage;
pub mod table;
pub mod value;

pub use catalog::Catalog;
pub use confirm::{Confirm, Outcome};
pub use engine::{Database, DatabaseStats};
pub use parser::{Clause, Statement, COMMANDS};
pub use record::{Record, RowList};
pub use result::{row_count_line, StatementResult};
pub use schema::{ColumnSpec, ColumnType, TableSchema};
pub use storage::{JsonStore, MemoryStore, Persistence};
pub use table::{Assignment, Predicate, RowCache};
pub use value::Value;
