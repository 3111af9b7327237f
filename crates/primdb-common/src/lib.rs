//! # primdb-common
//!
//! Common types, errors, and utilities for primdb.
//!
//! This crate provides the foundational pieces shared by the engine and the
//! command-line interface:
//!
//! - **Errors**: Unified error handling with `DbError` and stable `ErrorCode`s
//! - **Config**: Where the schema file and row files live
//! - **Constants**: Reserved names and file layout defaults
//! - **Instrumentation**: Wall-clock timing around operations
//!
//! ## Example
//!
//! ```rust
//! use primdb_common::error::{DbError, DbResult, ErrorKind};
//!
//! fn lookup(name: &str) -> DbResult<()> {
//!     Err(DbError::table_not_found(name))
//! }
//!
//! let err = lookup("users").unwrap_err();
//! assert_eq!(err.code().kind(), ErrorKind::NotFound);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod error;
pub mod instrument;

pub use config::DatabaseConfig;
pub use constants::*;
pub use error::{DbError, DbResult, ErrorCode, ErrorKind};
