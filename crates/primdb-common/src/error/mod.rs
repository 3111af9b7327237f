//! Error handling for primdb.
//!
//! This module provides a unified error type and result alias used
//! across all primdb components.

mod database;

pub use database::{DbError, ErrorCode, ErrorKind};

/// Result type alias for primdb operations.
pub type DbResult<T> = std::result::Result<T, DbError>;
