//! Configuration for primdb.

mod database;

pub use database::DatabaseConfig;
