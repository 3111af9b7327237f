//! Query result memoization for primdb.
//!
//! - **Query Cache**: maps a [`Fingerprint`] of a read query to the rows it
//!   produced the first time it ran
//! - **Statistics**: hit/miss counters for monitoring
//!
//! The fingerprint only sees the shape of the query and the coarse state of
//! the row collection (row count and highest identifier). Reads against
//! collections that differ only in their interior values share an entry.
//!
//! # Example
//!
//! ```rust
//! use primdb_cache::{Fingerprint, QueryCache};
//!
//! let mut cache: QueryCache<i64, Vec<i64>> = QueryCache::new();
//! let key = Fingerprint::all(3, 3);
//!
//! let first = cache.get_or_insert_with(key.clone(), || vec![1, 2, 3]);
//! let second = cache.get_or_insert_with(key, || unreachable!());
//! assert_eq!(first, second);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod query_cache;
pub mod stats;

pub use query_cache::{Fingerprint, QueryCache};
pub use stats::CacheStats;
