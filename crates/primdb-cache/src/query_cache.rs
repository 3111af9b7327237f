//! Query result cache for read commands.
//!
//! Results are keyed by a [`Fingerprint`] built from the query shape and two
//! observable properties of the row collection: how many rows it holds and
//! the highest identifier among them. Row contents are not hashed. An update
//! that rewrites a value without changing the row count or the highest
//! identifier therefore leaves earlier results in place, and later reads with
//! the same fingerprint return them unchanged.
//!
//! Entries live for the lifetime of the owning process. There is no eviction
//! and no invalidation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tracing::trace;

use crate::stats::CacheStats;

/// Cache key for a read query.
///
/// `V` is the typed value compared by a filtered read.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum Fingerprint<V> {
    /// Full-table read.
    All {
        /// Number of rows in the collection.
        row_count: usize,
        /// Highest identifier in the collection, 0 when empty.
        max_id: i64,
    },
    /// Read filtered by a single equality predicate.
    Where {
        /// Predicate column.
        column: String,
        /// Predicate value.
        value: V,
        /// Number of rows in the collection.
        row_count: usize,
        /// Highest identifier in the collection, 0 when empty.
        max_id: i64,
    },
}

impl<V> Fingerprint<V> {
    /// Creates the key of a full-table read.
    pub fn all(row_count: usize, max_id: i64) -> Self {
        Self::All { row_count, max_id }
    }

    /// Creates the key of a filtered read.
    pub fn filtered(column: impl Into<String>, value: V, row_count: usize, max_id: i64) -> Self {
        Self::Where {
            column: column.into(),
            value,
            row_count,
            max_id,
        }
    }

    /// Returns `"all"` or `"where"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::All { .. } => "all",
            Self::Where { .. } => "where",
        }
    }

    /// Returns the row count captured by this key.
    pub fn row_count(&self) -> usize {
        match self {
            Self::All { row_count, .. } | Self::Where { row_count, .. } => *row_count,
        }
    }

    /// Returns the highest identifier captured by this key.
    pub fn max_id(&self) -> i64 {
        match self {
            Self::All { max_id, .. } | Self::Where { max_id, .. } => *max_id,
        }
    }
}

/// A memoizing cache for read query results.
///
/// One instance is created per process by whoever issues read queries and
/// dropped at exit. It is never persisted.
///
/// # Example
///
/// ```rust
/// use primdb_cache::{Fingerprint, QueryCache};
///
/// let mut cache: QueryCache<String, Vec<&str>> = QueryCache::new();
///
/// let key = Fingerprint::filtered("name", "Alice".to_string(), 2, 2);
/// cache.insert(key.clone(), vec!["Alice"]);
///
/// assert_eq!(cache.get(&key).as_deref(), Some(&vec!["Alice"]));
/// assert_eq!(cache.stats().hits(), 1);
/// ```
#[derive(Debug)]
pub struct QueryCache<V, R> {
    entries: HashMap<Fingerprint<V>, Arc<R>>,
    stats: CacheStats,
}

impl<V, R> Default for QueryCache<V, R>
where
    V: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, R> QueryCache<V, R>
where
    V: Hash + Eq,
{
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    /// Gets a cached result.
    pub fn get(&mut self, key: &Fingerprint<V>) -> Option<Arc<R>> {
        match self.entries.get(key) {
            Some(result) => {
                self.stats.record_hit();
                Some(Arc::clone(result))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Inserts a result into the cache and returns a handle to it.
    ///
    /// An existing entry for the same key is replaced.
    pub fn insert(&mut self, key: Fingerprint<V>, result: R) -> Arc<R> {
        let handle = Arc::new(result);
        self.entries.insert(key, Arc::clone(&handle));
        self.stats.record_insert();
        handle
    }

    /// Returns the cached result for `key`, computing and storing it with
    /// `compute` on a miss.
    pub fn get_or_insert_with(
        &mut self,
        key: Fingerprint<V>,
        compute: impl FnOnce() -> R,
    ) -> Arc<R> {
        if let Some(hit) = self.get(&key) {
            trace!(kind = key.kind(), "query cache hit");
            return hit;
        }
        trace!(kind = key.kind(), "query cache miss");
        self.insert(key, compute())
    }

    /// Returns true if a result is cached for `key`. Does not count as a use.
    pub fn contains(&self, key: &Fingerprint<V>) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut cache: QueryCache<i64, Vec<i32>> = QueryCache::new();

        let key = Fingerprint::all(3, 3);
        cache.insert(key.clone(), vec![1, 2, 3]);

        let result = cache.get(&key);
        assert!(result.is_some());
        assert_eq!(*result.unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_hits_share_the_stored_result() {
        let mut cache: QueryCache<i64, Vec<i32>> = QueryCache::new();
        let key = Fingerprint::all(2, 2);

        let stored = cache.insert(key.clone(), vec![1, 2]);
        let hit = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));

        let replaced = cache.insert(key.clone(), vec![3]);
        assert!(Arc::ptr_eq(&replaced, &cache.get(&key).unwrap()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().inserts(), 2);
    }

    #[test]
    fn test_get_or_insert_with_computes_once() {
        let mut cache: QueryCache<i64, Vec<i32>> = QueryCache::new();
        let mut calls = 0;

        for _ in 0..3 {
            cache.get_or_insert_with(Fingerprint::all(1, 1), || {
                calls += 1;
                vec![1]
            });
        }

        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().misses(), 1);
        assert_eq!(cache.stats().hits(), 2);
    }

    #[test]
    fn test_key_ignores_contents() {
        let mut cache: QueryCache<i64, &str> = QueryCache::new();

        cache.get_or_insert_with(Fingerprint::all(2, 5), || "before update");
        let second = cache.get_or_insert_with(Fingerprint::all(2, 5), || "after update");

        assert_eq!(*second, "before update");
    }

    #[test]
    fn test_key_tracks_count_and_max_id() {
        let mut cache: QueryCache<i64, &str> = QueryCache::new();

        cache.get_or_insert_with(Fingerprint::all(2, 5), || "two rows");
        let grown = cache.get_or_insert_with(Fingerprint::all(3, 6), || "three rows");
        let shrunk = cache.get_or_insert_with(Fingerprint::all(2, 6), || "two rows again");

        assert_eq!(*grown, "three rows");
        assert_eq!(*shrunk, "two rows again");
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_key_with_predicate() {
        let key1 = Fingerprint::filtered("age", 30i64, 4, 4);
        let key2 = Fingerprint::filtered("age", 31i64, 4, 4);
        let key3 = Fingerprint::filtered("age", 30i64, 4, 4);

        assert_ne!(key1, key2);
        assert_eq!(key1, key3);
        assert_ne!(key1, Fingerprint::all(4, 4));
        assert_eq!(key1.kind(), "where");
        assert_eq!(key1.row_count(), 4);
        assert_eq!(key1.max_id(), 4);
    }

    #[test]
    fn test_contains_is_not_a_use() {
        let mut cache: QueryCache<i64, u8> = QueryCache::new();
        let key = Fingerprint::all(0, 0);

        assert!(!cache.contains(&key));
        cache.insert(key.clone(), 0);
        assert!(cache.contains(&key));
        assert_eq!(cache.stats().accesses(), 0);
    }
}
