//! Cache statistics for monitoring and debugging.

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Total number of cache lookups.
    accesses: u64,
    /// Number of cache hits.
    hits: u64,
    /// Number of cache misses.
    misses: u64,
    /// Number of cache insertions.
    inserts: u64,
}

impl CacheStats {
    /// Creates new statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit.
    #[inline]
    pub fn record_hit(&mut self) {
        self.accesses += 1;
        self.hits += 1;
    }

    /// Records a cache miss.
    #[inline]
    pub fn record_miss(&mut self) {
        self.accesses += 1;
        self.misses += 1;
    }

    /// Records an insertion.
    #[inline]
    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Returns total lookups.
    pub fn accesses(&self) -> u64 {
        self.accesses
    }

    /// Returns cache hits.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns cache misses.
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Returns insertions.
    pub fn inserts(&self) -> u64 {
        self.inserts
    }

    /// Returns the hit ratio (0.0 to 1.0).
    pub fn hit_ratio(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    /// Resets all statistics.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CacheStats {{ accesses: {}, hits: {}, misses: {}, hit_ratio: {:.2}%, inserts: {} }}",
            self.accesses,
            self.hits,
            self.misses,
            self.hit_ratio() * 100.0,
            self.inserts
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_stats() {
        let mut stats = CacheStats::new();

        stats.record_hit();
        stats.record_miss();

        assert_eq!(stats.accesses(), 2);
        assert_eq!(stats.hits(), 1);
        assert_eq!(stats.misses(), 1);
        assert!((stats.hit_ratio() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_reset() {
        let mut stats = CacheStats::new();

        stats.record_hit();
        stats.record_insert();
        stats.reset();

        assert_eq!(stats.accesses(), 0);
        assert_eq!(stats.inserts(), 0);
    }

    #[test]
    fn test_display() {
        let mut stats = CacheStats::new();
        stats.record_miss();
        stats.record_insert();
        stats.record_hit();

        let text = stats.to_string();
        assert!(text.contains("hits: 1"));
        assert!(text.contains("hit_ratio: 50.00%"));
    }
}
