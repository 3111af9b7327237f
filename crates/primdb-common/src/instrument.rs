//! Wall-clock instrumentation.
//!
//! Timing is observability only: wrapping an operation never changes its
//! result.

use std::time::{Duration, Instant};

use tracing::debug;

/// Runs `f`, logs how long it took under `operation`, and returns its result.
///
/// # Example
///
/// ```rust
/// use primdb_common::instrument::timed;
///
/// let sum = timed("sum", || 2 + 2);
/// assert_eq!(sum, 4);
/// ```
pub fn timed<T>(operation: &'static str, f: impl FnOnce() -> T) -> T {
    let (result, elapsed) = measure(f);
    debug!(
        operation,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "operation finished"
    );
    result
}

/// Runs `f` and returns its result together with the elapsed time.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_passes_result_through() {
        let value = timed("noop", || "done");
        assert_eq!(value, "done");
    }

    #[test]
    fn test_measure_reports_elapsed() {
        let (value, elapsed) = measure(|| {
            std::thread::sleep(Duration::from_millis(5));
            7
        });
        assert_eq!(value, 7);
        assert!(elapsed >= Duration::from_millis(5));
    }
}
