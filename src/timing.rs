//! Pass instrumentation: pausable stopwatches and the per-pass report.

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// A stopwatch that accumulates time across resume/pause cycles.
///
/// A pass runs one for computation and one for store communication and
/// flips between them at every await point.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    running_since: Option<Instant>,
}

impl Stopwatch {
    /// Creates a paused stopwatch at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a running stopwatch at zero.
    pub fn started() -> Self {
        let mut watch = Self::new();
        watch.resume();
        watch
    }

    /// Starts accumulating. No effect if already running.
    pub fn resume(&mut self) {
        if self.running_since.is_none() {
            self.running_since = Some(Instant::now());
        }
    }

    /// Stops accumulating. No effect if already paused.
    pub fn pause(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += since.elapsed();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Total accumulated time, including the current run.
    pub fn elapsed(&self) -> Duration {
        self.accumulated + self.running_since.map_or(Duration::ZERO, |since| since.elapsed())
    }

    /// Pauses and returns the total.
    pub fn stop(&mut self) -> Duration {
        self.pause();
        self.accumulated
    }
}

/// Timings and cache statistics of one completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PerformanceReport {
    pub compute_time: Duration,
    pub communication_time: Duration,
    pub cache_hits: usize,
    pub cache_misses: usize,
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "compute_time: {} ms, communication_time: {} ms, cache_hits: {}, cache_misses: {}",
            self.compute_time.as_millis(),
            self.communication_time.as_millis(),
            self.cache_hits,
            self.cache_misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    #[test]
    fn test_paused_stopwatch_does_not_advance() {
        let mut watch = Stopwatch::new();
        sleep(Duration::from_millis(5));
        assert_eq!(watch.elapsed(), Duration::ZERO);
        assert_eq!(watch.stop(), Duration::ZERO);
    }

    #[test]
    fn test_accumulates_across_runs() {
        let mut watch = Stopwatch::started();
        sleep(Duration::from_millis(5));
        watch.pause();
        let first = watch.elapsed();
        assert!(first >= Duration::from_millis(5));

        sleep(Duration::from_millis(5));
        assert_eq!(watch.elapsed(), first);

        watch.resume();
        watch.resume();
        sleep(Duration::from_millis(5));
        let total = watch.stop();
        assert!(total >= first + Duration::from_millis(5));
        assert!(!watch.is_running());
    }

    #[test]
    fn test_report_display() {
        let report = PerformanceReport {
            compute_time: Duration::from_millis(12),
            communication_time: Duration::from_millis(3),
            cache_hits: 2,
            cache_misses: 1,
        };
        assert_eq!(
            report.to_string(),
            "compute_time: 12 ms, communication_time: 3 ms, cache_hits: 2, cache_misses: 1"
        );
    }
}
