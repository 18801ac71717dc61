//! Time sources for pacing.
//!
//! The queue never sleeps; it only compares deadlines against a clock. Hosts
//! pick the clock that matches how they wake the queue up:
//! - `SystemClock` for hosts polling on their own timers
//! - `TokioClock` for the tokio driver (honors paused test time)
//! - `ManualClock` for simulation and deterministic tests

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Source of the current instant.
pub trait Clock: Send {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Tokio's clock, which stands still under `tokio::time::pause`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give the
/// other to the queue.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    elapsed_ns: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            elapsed_ns: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Time since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_ns.load(Ordering::SeqCst))
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let by = nanos(by);
        // Saturates instead of wrapping; the closure always returns Some.
        let _ = self
            .elapsed_ns
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |ns| Some(ns.saturating_add(by)));
    }

    /// Move forward to `instant`; never moves backwards.
    pub fn advance_to(&self, instant: Instant) {
        let target = nanos(instant.saturating_duration_since(self.origin));
        self.elapsed_ns.fetch_max(target, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn test_manual_clock_advance() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let shared = clock.clone();
        clock.advance(Duration::from_secs(1));
        assert_eq!(shared.elapsed(), Duration::from_secs(1));
    }

    #[test]
    fn test_manual_clock_advance_to_never_rewinds() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(5));
        clock.advance_to(start + Duration::from_secs(2));
        assert_eq!(clock.elapsed(), Duration::from_secs(5));
        clock.advance_to(start + Duration::from_secs(7));
        assert_eq!(clock.elapsed(), Duration::from_secs(7));
    }

    #[test]
    fn test_manual_clock_advance_to_sub_millisecond_instant() {
        let clock = ManualClock::new();
        let deadline = clock.now() + Duration::from_micros(1500);
        clock.advance_to(deadline);
        assert_eq!(clock.now(), deadline);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
