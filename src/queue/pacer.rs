//! Single-shot pacing timer.
//!
//! At most one deadline exists; arming replaces whatever was pending, so a
//! deadline fires at most once per arm.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub struct Pacer {
    deadline: Option<Instant>,
}

impl Pacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire `delay` after `now`, replacing any pending deadline.
    ///
    /// A delay too large to represent leaves the pacer disarmed, so the head
    /// waits until something else re-arms it.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = now.checked_add(delay);
        if self.deadline.is_none() {
            tracing::debug!(delay_secs = delay.as_secs(), "Pacing delay out of range, not arming");
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Disarm and return true if the deadline has been reached.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unarmed_is_never_due() {
        let mut pacer = Pacer::new();
        assert!(pacer.deadline().is_none());
        assert!(!pacer.take_due(Instant::now()));
    }

    #[test]
    fn test_fires_at_deadline_once() {
        let mut pacer = Pacer::new();
        let now = Instant::now();
        pacer.arm(now, Duration::from_millis(1000));

        assert!(!pacer.take_due(now + Duration::from_millis(999)));
        assert!(pacer.take_due(now + Duration::from_millis(1000)));
        assert!(!pacer.take_due(now + Duration::from_millis(2000)));
    }

    #[test]
    fn test_zero_delay_is_due_immediately() {
        let mut pacer = Pacer::new();
        let now = Instant::now();
        pacer.arm(now, Duration::ZERO);
        assert!(pacer.take_due(now));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut pacer = Pacer::new();
        let now = Instant::now();
        pacer.arm(now, Duration::from_millis(10));
        pacer.arm(now, Duration::from_millis(500));

        assert_eq!(pacer.deadline(), Some(now + Duration::from_millis(500)));
        assert!(!pacer.take_due(now + Duration::from_millis(10)));
    }

    #[test]
    fn test_unrepresentable_delay_leaves_disarmed() {
        let mut pacer = Pacer::new();
        let now = Instant::now();
        pacer.arm(now, Duration::from_millis(10));
        pacer.arm(now, Duration::MAX);

        assert!(pacer.deadline().is_none());
        assert!(!pacer.take_due(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_cancel() {
        let mut pacer = Pacer::new();
        let now = Instant::now();
        pacer.arm(now, Duration::ZERO);
        pacer.cancel();
        assert!(!pacer.take_due(now));
    }
}
