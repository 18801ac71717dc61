//! Placement policies consulted by the queue.
//!
//! A policy answers two questions and keeps no state of its own:
//! - **Children**: which pending notices become obsolete when another one arrives
//!   or becomes visible.
//! - **Requeue**: whether a visible notice displaced by a higher priority arrival
//!   gets another chance later, and after how long.

mod rules;

use std::time::Duration;

use crate::notice::Notice;

pub use rules::{PolicyConfig, RequeueConfig, RulesPolicy};

/// Decision functions the queue delegates to.
pub trait PlacementPolicy: Send {
    /// True if `child` should be discarded from the pending queue when `parent`
    /// is added or becomes visible.
    fn is_child(&self, parent: &Notice, child: &Notice) -> bool;

    /// Delay before a displaced notice is retried, or `None` to drop it.
    fn requeue_delay(&self, displaced: &Notice) -> Option<Duration>;
}

/// Never prunes, always requeues immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl PlacementPolicy for DefaultPolicy {
    fn is_child(&self, _parent: &Notice, _child: &Notice) -> bool {
        false
    }

    fn requeue_delay(&self, _displaced: &Notice) -> Option<Duration> {
        Some(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_never_prunes() {
        let policy = DefaultPolicy;
        assert!(!policy.is_child(&Notice::new("high", 2), &Notice::new("low", 0)));
    }

    #[test]
    fn test_default_policy_requeues_immediately() {
        let policy = DefaultPolicy;
        assert_eq!(policy.requeue_delay(&Notice::new("low", 0)), Some(Duration::ZERO));
    }
}
