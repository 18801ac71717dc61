//! Rule-driven placement policy.
//!
//! Suppression and requeue behavior declared in configuration instead of code:
//!
//! ```yaml
//! requeue:
//!   default-ms: 0        # null drops displaced notices
//!   kinds:
//!     promo: ~           # never retry a displaced promo
//!     money: 2000
//! children:
//!   goal-achieved: [goal-progress]
//! ```

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::PlacementPolicy;
use crate::notice::{Notice, NoticeKind};

/// Requeue settings for displaced notices.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RequeueConfig {
    /// Delay in milliseconds for kinds without an override (`null` = drop).
    #[serde(rename = "default-ms")]
    pub default_ms: Option<u64>,

    /// Per-kind overrides (`null` = drop).
    pub kinds: HashMap<String, Option<u64>>,
}

impl Default for RequeueConfig {
    fn default() -> Self {
        Self {
            default_ms: Some(0),
            kinds: HashMap::new(),
        }
    }
}

/// Declarative policy settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub requeue: RequeueConfig,

    /// Parent kind -> kinds it makes obsolete.
    pub children: HashMap<String, Vec<String>>,
}

/// Policy built from a `PolicyConfig`.
#[derive(Debug, Clone)]
pub struct RulesPolicy {
    default_delay: Option<Duration>,
    requeue: HashMap<NoticeKind, Option<Duration>>,
    children: HashMap<NoticeKind, HashSet<NoticeKind>>,
}

impl RulesPolicy {
    pub fn from_config(config: &PolicyConfig) -> Self {
        let requeue = config
            .requeue
            .kinds
            .iter()
            .map(|(kind, ms)| (NoticeKind::new(kind.as_str()), ms.map(Duration::from_millis)))
            .collect();

        let children = config
            .children
            .iter()
            .map(|(parent, kids)| {
                let kids = kids.iter().map(|k| NoticeKind::new(k.as_str())).collect();
                (NoticeKind::new(parent.as_str()), kids)
            })
            .collect();

        Self {
            default_delay: config.requeue.default_ms.map(Duration::from_millis),
            requeue,
            children,
        }
    }

    /// Number of parent kinds with child rules.
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }
}

impl PlacementPolicy for RulesPolicy {
    fn is_child(&self, parent: &Notice, child: &Notice) -> bool {
        self.children
            .get(parent.kind())
            .is_some_and(|kids| kids.contains(child.kind()))
    }

    fn requeue_delay(&self, displaced: &Notice) -> Option<Duration> {
        match self.requeue.get(displaced.kind()) {
            Some(delay) => *delay,
            None => self.default_delay,
        }
    }
}
