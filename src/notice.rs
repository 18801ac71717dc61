//! Notice types
//!
//! A notice is an immutable display item competing for the single display slot.
//! `Visible` is what the slot currently holds: a notice, or nothing.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type identity of a notice.
///
/// Two notices with the same kind are interchangeable for deduplication and
/// removal, whatever their priority or payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoticeKind(Cow<'static, str>);

const EMPTY_KIND: &str = "<empty>";
static EMPTY: NoticeKind = NoticeKind::empty();

impl NoticeKind {
    /// Create a kind from any string-like name
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// Create a kind from a static name without allocating
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The reserved kind reported by `Visible::Empty`
    pub const fn empty() -> Self {
        Self::from_static(EMPTY_KIND)
    }

    /// Whether this is the reserved empty kind
    pub fn is_reserved_empty(&self) -> bool {
        self.0 == EMPTY_KIND
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for NoticeKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for NoticeKind {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A schedulable display item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    kind: NoticeKind,
    priority: i32,
    #[serde(default)]
    delay_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl Notice {
    /// Create a notice with no pacing delay
    pub fn new(kind: impl Into<NoticeKind>, priority: i32) -> Self {
        Self {
            kind: kind.into(),
            priority,
            delay_ms: 0,
            payload: None,
        }
    }

    /// Set the pacing delay applied once this notice reaches the head of the queue.
    ///
    /// Delays are kept in whole milliseconds; any sub-millisecond part is truncated.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Attach host data carried alongside the notice
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn kind(&self) -> &NoticeKind {
        &self.kind
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Check whether this notice has the given kind
    pub fn is(&self, kind: &NoticeKind) -> bool {
        &self.kind == kind
    }
}

/// Contents of the display slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Visible {
    /// Nothing is shown; the host should hide whatever it rendered
    #[default]
    Empty,
    /// This notice should be shown
    Notice(Notice),
}

impl Visible {
    /// Kind of the visible notice, or the reserved empty kind
    pub fn kind(&self) -> &NoticeKind {
        match self {
            Visible::Empty => &EMPTY,
            Visible::Notice(notice) => notice.kind(),
        }
    }

    /// Priority used when comparing against arrivals; Empty never outranks anything
    pub fn priority(&self) -> i32 {
        match self {
            Visible::Empty => i32::MIN,
            Visible::Notice(notice) => notice.priority(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Visible::Empty)
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Visible::Empty => None,
            Visible::Notice(notice) => Some(notice),
        }
    }
}

impl From<Notice> for Visible {
    fn from(notice: Notice) -> Self {
        Visible::Notice(notice)
    }
}
