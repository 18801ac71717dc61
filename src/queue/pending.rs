//! Pending store: notices waiting for the display slot.
//!
//! Ordered by descending priority. Equal priorities keep insertion order, so
//! the same sequence of calls always yields the same display order.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::notice::{Notice, NoticeKind};

type Key = (Reverse<i32>, u64);

/// A waiting notice and the delay to apply once it becomes head.
///
/// `delay` differs from the notice's own delay when the entry is a requeued,
/// previously displayed notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub notice: Notice,
    pub delay: Duration,
}

#[derive(Debug, Default)]
pub struct PendingStore {
    entries: BTreeMap<Key, PendingEntry>,
    next_seq: u64,
}

impl PendingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, notice: Notice, delay: Duration) {
        let key = (Reverse(notice.priority()), self.next_seq);
        self.next_seq += 1;
        self.entries.insert(key, PendingEntry { notice, delay });
    }

    pub fn peek_head(&self) -> Option<&PendingEntry> {
        self.entries.values().next()
    }

    pub fn pop_head(&mut self) -> Option<PendingEntry> {
        self.entries.pop_first().map(|(_, entry)| entry)
    }

    /// Remove every entry of `kind`.
    ///
    /// Returns true if the head before removal was of that kind.
    pub fn remove_all_of_kind(&mut self, kind: &NoticeKind) -> bool {
        let removing_head = self.peek_head().is_some_and(|head| head.notice.is(kind));
        self.entries.retain(|_, entry| !entry.notice.is(kind));
        removing_head
    }

    /// Remove every entry whose notice matches `predicate`; returns how many went.
    pub fn remove_where<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Notice) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !predicate(&entry.notice));
        before - self.entries.len()
    }

    pub fn contains_kind(&self, kind: &NoticeKind) -> bool {
        self.entries.values().any(|entry| entry.notice.is(kind))
    }

    /// Pending notices, head first.
    pub fn snapshot(&self) -> Vec<Notice> {
        self.entries.values().map(|entry| entry.notice.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
