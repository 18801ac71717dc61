//! The notice queue: preemption, requeue and pacing over a single display slot.
//!
//! # Protocol
//!
//! - `add` deduplicates by kind, prunes children, then either waits behind a
//!   higher pending notice, waits behind the visible one, or takes over.
//!   Taking over a visible notice only *requests* a hide (display goes Empty);
//!   the host acknowledges with `remove()` and only then does the next notice
//!   get paced in.
//! - `remove()` is that acknowledgment. `remove(Some(kind))` also cancels the
//!   kind wherever it sits.
//! - The pacer promotes the pending head after its delay while running.

use std::time::Instant;

use crate::clock::{Clock, SystemClock};
use crate::error::{QueueError, Result};
use crate::notice::{Notice, NoticeKind, Visible};
use crate::policy::{DefaultPolicy, PlacementPolicy};
use crate::queue::affinity::ThreadAffinity;
use crate::queue::display::{DisplayState, Subscription};
use crate::queue::pacer::Pacer;
use crate::queue::pending::PendingStore;

/// Whether the pacer may promote notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Paused,
    Running,
}

/// Priority-preemptive scheduler for one display slot.
pub struct NoticeQueue {
    policy: Box<dyn PlacementPolicy>,
    clock: Box<dyn Clock>,
    pending: PendingStore,
    display: DisplayState,
    pacer: Pacer,
    mode: Mode,
    /// Display is being cleared because something preempted it.
    preempting: bool,
    affinity: ThreadAffinity,
}

impl NoticeQueue {
    /// Create a paused queue with the default policy, bound to the calling thread.
    pub fn new() -> Self {
        Self {
            policy: Box::new(DefaultPolicy),
            clock: Box::new(SystemClock),
            pending: PendingStore::new(),
            display: DisplayState::new(),
            pacer: Pacer::new(),
            mode: Mode::Paused,
            preempting: false,
            affinity: ThreadAffinity::current(),
        }
    }

    pub fn with_policy(mut self, policy: impl PlacementPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Subscribe to what should be visible. The current value is delivered first.
    pub fn on_show(&mut self) -> Result<Subscription> {
        self.affinity.check("on_show")?;
        let subscription = self.display.subscribe();
        tracing::debug!(subscribers = self.display.subscriber_count(), "Display subscriber added");
        Ok(subscription)
    }

    /// Add notices, in order. Works whether or not the queue is running.
    pub fn add<I>(&mut self, notices: I) -> Result<()>
    where
        I: IntoIterator<Item = Notice>,
    {
        self.affinity.check("add")?;
        let notices: Vec<Notice> = notices.into_iter().collect();
        if let Some(bad) = notices.iter().find(|n| n.kind().is_reserved_empty()) {
            return Err(QueueError::InvalidKind(bad.kind().to_string()));
        }
        for notice in notices {
            self.add_one(notice)?;
        }
        Ok(())
    }

    /// Acknowledge the current display state and advance.
    ///
    /// With a kind, also drops every pending notice of that kind and hides it
    /// if it is the one visible.
    pub fn remove(&mut self, kind: Option<&NoticeKind>) -> Result<()> {
        self.affinity.check("remove")?;
        let removing_head = match kind {
            Some(kind) if kind.is_reserved_empty() => {
                return Err(QueueError::InvalidKind(kind.to_string()));
            }
            Some(kind) => self.pending.remove_all_of_kind(kind),
            None => false,
        };

        let targets_current = kind.is_none_or(|kind| self.display.current().kind() == kind);
        if targets_current {
            self.preempting = false;
        }
        if targets_current || removing_head {
            tracing::debug!(kind = ?kind.map(NoticeKind::as_str), removing_head, "Advancing queue");
            self.display.set(Visible::Empty);
            self.arm()?;
        }
        Ok(())
    }

    /// Hide the visible notice, if any. Returns whether there was one.
    ///
    /// The host still calls `remove()` after reacting to the resulting Empty.
    pub fn on_back_navigation(&mut self) -> Result<bool> {
        self.affinity.check("on_back_navigation")?;
        let showing = !self.display.current().is_empty();
        if showing {
            self.display.set(Visible::Empty);
        }
        Ok(showing)
    }

    pub fn start(&mut self) -> Result<()> {
        self.affinity.check("start")?;
        if self.mode == Mode::Running {
            return Ok(());
        }
        tracing::debug!(pending = self.pending.len(), "Queue started");
        self.mode = Mode::Running;
        self.arm()
    }

    /// Pause pacing and hide whatever is visible.
    pub fn stop(&mut self) -> Result<()> {
        self.affinity.check("stop")?;
        if self.mode == Mode::Paused {
            return Ok(());
        }
        tracing::debug!(pending = self.pending.len(), "Queue stopped");
        self.mode = Mode::Paused;
        self.pacer.cancel();
        self.display.set(Visible::Empty);
        Ok(())
    }

    /// Drop all pending notices. The visible one stays until removed.
    pub fn clear(&mut self) -> Result<()> {
        self.affinity.check("clear")?;
        self.pacer.cancel();
        self.pending.clear();
        Ok(())
    }

    /// Notices waiting for the slot, head first. Excludes the visible one.
    pub fn pending_notices(&self) -> Vec<Notice> {
        self.pending.snapshot()
    }

    pub fn current(&self) -> &Visible {
        self.display.current()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == Mode::Running
    }

    /// When the pacer will next promote a notice, if armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pacer.deadline()
    }

    /// Promote the pending head if its pacing deadline has passed.
    pub fn poll(&mut self) -> Result<bool> {
        self.affinity.check("poll")?;
        self.fire_if_due()
    }

    fn add_one(&mut self, notice: Notice) -> Result<()> {
        if self.display.current().kind() == notice.kind() || self.pending.contains_kind(notice.kind()) {
            tracing::debug!(kind = %notice.kind(), "Ignoring duplicate notice");
            return Ok(());
        }
        self.prune_children(&notice);

        let outranks_head = self
            .pending
            .peek_head()
            .is_none_or(|head| notice.priority() > head.notice.priority());
        if outranks_head {
            return self.compare_with_showing(notice);
        }
        self.enqueue(notice);
        Ok(())
    }

    fn compare_with_showing(&mut self, notice: Notice) -> Result<()> {
        let showing = self.display.current();
        if self.preempting || showing.priority() > notice.priority() {
            self.enqueue(notice);
            return Ok(());
        }

        let displaced = showing.notice().cloned();
        let requeue = displaced.as_ref().and_then(|shown| {
            if shown.kind() == notice.kind() || self.policy.is_child(&notice, shown) {
                return None;
            }
            self.policy.requeue_delay(shown).map(|delay| (shown.clone(), delay))
        });

        self.enqueue(notice);
        if let Some((shown, delay)) = requeue {
            tracing::debug!(kind = %shown.kind(), delay_ms = delay.as_millis() as u64, "Requeueing displaced notice");
            self.pending.insert(shown, delay);
        }

        match displaced {
            Some(shown) => {
                tracing::debug!(kind = %shown.kind(), "Preempting visible notice");
                self.preempting = true;
                self.display.set(Visible::Empty);
                Ok(())
            }
            None => self.arm(),
        }
    }

    fn enqueue(&mut self, notice: Notice) {
        tracing::debug!(kind = %notice.kind(), priority = notice.priority(), "Notice queued");
        let delay = notice.delay();
        self.pending.insert(notice, delay);
    }

    fn prune_children(&mut self, parent: &Notice) {
        let policy = &self.policy;
        let pruned = self.pending.remove_where(|pending| policy.is_child(parent, pending));
        if pruned > 0 {
            tracing::debug!(parent = %parent.kind(), pruned, "Pruned child notices");
        }
    }

    /// Reprogram the pacer for the current head. A deadline that is already
    /// due fires before returning.
    fn arm(&mut self) -> Result<()> {
        self.pacer.cancel();
        if self.mode != Mode::Running {
            return Ok(());
        }
        let Some(head) = self.pending.peek_head() else {
            return Ok(());
        };
        self.pacer.arm(self.clock.now(), head.delay);
        self.fire_if_due()?;
        Ok(())
    }

    fn fire_if_due(&mut self) -> Result<bool> {
        if !self.pacer.take_due(self.clock.now()) {
            return Ok(false);
        }
        self.fire()?;
        Ok(true)
    }

    fn fire(&mut self) -> Result<()> {
        let Some(head) = self.pending.pop_head() else {
            tracing::error!("Pacer fired with no pending notices");
            return Err(QueueError::Invariant(
                "pacer fired with no pending notices".to_string(),
            ));
        };
        self.prune_children(&head.notice);
        tracing::debug!(kind = %head.notice.kind(), "Showing notice");
        self.display.set(Visible::Notice(head.notice));
        Ok(())
    }
}

impl Default for NoticeQueue {
    fn default() -> Self {
        Self::new()
    }
}
