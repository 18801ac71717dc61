//! Display state and its change stream.
//!
//! Holds the single `Visible` value. Every change is pushed to subscribers in
//! the same call that made it; setting the value it already holds is silent.
//! New subscribers get the current value first.

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use crate::notice::Visible;

#[derive(Debug, Default)]
pub struct DisplayState {
    current: Visible,
    subscribers: Vec<UnboundedSender<Visible>>,
}

impl DisplayState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Visible {
        &self.current
    }

    /// Register a subscriber and replay the current value to it.
    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = unbounded_channel();
        // Receiver is alive, so this cannot fail.
        let _ = tx.send(self.current.clone());
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Replace the value; returns false (and emits nothing) if unchanged.
    pub fn set(&mut self, value: Visible) -> bool {
        if self.current == value {
            return false;
        }
        self.current = value;
        let current = &self.current;
        self.subscribers.retain(|tx| tx.send(current.clone()).is_ok());
        true
    }

    /// Number of live subscribers as of the last emission.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of the display stream.
#[derive(Debug)]
pub struct Subscription {
    rx: UnboundedReceiver<Visible>,
}

impl Subscription {
    /// Wait for the next value; `None` once the queue is gone.
    pub async fn next(&mut self) -> Option<Visible> {
        self.rx.recv().await
    }

    /// Next value if one is already waiting.
    pub fn try_next(&mut self) -> Option<Visible> {
        self.rx.try_recv().ok()
    }

    /// Everything emitted since the last read, oldest first.
    pub fn drain(&mut self) -> Vec<Visible> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}
