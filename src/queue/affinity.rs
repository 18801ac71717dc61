//! Thread affinity guard.
//!
//! The queue mutates its state without locks, so every mutating call must come
//! from the thread that created it.

use std::thread::{self, ThreadId};

use crate::error::{QueueError, Result};

#[derive(Debug, Clone, Copy)]
pub struct ThreadAffinity {
    owner: ThreadId,
}

impl ThreadAffinity {
    /// Bind to the calling thread.
    pub fn current() -> Self {
        Self {
            owner: thread::current().id(),
        }
    }

    pub fn check(&self, operation: &'static str) -> Result<()> {
        if thread::current().id() == self.owner {
            Ok(())
        } else {
            tracing::error!(operation, "Queue called off its owning thread");
            Err(QueueError::WrongThread { operation })
        }
    }
}
