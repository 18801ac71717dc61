//! Notice queue: the scheduler and the pieces it orchestrates.
//!
//! This module provides:
//! - **Pending store**: notices waiting for the slot, by priority then arrival.
//! - **Display state**: the one visible value and its deduplicated change stream.
//! - **Pacer**: the single deadline that promotes the pending head.
//! - **NoticeQueue**: the engine tying them together.
//!
//! # Example
//!
//! ```
//! use noticeq::{Notice, NoticeQueue, Visible};
//!
//! let mut queue = NoticeQueue::new();
//! let mut shown = queue.on_show()?;
//! queue.add([Notice::new("low", 0), Notice::new("high", 2)])?;
//! queue.start()?;
//!
//! assert_eq!(shown.drain(), vec![Visible::Empty, Visible::Notice(Notice::new("high", 2))]);
//!
//! // host hid the notice; advance
//! queue.remove(None)?;
//! assert_eq!(queue.current(), &Visible::Notice(Notice::new("low", 0)));
//! # Ok::<(), noticeq::QueueError>(())
//! ```

mod affinity;
mod display;
mod engine;
mod pacer;
mod pending;

pub use affinity::ThreadAffinity;
pub use display::{DisplayState, Subscription};
pub use engine::{Mode, NoticeQueue};
pub use pacer::Pacer;
pub use pending::{PendingEntry, PendingStore};
