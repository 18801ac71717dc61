//! noticeq - Priority-preemptive scheduling for a single display slot
//!
//! Transient notices (tooltips, hints, banners) compete for one slot. The queue
//! decides what should be visible now, paces promotions with per-notice delays,
//! lets higher priority arrivals preempt, and hands the host a deduplicated
//! stream of show/hide decisions.

pub mod clock;
pub mod driver;
pub mod error;
pub mod notice;
pub mod policy;
pub mod queue;
pub mod simulate;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use driver::{NoticeDriver, NoticeHandle};
pub use error::{QueueError, Result};
pub use notice::{Notice, NoticeKind, Visible};
pub use policy::{DefaultPolicy, PlacementPolicy, PolicyConfig, RulesPolicy};
pub use queue::{Mode, NoticeQueue, Subscription};
