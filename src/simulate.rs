//! Scenario simulation.
//!
//! Replays a scripted sequence of host calls against a queue on a manual
//! clock and records every show/hide decision with its simulated time.
//!
//! ```yaml
//! notices:
//!   low:  { priority: 0, delay-ms: 1000 }
//!   high: { priority: 2 }
//! steps:
//!   - op: add
//!     kinds: [low]
//!   - op: start
//!   - op: advance
//!     ms: 1000
//!   - op: add
//!     kinds: [high]
//!   - op: remove
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clock::{Clock, ManualClock};
use crate::error::{QueueError, Result};
use crate::notice::{Notice, NoticeKind, Visible};
use crate::policy::PlacementPolicy;
use crate::queue::{NoticeQueue, Subscription};

/// How a scenario builds notices of one kind.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct NoticeTemplate {
    pub priority: i32,
    #[serde(default)]
    pub delay_ms: u64,
    #[serde(default)]
    pub payload: Option<Value>,
}

impl NoticeTemplate {
    fn build(&self, kind: &str) -> Notice {
        let notice = Notice::new(NoticeKind::new(kind), self.priority)
            .with_delay(Duration::from_millis(self.delay_ms));
        match &self.payload {
            Some(payload) => notice.with_payload(payload.clone()),
            None => notice,
        }
    }
}

/// One host call.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Step {
    Add { kinds: Vec<String> },
    Remove {
        #[serde(default)]
        kind: Option<String>,
    },
    Start,
    Stop,
    Clear,
    Back,
    /// Let simulated time pass, firing the pacer at its exact deadlines.
    Advance { ms: u64 },
    /// Record the pending queue.
    Pending,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Scenario {
    #[serde(default)]
    pub notices: BTreeMap<String, NoticeTemplate>,

    /// JSON file of notices persisted by a previous run, added before the first step.
    #[serde(default)]
    pub restore: Option<PathBuf>,

    pub steps: Vec<Step>,
}

impl Scenario {
    /// Load a YAML scenario; a relative `restore` path resolves against the scenario's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut scenario: Self = serde_yaml::from_str(&content)?;
        if let Some(restore) = scenario.restore.as_mut()
            && restore.is_relative()
            && let Some(dir) = path.parent()
        {
            *restore = dir.join(&*restore);
        }
        Ok(scenario)
    }

    fn notice(&self, kind: &str) -> Result<Notice> {
        self.notices
            .get(kind)
            .map(|template| template.build(kind))
            .ok_or_else(|| QueueError::UnknownKind(kind.to_string()))
    }
}

/// What happened, in terms the host sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum EventKind {
    Show { notice: Notice },
    Hide,
    Back { handled: bool },
    Pending { kinds: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub at_ms: u64,
    /// 1-based step index; 0 is the replay on subscription and restore.
    pub step: usize,
    #[serde(flatten)]
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct Simulation {
    pub timeline: Vec<Event>,
    /// Notices still waiting when the scenario ended.
    pub pending: Vec<Notice>,
}

struct Recorder {
    clock: ManualClock,
    shown: Subscription,
    timeline: Vec<Event>,
}

impl Recorder {
    fn at_ms(&self) -> u64 {
        u64::try_from(self.clock.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn push(&mut self, step: usize, kind: EventKind) {
        let at_ms = self.at_ms();
        self.timeline.push(Event { at_ms, step, kind });
    }

    fn collect(&mut self, step: usize) {
        for visible in self.shown.drain() {
            let kind = match visible {
                Visible::Empty => EventKind::Hide,
                Visible::Notice(notice) => EventKind::Show { notice },
            };
            self.push(step, kind);
        }
    }
}

/// Run a scenario to completion.
pub fn run(scenario: &Scenario, policy: impl PlacementPolicy + 'static) -> Result<Simulation> {
    let clock = ManualClock::new();
    let mut queue = NoticeQueue::new().with_policy(policy).with_clock(clock.clone());
    let shown = queue.on_show()?;
    let mut recorder = Recorder {
        clock: clock.clone(),
        shown,
        timeline: Vec::new(),
    };

    if let Some(path) = &scenario.restore {
        let restored: Vec<Notice> = serde_json::from_str(&fs::read_to_string(path)?)?;
        tracing::debug!(count = restored.len(), path = %path.display(), "Restoring pending notices");
        queue.add(restored)?;
    }
    recorder.collect(0);

    for (index, step) in scenario.steps.iter().enumerate() {
        let step_no = index + 1;
        match step {
            Step::Add { kinds } => {
                let notices = kinds.iter().map(|k| scenario.notice(k)).collect::<Result<Vec<_>>>()?;
                queue.add(notices)?;
            }
            Step::Remove { kind } => {
                let kind = kind.as_deref().map(NoticeKind::new);
                queue.remove(kind.as_ref())?;
            }
            Step::Start => queue.start()?,
            Step::Stop => queue.stop()?,
            Step::Clear => queue.clear()?,
            Step::Back => {
                let handled = queue.on_back_navigation()?;
                recorder.collect(step_no);
                recorder.push(step_no, EventKind::Back { handled });
            }
            Step::Advance { ms } => {
                let target = clock.now() + Duration::from_millis(*ms);
                while let Some(deadline) = queue.next_deadline().filter(|d| *d <= target) {
                    clock.advance_to(deadline);
                    if !queue.poll()? {
                        break;
                    }
                    recorder.collect(step_no);
                }
                clock.advance_to(target);
            }
            Step::Pending => {
                let kinds = queue.pending_notices().iter().map(|n| n.kind().to_string()).collect();
                recorder.push(step_no, EventKind::Pending { kinds });
            }
        }
        recorder.collect(step_no);
    }

    Ok(Simulation {
        timeline: recorder.timeline,
        pending: queue.pending_notices(),
    })
}
