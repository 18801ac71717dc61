//! Queue protocol integration tests
//!
//! Drives the public queue API on a manual clock and checks the exact stream
//! of display decisions a host would observe.

use std::thread;
use std::time::Duration;

use noticeq::{ManualClock, Notice, NoticeKind, NoticeQueue, QueueError, Result, Subscription, Visible};

fn low() -> Notice {
    Notice::new("low", 0)
}

fn middle() -> Notice {
    Notice::new("middle", 1)
}

fn high() -> Notice {
    Notice::new("high", 2)
}

fn kinds(values: &[Visible]) -> Vec<String> {
    values.iter().map(|v| v.kind().to_string()).collect()
}

fn setup() -> Result<(NoticeQueue, Subscription, ManualClock)> {
    let clock = ManualClock::new();
    let mut queue = NoticeQueue::new().with_clock(clock.clone());
    let shown = queue.on_show()?;
    Ok((queue, shown, clock))
}

#[test]
fn test_idempotent_add_before_shown() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.add([low()])?;
    queue.add([low()])?;
    assert_eq!(queue.pending_notices(), vec![low()]);

    queue.start()?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "low"]);
    assert!(queue.pending_notices().is_empty());
    Ok(())
}

#[test]
fn test_priority_ordering() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.add([Notice::new("b", 1), Notice::new("a", 2)])?;
    queue.start()?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "a"]);

    queue.remove(None)?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "b"]);
    Ok(())
}

#[test]
fn test_preemption_round_trip() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.add([low()])?;
    queue.start()?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "low"]);

    queue.add([high()])?;
    assert_eq!(shown.drain(), vec![Visible::Empty]);

    queue.remove(None)?;
    assert_eq!(shown.drain(), vec![Visible::Notice(high())]);

    queue.remove(None)?;
    assert_eq!(shown.drain(), vec![Visible::Empty, Visible::Notice(low())]);
    Ok(())
}

#[test]
fn test_pacing_waits_for_delay() -> Result<()> {
    let (mut queue, mut shown, clock) = setup()?;
    let delayed = low().with_delay(Duration::from_millis(1000));
    queue.add([delayed.clone()])?;
    queue.start()?;

    clock.advance(Duration::from_millis(999));
    assert!(!queue.poll()?);
    assert_eq!(shown.drain(), vec![Visible::Empty]);

    clock.advance(Duration::from_millis(1));
    assert!(queue.poll()?);
    assert_eq!(shown.drain(), vec![Visible::Notice(delayed)]);
    Ok(())
}

#[test]
fn test_delay_counts_from_becoming_head() -> Result<()> {
    let (mut queue, mut shown, clock) = setup()?;
    let waiting = low().with_delay(Duration::from_millis(500));
    queue.add([high(), waiting.clone()])?;
    queue.start()?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "high"]);

    // time spent behind the visible notice does not count
    clock.advance(Duration::from_secs(10));
    assert!(!queue.poll()?);

    queue.remove(None)?;
    clock.advance(Duration::from_millis(499));
    assert!(!queue.poll()?);
    clock.advance(Duration::from_millis(1));
    assert!(queue.poll()?);
    assert_eq!(shown.drain(), vec![Visible::Empty, Visible::Notice(waiting)]);
    Ok(())
}

#[test]
fn test_stop_forces_hide() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.add([low()])?;
    queue.start()?;
    queue.stop()?;
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "low", "<empty>"]);

    queue.add([middle()])?;
    assert!(shown.drain().is_empty());
    assert_eq!(queue.pending_notices(), vec![middle()]);

    queue.start()?;
    assert_eq!(shown.drain(), vec![Visible::Notice(middle())]);
    Ok(())
}

#[test]
fn test_back_navigation_when_empty() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.start()?;
    assert!(!queue.on_back_navigation()?);
    assert_eq!(shown.drain(), vec![Visible::Empty]);
    Ok(())
}

#[test]
fn test_back_navigation_hides_visible() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.start()?;
    queue.add([low()])?;
    assert!(queue.on_back_navigation()?);
    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "low", "<empty>"]);

    // host acknowledges the hide; nothing else is pending
    queue.remove(None)?;
    assert!(shown.drain().is_empty());
    queue.add([middle()])?;
    assert_eq!(shown.drain(), vec![Visible::Notice(middle())]);
    Ok(())
}

#[test]
fn test_cancel_pending_before_delay() -> Result<()> {
    let (mut queue, mut shown, clock) = setup()?;
    queue.start()?;
    queue.add([low().with_delay(Duration::from_millis(1000))])?;
    queue.remove(Some(&NoticeKind::new("low")))?;

    clock.advance(Duration::from_millis(1000));
    assert!(!queue.poll()?);
    assert_eq!(shown.drain(), vec![Visible::Empty]);
    Ok(())
}

#[test]
fn test_cancel_from_middle_of_queue() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    queue.add([middle(), low()])?;
    queue.remove(Some(low().kind()))?;
    queue.start()?;
    queue.remove(None)?;

    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "middle", "<empty>"]);
    Ok(())
}

#[test]
fn test_remove_shown_after_delay() -> Result<()> {
    let (mut queue, mut shown, clock) = setup()?;
    queue.add([low().with_delay(Duration::from_millis(1000))])?;
    queue.start()?;
    clock.advance(Duration::from_millis(1000));
    queue.poll()?;
    queue.remove(None)?;

    assert_eq!(kinds(&shown.drain()), vec!["<empty>", "low", "<empty>"]);
    Ok(())
}

#[test]
fn test_pending_notices_excludes_visible() -> Result<()> {
    let (mut queue, _shown, _clock) = setup()?;
    queue.add([low(), high(), middle()])?;
    assert_eq!(queue.pending_notices(), vec![high(), middle(), low()]);

    queue.start()?;
    assert_eq!(queue.current(), &Visible::Notice(high()));
    assert_eq!(queue.pending_notices(), vec![middle(), low()]);

    queue.remove(None)?;
    queue.remove(None)?;
    assert!(queue.pending_notices().is_empty());
    Ok(())
}

#[test]
fn test_clear_empties_pending() -> Result<()> {
    let (mut queue, _shown, _clock) = setup()?;
    queue.add([low(), middle()])?;
    queue.clear()?;
    assert!(queue.pending_notices().is_empty());
    Ok(())
}

/// Equal priorities are shown in arrival order.
#[test]
fn test_equal_priority_tie_break_is_insertion_order() -> Result<()> {
    let (mut queue, mut shown, _clock) = setup()?;
    let first = Notice::new("first", 1);
    let second = Notice::new("second", 1);
    let third = Notice::new("third", 1);
    queue.add([first.clone(), second.clone(), third.clone()])?;
    assert_eq!(queue.pending_notices(), vec![first.clone(), second.clone(), third.clone()]);

    queue.start()?;
    queue.remove(None)?;
    queue.remove(None)?;
    assert_eq!(
        shown.drain(),
        vec![
            Visible::Empty,
            Visible::Notice(first),
            Visible::Empty,
            Visible::Notice(second),
            Visible::Empty,
            Visible::Notice(third),
        ]
    );
    Ok(())
}

#[test]
fn test_late_subscriber_sees_current_value() -> Result<()> {
    let (mut queue, _shown, _clock) = setup()?;
    queue.add([middle()])?;
    queue.start()?;

    let mut late = queue.on_show()?;
    assert_eq!(late.drain(), vec![Visible::Notice(middle())]);
    Ok(())
}

#[test]
fn test_remove_empty_kind_fails() -> Result<()> {
    let (mut queue, _shown, _clock) = setup()?;
    queue.add([low()])?;
    queue.start()?;
    let result = queue.remove(Some(&NoticeKind::empty()));
    assert!(matches!(result, Err(QueueError::InvalidKind(_))));
    Ok(())
}

#[test]
fn test_calls_from_other_thread_rejected() -> Result<()> {
    let (mut queue, _shown, _clock) = setup()?;
    queue.add([low()])?;

    let (queue, result) = thread::spawn(move || {
        let mut queue = queue;
        let result = queue.add([high()]);
        (queue, result)
    })
    .join()
    .unwrap();

    assert!(matches!(result, Err(QueueError::WrongThread { operation: "add" })));
    assert_eq!(queue.pending_notices(), vec![low()]);
    Ok(())
}
