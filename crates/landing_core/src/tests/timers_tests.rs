use super::*;

#[derive(Default)]
struct RecordingScheduler {
    scheduled: Vec<(TimerToken, Duration)>,
    cancelled: Vec<TimerToken>,
}

impl Scheduler for RecordingScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        self.scheduled.push((token, delay));
    }

    fn cancel(&mut self, token: TimerToken) {
        self.cancelled.push(token);
    }

    fn request_frame(&mut self) {}
}

#[test]
fn rearming_a_slot_cancels_the_previous_timer() {
    let mut scheduler = RecordingScheduler::default();
    let mut slots = TimerSlots::default();

    let first = slots.arm(&mut scheduler, TimerKind::ResizeSettled, Duration::from_millis(250));
    let second = slots.arm(&mut scheduler, TimerKind::ResizeSettled, Duration::from_millis(250));

    assert_ne!(first, second);
    assert_eq!(scheduler.cancelled, vec![first]);
    assert_eq!(slots.pending(), 1);
    assert_eq!(slots.claim(first), None);
    assert_eq!(slots.claim(second), Some(TimerKind::ResizeSettled));
    assert!(!slots.is_armed(TimerKind::ResizeSettled));
}

#[test]
fn slots_are_independent_per_kind() {
    let mut scheduler = RecordingScheduler::default();
    let mut slots = TimerSlots::default();

    let latency = slots.arm(&mut scheduler, TimerKind::SubmitLatency, Duration::from_millis(1500));
    let ripple_a = slots.arm(
        &mut scheduler,
        TimerKind::RippleSettle(ElementId(1)),
        Duration::from_millis(300),
    );
    let ripple_b = slots.arm(
        &mut scheduler,
        TimerKind::RippleSettle(ElementId(2)),
        Duration::from_millis(300),
    );

    assert!(scheduler.cancelled.is_empty());
    assert_eq!(slots.pending(), 3);
    assert_eq!(slots.claim(ripple_b), Some(TimerKind::RippleSettle(ElementId(2))));
    assert_eq!(slots.claim(ripple_a), Some(TimerKind::RippleSettle(ElementId(1))));
    assert_eq!(slots.claim(latency), Some(TimerKind::SubmitLatency));
}

#[test]
fn a_token_can_only_be_claimed_once() {
    let mut scheduler = RecordingScheduler::default();
    let mut slots = TimerSlots::default();
    let token = slots.arm(&mut scheduler, TimerKind::BackdropRemoval, Duration::from_millis(300));

    assert_eq!(slots.claim(token), Some(TimerKind::BackdropRemoval));
    assert_eq!(slots.claim(token), None);
}

#[test]
fn cancel_all_clears_every_slot() {
    let mut scheduler = RecordingScheduler::default();
    let mut slots = TimerSlots::default();
    let a = slots.arm(&mut scheduler, TimerKind::SubmitLatency, Duration::from_millis(1500));
    let b = slots.arm(&mut scheduler, TimerKind::FormErrorDismiss, Duration::from_millis(5000));

    slots.cancel_all(&mut scheduler);

    assert_eq!(slots.pending(), 0);
    assert!(scheduler.cancelled.contains(&a));
    assert!(scheduler.cancelled.contains(&b));
    assert!(!slots.disarm(&mut scheduler, TimerKind::SubmitLatency));
    assert_eq!(slots.claim(a), None);
}
