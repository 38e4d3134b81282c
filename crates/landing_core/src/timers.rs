use std::{collections::BTreeMap, time::Duration};

use shared::domain::{ElementId, TimerToken};
use tracing::debug;

use crate::port::Scheduler;

/// Every pending callback the controller can have in flight. Each kind owns
/// exactly one slot; re-arming a slot supersedes the previous timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    ResizeSettled,
    BackdropRemoval,
    SubmitLatency,
    SuccessReset,
    FormErrorDismiss,
    LoadingOverlayHide,
    OrientationSettle,
    RippleSettle(ElementId),
}

#[derive(Debug, Default)]
pub struct TimerSlots {
    next_token: u64,
    armed: BTreeMap<TimerKind, TimerToken>,
}

impl TimerSlots {
    pub fn arm<S: Scheduler + ?Sized>(
        &mut self,
        scheduler: &mut S,
        kind: TimerKind,
        delay: Duration,
    ) -> TimerToken {
        if let Some(previous) = self.armed.remove(&kind) {
            scheduler.cancel(previous);
            debug!(?kind, token = previous.0, "timers: superseded pending timer");
        }
        self.next_token += 1;
        let token = TimerToken(self.next_token);
        self.armed.insert(kind, token);
        scheduler.schedule(token, delay);
        token
    }

    pub fn disarm<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S, kind: TimerKind) -> bool {
        match self.armed.remove(&kind) {
            Some(token) => {
                scheduler.cancel(token);
                true
            }
            None => false,
        }
    }

    /// Resolves a fired token. Stale tokens (superseded or cancelled) yield
    /// `None` so their callbacks cannot undo newer state.
    pub fn claim(&mut self, token: TimerToken) -> Option<TimerKind> {
        let kind = self
            .armed
            .iter()
            .find_map(|(kind, armed)| (*armed == token).then_some(*kind))?;
        self.armed.remove(&kind);
        Some(kind)
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.armed.contains_key(&kind)
    }

    pub fn pending(&self) -> usize {
        self.armed.len()
    }

    pub fn cancel_all<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        for (_, token) in std::mem::take(&mut self.armed) {
            scheduler.cancel(token);
        }
    }
}

#[cfg(test)]
#[path = "tests/timers_tests.rs"]
mod tests;
