//! The resources every sub-behavior mutates: the ports, the scroll lock and
//! the timer slots.

use std::time::Duration;

use shared::domain::Region;
use tracing::debug;

use crate::{
    config::ControllerConfig,
    port::{PresentationPort, ScrollBehavior, Scheduler},
    scroll_lock::{LockChange, LockOwner, ScrollLock},
    smooth_scroll::ScrollAnimation,
    timers::{TimerKind, TimerSlots},
};

pub(crate) struct Surface<P, S> {
    pub(crate) port: P,
    pub(crate) scheduler: S,
    pub(crate) lock: ScrollLock,
    pub(crate) timers: TimerSlots,
    pub(crate) config: ControllerConfig,
    pub(crate) scroll_animation: Option<ScrollAnimation>,
}

impl<P: PresentationPort, S: Scheduler> Surface<P, S> {
    pub(crate) fn new(port: P, scheduler: S, config: ControllerConfig) -> Self {
        Self {
            port,
            scheduler,
            lock: ScrollLock::default(),
            timers: TimerSlots::default(),
            config,
            scroll_animation: None,
        }
    }

    pub(crate) fn arm(&mut self, kind: TimerKind, delay_ms: u64) {
        self.timers
            .arm(&mut self.scheduler, kind, Duration::from_millis(delay_ms));
    }

    pub(crate) fn disarm(&mut self, kind: TimerKind) -> bool {
        self.timers.disarm(&mut self.scheduler, kind)
    }

    /// Locks page scrolling for `owner`, pinning the body at the current
    /// offset so the page does not jump. Returns the offset that will be
    /// restored once the lock is fully released.
    pub(crate) fn acquire_scroll_lock(&mut self, owner: LockOwner) -> f64 {
        if self.scroll_animation.take().is_some() {
            debug!(?owner, "scroll: manual animation cancelled by lock");
        }
        let change = self.lock.acquire(owner, self.port.scroll_offset());
        if let LockChange::Engaged { offset } = change {
            if let Some(body) = self.port.region(Region::Body) {
                let top = format!("-{offset}px");
                self.port.set_style(body, "overflow", Some("hidden"));
                self.port.set_style(body, "position", Some("fixed"));
                self.port.set_style(body, "width", Some("100%"));
                self.port.set_style(body, "top", Some(&top));
            }
            debug!(?owner, offset, "scroll: lock engaged");
        } else {
            debug!(?owner, ?change, "scroll: lock shared");
        }
        self.lock.saved_offset()
    }

    pub(crate) fn release_scroll_lock(&mut self, owner: LockOwner) {
        match self.lock.release(owner) {
            LockChange::Released { restore_to } => {
                if let Some(body) = self.port.region(Region::Body) {
                    for property in ["overflow", "position", "width", "top"] {
                        self.port.set_style(body, property, None);
                    }
                }
                self.port.scroll_to(restore_to, ScrollBehavior::Instant);
                debug!(?owner, restore_to, "scroll: lock released");
            }
            change => debug!(?owner, ?change, "scroll: lock still held"),
        }
    }
}
