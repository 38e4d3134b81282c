use std::{collections::HashMap, time::Duration};

use gloo_timers::callback::Timeout;
use landing_core::port::Scheduler;
use shared::domain::TimerToken;
use tracing::warn;
use wasm_bindgen::{prelude::Closure, JsCast};
use web_sys::Window;

use crate::app::{self, DomInput};

/// Timers on `setTimeout` and frames on `requestAnimationFrame`. Fired
/// callbacks re-enter the controller through the app dispatcher.
pub struct BrowserScheduler {
    window: Window,
    timeouts: HashMap<TimerToken, Timeout>,
    fired: Vec<TimerToken>,
    frame_pending: bool,
}

impl BrowserScheduler {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            timeouts: HashMap::new(),
            fired: Vec::new(),
            frame_pending: false,
        }
    }

    /// Marks `token` as fired. Its handle is released on the next firing,
    /// once its callback has returned.
    pub(crate) fn forget(&mut self, token: TimerToken) {
        for stale in self.fired.drain(..) {
            self.timeouts.remove(&stale);
        }
        self.fired.push(token);
    }

    pub(crate) fn frame_fired(&mut self) {
        self.frame_pending = false;
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, move || {
            app::dispatch(DomInput::Timer(token));
        });
        self.timeouts.insert(token, timeout);
    }

    fn cancel(&mut self, token: TimerToken) {
        // Dropping a pending timeout clears it.
        self.timeouts.remove(&token);
    }

    fn request_frame(&mut self) {
        if self.frame_pending {
            return;
        }
        let callback = Closure::once_into_js(move |timestamp: f64| {
            app::dispatch(DomInput::Frame(timestamp));
        });
        match self
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            Ok(_) => self.frame_pending = true,
            Err(err) => warn!(?err, "scheduler: animation frame request failed"),
        }
    }
}
