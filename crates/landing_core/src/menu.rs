//! Mobile navigation menu: `Closed <-> Open`.

use serde::Serialize;
use shared::domain::ElementId;
use tracing::{debug, warn};

use crate::{
    focus_trap::FocusTrap,
    port::{PresentationPort, Scheduler},
    scroll_lock::LockOwner,
    surface::Surface,
    timers::TimerKind,
};

const LINK_STAGGER_MS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MenuState {
    pub is_open: bool,
    /// Offset captured on open, consumed on close.
    pub saved_scroll_offset: Option<f64>,
}

#[derive(Debug)]
pub(crate) struct NavMenu {
    toggle: ElementId,
    menu: ElementId,
    links: Vec<ElementId>,
    state: MenuState,
    is_mobile: bool,
    backdrop: Option<ElementId>,
    fading_backdrop: Option<ElementId>,
    backdrop_fade_in_pending: bool,
    trap: Option<FocusTrap>,
}

impl NavMenu {
    pub(crate) fn new(toggle: ElementId, menu: ElementId, links: Vec<ElementId>, is_mobile: bool) -> Self {
        Self {
            toggle,
            menu,
            links,
            state: MenuState::default(),
            is_mobile,
            backdrop: None,
            fading_backdrop: None,
            backdrop_fade_in_pending: false,
            trap: None,
        }
    }

    pub(crate) fn state(&self) -> &MenuState {
        &self.state
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub(crate) fn toggle_element(&self) -> ElementId {
        self.toggle
    }

    pub(crate) fn backdrop(&self) -> Option<ElementId> {
        self.backdrop
    }

    pub(crate) fn is_on_toggle<P: PresentationPort>(&self, port: &P, target: ElementId) -> bool {
        port.contains(self.toggle, target)
    }

    pub(crate) fn is_inside<P: PresentationPort>(&self, port: &P, target: ElementId) -> bool {
        port.contains(self.menu, target)
    }

    pub(crate) fn is_menu_link<P: PresentationPort>(&self, port: &P, target: ElementId) -> bool {
        self.links.iter().any(|link| port.contains(*link, target))
    }

    pub(crate) fn toggle<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        if self.state.is_open {
            self.close(surface);
        } else {
            self.open(surface);
        }
    }

    pub(crate) fn open<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> bool {
        if self.state.is_open {
            return false;
        }
        self.state.is_open = true;
        surface.port.set_class(self.menu, "active", true);
        surface.port.set_class(self.toggle, "active", true);
        surface
            .port
            .set_attribute(self.toggle, "aria-expanded", Some("true"));

        let offset = surface.acquire_scroll_lock(LockOwner::Menu);
        self.state.saved_scroll_offset = Some(offset);

        self.replace_backdrop(surface);

        for (index, link) in self.links.iter().enumerate() {
            let delay = format!("{}ms", index * LINK_STAGGER_MS);
            surface
                .port
                .set_style(*link, "animation-delay", Some(&delay));
            surface.port.set_class(*link, "slide-in", true);
        }

        self.trap = FocusTrap::new(surface.port.focusable_within(self.menu));
        if let Some(trap) = &self.trap {
            surface.port.focus(trap.first());
        }

        debug!(offset, links = self.links.len(), "menu: opened");
        true
    }

    pub(crate) fn close<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> bool {
        if !self.state.is_open {
            return false;
        }
        self.state.is_open = false;
        surface.port.set_class(self.menu, "active", false);
        surface.port.set_class(self.toggle, "active", false);
        surface
            .port
            .set_attribute(self.toggle, "aria-expanded", Some("false"));

        surface.release_scroll_lock(LockOwner::Menu);
        let restored = self.state.saved_scroll_offset.take();

        self.fade_out_backdrop(surface);

        for link in &self.links {
            surface.port.set_class(*link, "slide-in", false);
            surface.port.set_style(*link, "animation-delay", None);
        }

        self.trap = None;
        debug!(?restored, "menu: closed");
        true
    }

    /// Fallback toggle used when full setup failed: classes only.
    pub(crate) fn toggle_classes_only<P: PresentationPort>(port: &mut P, toggle: ElementId, menu: ElementId) {
        let open = !port.has_class(menu, "active");
        port.set_class(menu, "active", open);
        port.set_class(toggle, "active", open);
    }

    pub(crate) fn on_resize<P: PresentationPort, S: Scheduler>(
        &mut self,
        surface: &mut Surface<P, S>,
        width: f64,
    ) -> bool {
        let was_mobile = self.is_mobile;
        self.is_mobile = !surface.config.is_desktop_width(width);
        if was_mobile && !self.is_mobile && self.state.is_open {
            debug!(width, "menu: viewport crossed desktop breakpoint");
            return self.close(surface);
        }
        false
    }

    pub(crate) fn trap_tab(&self, active: Option<ElementId>, shift: bool) -> Option<ElementId> {
        self.trap.as_ref()?.next_focus(active, shift)
    }

    pub(crate) fn take_backdrop_fade_in(&mut self) -> Option<ElementId> {
        if !self.backdrop_fade_in_pending {
            return None;
        }
        self.backdrop_fade_in_pending = false;
        self.backdrop
    }

    pub(crate) fn on_backdrop_removal<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        if let Some(fading) = self.fading_backdrop.take() {
            surface.port.remove_element(fading);
            debug!(backdrop = fading.0, "menu: backdrop removed");
        }
    }

    /// Drops any live or fading backdrop immediately (teardown, reopen).
    pub(crate) fn discard_backdrops<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        surface.disarm(TimerKind::BackdropRemoval);
        for backdrop in [self.fading_backdrop.take(), self.backdrop.take()]
            .into_iter()
            .flatten()
        {
            surface.port.remove_element(backdrop);
        }
        self.backdrop_fade_in_pending = false;
    }

    fn replace_backdrop<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        self.discard_backdrops(surface);
        match surface.port.insert_backdrop() {
            Ok(backdrop) => {
                surface.port.set_style(backdrop, "opacity", Some("0"));
                self.backdrop = Some(backdrop);
                self.backdrop_fade_in_pending = true;
                surface.scheduler.request_frame();
            }
            Err(err) => warn!("menu: backdrop could not be inserted: {err}"),
        }
    }

    fn fade_out_backdrop<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) {
        let Some(backdrop) = self.backdrop.take() else {
            return;
        };
        self.backdrop_fade_in_pending = false;
        if let Some(stale) = self.fading_backdrop.replace(backdrop) {
            surface.port.remove_element(stale);
        }
        surface.port.set_style(backdrop, "opacity", Some("0"));
        let fade_ms = surface.config.backdrop_fade_ms;
        surface.arm(TimerKind::BackdropRemoval, fade_ms);
    }
}
