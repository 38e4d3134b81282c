//! Signup modal: `Closed <-> Open`, with an external-window fallback when the
//! page carries no modal markup.

use serde::Serialize;
use shared::domain::ElementId;
use tracing::{debug, info, warn};

use crate::{
    focus_trap::FocusTrap,
    port::{PresentationPort, Scheduler},
    scroll_lock::LockOwner,
    surface::Surface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModalState {
    pub is_open: bool,
    pub last_focused: Option<ElementId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalOpen {
    Opened,
    AlreadyOpen,
    /// No modal markup; the form was opened in a new browsing context.
    External { opened: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ModalClick {
    /// Close control or bare overlay.
    Dismiss,
    /// Inside the content region; must not reach the overlay.
    Content,
    Elsewhere,
}

#[derive(Debug, Default)]
pub(crate) struct ModalDialog {
    modal: Option<ElementId>,
    overlay: Option<ElementId>,
    close_control: Option<ElementId>,
    content: Option<ElementId>,
    state: ModalState,
    trap: Option<FocusTrap>,
}

impl ModalDialog {
    pub(crate) fn new(
        modal: Option<ElementId>,
        overlay: Option<ElementId>,
        close_control: Option<ElementId>,
        content: Option<ElementId>,
    ) -> Self {
        Self {
            modal,
            overlay,
            close_control,
            content,
            state: ModalState::default(),
            trap: None,
        }
    }

    pub(crate) fn state(&self) -> &ModalState {
        &self.state
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub(crate) fn open<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> ModalOpen {
        let Some(modal) = self.modal else {
            let url = surface.config.external_form_url.clone();
            let features = surface.config.popup_features();
            let opened = surface.port.open_external(&url, &features);
            if !opened {
                warn!(url = %url, "modal: external form window was blocked");
            }
            info!(event = "form_external_open", url = %url, "modal: external form fallback");
            return ModalOpen::External { opened };
        };
        if self.state.is_open {
            return ModalOpen::AlreadyOpen;
        }

        self.state.is_open = true;
        self.state.last_focused = surface.port.active_element();
        surface.port.set_class(modal, "active", true);
        surface.acquire_scroll_lock(LockOwner::Modal);

        self.trap = FocusTrap::new(surface.port.focusable_within(modal));
        let initial_focus = self
            .close_control
            .or_else(|| self.trap.as_ref().map(FocusTrap::first));
        if let Some(target) = initial_focus {
            surface.port.focus(target);
        }

        info!(event = "modal_open", "modal: opened");
        ModalOpen::Opened
    }

    pub(crate) fn close<P: PresentationPort, S: Scheduler>(&mut self, surface: &mut Surface<P, S>) -> bool {
        let Some(modal) = self.modal else {
            return false;
        };
        if !self.state.is_open {
            return false;
        }
        self.state.is_open = false;
        surface.port.set_class(modal, "active", false);
        surface.release_scroll_lock(LockOwner::Modal);
        self.trap = None;
        if let Some(previous) = self.state.last_focused.take() {
            surface.port.focus(previous);
        }
        info!(event = "modal_close", "modal: closed");
        true
    }

    pub(crate) fn classify_click<P: PresentationPort>(&self, port: &P, target: ElementId) -> ModalClick {
        if !self.state.is_open {
            return ModalClick::Elsewhere;
        }
        if self
            .close_control
            .is_some_and(|close| port.contains(close, target))
        {
            return ModalClick::Dismiss;
        }
        if self.content.is_some_and(|content| port.contains(content, target)) {
            debug!(target = target.0, "modal: click stayed inside content");
            return ModalClick::Content;
        }
        if self.overlay.is_some_and(|overlay| port.contains(overlay, target)) {
            return ModalClick::Dismiss;
        }
        ModalClick::Elsewhere
    }

    pub(crate) fn trap_tab(&self, active: Option<ElementId>, shift: bool) -> Option<ElementId> {
        self.trap.as_ref()?.next_focus(active, shift)
    }
}
