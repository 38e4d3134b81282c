//! DOM event listeners feeding the dispatcher.

use shared::domain::Region;
use tracing::{debug, warn};
use wasm_bindgen::{prelude::Closure, JsCast, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, ErrorEvent, Event, EventTarget, KeyboardEvent,
    Node, Window,
};

use crate::app::{self, DomInput};

type Listener = Closure<dyn FnMut(Event)>;

struct Binding {
    target: EventTarget,
    event: &'static str,
    listener: Listener,
}

/// Every listener installed for one mount; detaching removes them all.
pub(crate) struct Bindings {
    installed: Vec<Binding>,
}

impl Bindings {
    pub(crate) fn install(window: &Window, document: &Document) -> Result<Self, JsValue> {
        let mut bindings = Self {
            installed: Vec::new(),
        };
        let document_target: &EventTarget = document.as_ref();
        let window_target: &EventTarget = window.as_ref();

        bindings.listen(document_target, "click", false, |event| {
            if let Some(target) = target_element(&event) {
                apply_outcome(&event, app::dispatch(DomInput::Click(target)));
            }
        })?;

        bindings.listen(document_target, "keydown", false, |event| {
            let Some(keyboard) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let input = DomInput::KeyDown {
                key: keyboard.key(),
                shift: keyboard.shift_key(),
                target: target_element(&event),
            };
            apply_outcome(&event, app::dispatch(input));
        })?;

        match document.query_selector(Region::JoinForm.selector()).ok().flatten() {
            Some(form) => {
                bindings.listen(form.as_ref(), "submit", false, |event| {
                    apply_outcome(&event, app::dispatch(DomInput::Submit));
                })?;
            }
            None => debug!("bindings: no join form to bind"),
        }

        bindings.listen(document_target, "transitionend", false, |event| {
            if let Some(target) = target_element(&event) {
                app::dispatch(DomInput::TransitionEnd(target));
            }
        })?;

        match document.query_selector(Region::NavToggle.selector()).ok().flatten() {
            Some(toggle) => {
                bindings.listen(toggle.as_ref(), "touchstart", true, |event| {
                    if let Some(target) = target_element(&event) {
                        app::dispatch(DomInput::TouchStart(target));
                    }
                })?;
                bindings.listen(toggle.as_ref(), "touchend", true, |event| {
                    if let Some(target) = target_element(&event) {
                        app::dispatch(DomInput::TouchEnd(target));
                    }
                })?;
            }
            None => debug!("bindings: no navigation toggle for touch feedback"),
        }

        bindings.listen(window_target, "resize", true, |_| {
            app::dispatch(DomInput::Resize);
        })?;

        bindings.listen(window_target, "orientationchange", false, |_| {
            app::dispatch(DomInput::OrientationChange);
        })?;

        let visibility_document = document.clone();
        bindings.listen(document_target, "visibilitychange", false, move |_| {
            app::dispatch(DomInput::Visibility {
                hidden: visibility_document.hidden(),
            });
        })?;

        bindings.listen(window_target, "error", false, |event| {
            let message = event
                .dyn_ref::<ErrorEvent>()
                .map(ErrorEvent::message)
                .unwrap_or_else(|| "unknown error".to_string());
            app::dispatch(DomInput::RuntimeError(message));
        })?;

        debug!(listeners = bindings.installed.len(), "bindings: installed");
        Ok(bindings)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        event: &'static str,
        passive: bool,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<(), JsValue> {
        let listener: Listener = Closure::new(handler);
        if passive {
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            target.add_event_listener_with_callback_and_add_event_listener_options(
                event,
                listener.as_ref().unchecked_ref(),
                &options,
            )?;
        } else {
            target.add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())?;
        }
        self.installed.push(Binding {
            target: target.clone(),
            event,
            listener,
        });
        Ok(())
    }

    pub(crate) fn detach(self) {
        for binding in self.installed {
            if let Err(err) = binding.target.remove_event_listener_with_callback(
                binding.event,
                binding.listener.as_ref().unchecked_ref(),
            ) {
                warn!(?err, event = binding.event, "bindings: listener removal failed");
            }
        }
    }
}

fn target_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(element) => Some(element),
        Err(other) => other.dyn_into::<Node>().ok()?.parent_element(),
    }
}

fn apply_outcome(event: &Event, outcome: landing_core::EventOutcome) {
    if outcome.prevent_default {
        event.prevent_default();
    }
    if outcome.stop_propagation {
        event.stop_propagation();
    }
}
