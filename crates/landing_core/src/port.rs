//! Ports between the controller and whatever renders the page.
//!
//! The controller never touches a document directly. Hosts implement
//! [`PresentationPort`] for element lookups and mutations and [`Scheduler`]
//! for timers and animation frames, then feed the resulting callbacks back in
//! as [`crate::events::UiEvent`]s.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use shared::domain::{AnimationKind, CtaAction, ElementId, Region, TimerToken};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PortError(pub String);

impl PortError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

pub type PortResult<T> = Result<T, PortError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverKind {
    /// One-shot reveal of `[data-animate]` elements.
    Reveal,
    /// Watches the hero landmark to drive the header presentation.
    Landmark,
}

/// An element tagged for reveal in static markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimatedMarkup {
    pub element: ElementId,
    pub kind: AnimationKind,
    pub delay_ms: Option<u32>,
}

pub trait PresentationPort {
    fn region(&self, region: Region) -> Option<ElementId>;
    fn element_by_dom_id(&self, dom_id: &str) -> Option<ElementId>;
    fn animated_elements(&self) -> Vec<AnimatedMarkup>;
    /// Links inside the navigation menu, in document order.
    fn menu_links(&self, menu: ElementId) -> Vec<ElementId>;
    /// Keyboard-focusable descendants of `container`, in document order.
    fn focusable_within(&self, container: ElementId) -> Vec<ElementId>;
    /// True when `target` is `container` or one of its descendants.
    fn contains(&self, container: ElementId, target: ElementId) -> bool;
    fn has_class(&self, element: ElementId, class: &str) -> bool;
    /// `href` of the closest link enclosing `target`.
    fn anchor_href(&self, target: ElementId) -> Option<String>;
    /// CTA action of the closest `*-cta` control enclosing `target`.
    fn cta_action(&self, target: ElementId) -> Option<CtaAction>;
    fn active_element(&self) -> Option<ElementId>;
    fn field_value(&self, element: ElementId) -> String;
    fn scroll_offset(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
    /// Document-relative top edge of `element`.
    fn offset_top(&self, element: ElementId) -> f64;
    fn offset_height(&self, element: ElementId) -> f64;
    fn supports_smooth_scroll(&self) -> bool;

    fn set_class(&mut self, element: ElementId, class: &str, on: bool);
    /// `None` removes the inline property.
    fn set_style(&mut self, element: ElementId, property: &str, value: Option<&str>);
    fn set_attribute(&mut self, element: ElementId, name: &str, value: Option<&str>);
    fn set_text(&mut self, element: ElementId, text: &str);
    fn focus(&mut self, element: ElementId);
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);
    fn reset_form(&mut self, form: ElementId);
    /// Appends a dismissible menu backdrop layer to the body.
    fn insert_backdrop(&mut self) -> PortResult<ElementId>;
    /// Inserts an inline error message right after `anchor`.
    fn insert_form_error(&mut self, anchor: ElementId, message: &str) -> PortResult<ElementId>;
    fn remove_element(&mut self, element: ElementId);
    /// Opens `url` in a new browsing context. Returns false when blocked.
    fn open_external(&mut self, url: &str, features: &str) -> bool;
    fn observe(&mut self, observer: ObserverKind, element: ElementId) -> PortResult<()>;
    fn unobserve(&mut self, observer: ObserverKind, element: ElementId);
    fn disconnect(&mut self, observer: ObserverKind);
}

/// Fire-and-forget timers and animation frames.
///
/// A scheduled token comes back as `UiEvent::TimerFired`; a requested frame
/// as `UiEvent::AnimationFrame`. Cancelling an unknown token is a no-op.
pub trait Scheduler {
    fn schedule(&mut self, token: TimerToken, delay: Duration);
    fn cancel(&mut self, token: TimerToken);
    fn request_frame(&mut self);
}
