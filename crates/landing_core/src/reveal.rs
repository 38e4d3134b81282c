//! Scroll-triggered reveal of `[data-animate]` elements and the header's
//! top/scrolled presentation.

use std::collections::HashMap;

use serde::Serialize;
use shared::domain::{AnimationKind, ElementId};
use tracing::debug;

use crate::{
    port::{AnimatedMarkup, ObserverKind, PortResult, PresentationPort, Scheduler},
    surface::Surface,
    timers::TimerKind,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnimatedElement {
    pub element: ElementId,
    pub kind: AnimationKind,
    pub delay_ms: u32,
    pub has_played: bool,
    pub ripple: bool,
}

#[derive(Debug, Default)]
pub(crate) struct RevealRegistry {
    items: Vec<AnimatedElement>,
    index: HashMap<ElementId, usize>,
    reveal_order: Vec<ElementId>,
}

impl RevealRegistry {
    pub(crate) fn items(&self) -> &[AnimatedElement] {
        &self.items
    }

    pub(crate) fn reveal_order(&self) -> &[ElementId] {
        &self.reveal_order
    }

    pub(crate) fn register<P: PresentationPort, S: Scheduler>(
        &mut self,
        surface: &mut Surface<P, S>,
        markup: AnimatedMarkup,
    ) -> PortResult<()> {
        if self.index.contains_key(&markup.element) {
            return Ok(());
        }
        let element = markup.element;
        surface
            .port
            .set_class(element, &markup.kind.class_name(), true);
        let delay_ms = markup.delay_ms.unwrap_or(0);
        if delay_ms > 0 {
            let delay = format!("{delay_ms}ms");
            surface
                .port
                .set_style(element, "transition-delay", Some(&delay));
            surface
                .port
                .set_style(element, "animation-delay", Some(&delay));
        }
        let ripple = surface
            .config
            .ripple_classes
            .iter()
            .any(|class| surface.port.has_class(element, class));

        if let Err(err) = surface.port.observe(ObserverKind::Reveal, element) {
            strip_markup(surface, element, &markup.kind);
            return Err(err);
        }

        self.index.insert(element, self.items.len());
        self.items.push(AnimatedElement {
            element,
            kind: markup.kind,
            delay_ms,
            has_played: false,
            ripple,
        });
        Ok(())
    }

    pub(crate) fn is_registered(&self, element: ElementId) -> bool {
        self.index.contains_key(&element)
    }

    /// Reveals `element` on its first intersection. Returns true only for
    /// that first reveal; later intersections are ignored.
    pub(crate) fn on_intersection<P: PresentationPort, S: Scheduler>(
        &mut self,
        surface: &mut Surface<P, S>,
        element: ElementId,
        is_intersecting: bool,
    ) -> bool {
        if !is_intersecting {
            return false;
        }
        let Some(item) = self
            .index
            .get(&element)
            .and_then(|position| self.items.get_mut(*position))
        else {
            return false;
        };
        if item.has_played {
            return false;
        }
        item.has_played = true;
        surface.port.set_class(element, "visible", true);
        surface.port.unobserve(ObserverKind::Reveal, element);
        if item.ripple {
            surface
                .port
                .set_style(element, "transform", Some("scale(1.02)"));
            surface
                .port
                .set_style(element, "transition", Some("transform 0.3s ease-out"));
            let ripple_ms = surface.config.ripple_ms;
            surface.arm(TimerKind::RippleSettle(element), ripple_ms);
        }
        self.reveal_order.push(element);
        debug!(element = element.0, kind = item.kind.tag(), "reveal: played");
        true
    }

    pub(crate) fn on_transition_end<P: PresentationPort, S: Scheduler>(
        &self,
        surface: &mut Surface<P, S>,
        element: ElementId,
    ) {
        let played = self
            .index
            .get(&element)
            .and_then(|position| self.items.get(*position))
            .is_some_and(|item| item.has_played);
        if played {
            surface.port.set_class(element, "animation-complete", true);
        }
    }

    pub(crate) fn on_ripple_settle<P: PresentationPort, S: Scheduler>(
        &self,
        surface: &mut Surface<P, S>,
        element: ElementId,
    ) {
        surface.port.set_style(element, "transform", Some("scale(1)"));
    }

    /// Drops the hidden pre-reveal presentation from every item that has not
    /// played, so content stays readable once nothing will reveal it.
    pub(crate) fn release_unplayed<P: PresentationPort, S: Scheduler>(
        &self,
        surface: &mut Surface<P, S>,
    ) -> usize {
        let mut released = 0;
        for item in self.items.iter().filter(|item| !item.has_played) {
            strip_markup(surface, item.element, &item.kind);
            released += 1;
        }
        if released > 0 {
            debug!(released, "reveal: unplayed items released");
        }
        released
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.index.clear();
        self.reveal_order.clear();
    }
}

fn strip_markup<P: PresentationPort, S: Scheduler>(
    surface: &mut Surface<P, S>,
    element: ElementId,
    kind: &AnimationKind,
) {
    surface.port.set_class(element, &kind.class_name(), false);
    surface.port.set_style(element, "transition-delay", None);
    surface.port.set_style(element, "animation-delay", None);
}

/// Header carries `scrolled` once the hero landmark leaves the viewport.
#[derive(Debug)]
pub(crate) struct HeaderShrink {
    header: ElementId,
    landmark: ElementId,
    scrolled: bool,
}

impl HeaderShrink {
    pub(crate) fn new(header: ElementId, landmark: ElementId) -> Self {
        Self {
            header,
            landmark,
            scrolled: false,
        }
    }

    pub(crate) fn landmark(&self) -> ElementId {
        self.landmark
    }

    pub(crate) fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    pub(crate) fn on_intersection<P: PresentationPort, S: Scheduler>(
        &mut self,
        surface: &mut Surface<P, S>,
        is_intersecting: bool,
    ) {
        let scrolled = !is_intersecting;
        surface.port.set_class(self.header, "scrolled", scrolled);
        if scrolled != self.scrolled {
            debug!(scrolled, "header: presentation changed");
        }
        self.scrolled = scrolled;
    }
}
