//! Stable ids for live DOM elements.

use std::collections::HashMap;

use shared::domain::ElementId;
use tracing::debug;
use web_sys::Element;

pub(crate) const ID_ATTRIBUTE: &str = "data-landing-id";

/// Entries kept before the first sweep for detached elements.
const MIN_SWEEP_AT: usize = 64;

/// What the registry needs from a node: somewhere to keep its id, and whether
/// it is still in the document.
pub(crate) trait Tagged: Clone {
    fn tag(&self) -> Option<u64>;
    fn set_tag(&self, id: u64);
    fn is_connected(&self) -> bool;
}

impl Tagged for Element {
    fn tag(&self) -> Option<u64> {
        self.get_attribute(ID_ATTRIBUTE)
            .and_then(|raw| raw.parse().ok())
    }

    fn set_tag(&self, id: u64) {
        if let Err(err) = self.set_attribute(ID_ATTRIBUTE, &id.to_string()) {
            debug!(?err, "dom: could not tag element");
        }
    }

    fn is_connected(&self) -> bool {
        web_sys::Node::is_connected(self)
    }
}

/// Maps live elements to stable ids. Each interned element carries its id in
/// a data attribute so repeat lookups resolve to the same id. Entries whose
/// element has left the document are swept once the map doubles in size.
pub(crate) struct ElementRegistry<E> {
    next_id: u64,
    elements: HashMap<ElementId, E>,
    sweep_at: usize,
}

impl<E> Default for ElementRegistry<E> {
    fn default() -> Self {
        Self {
            next_id: 0,
            elements: HashMap::new(),
            sweep_at: MIN_SWEEP_AT,
        }
    }
}

impl<E: Tagged> ElementRegistry<E> {
    pub(crate) fn intern(&mut self, element: &E) -> ElementId {
        let existing = element
            .tag()
            .map(ElementId)
            .filter(|id| self.elements.contains_key(id));
        if let Some(id) = existing {
            return id;
        }
        if self.elements.len() >= self.sweep_at {
            self.sweep();
        }
        self.next_id += 1;
        let id = ElementId(self.next_id);
        element.set_tag(id.0);
        self.elements.insert(id, element.clone());
        id
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<E> {
        self.elements.get(&id).cloned()
    }

    pub(crate) fn forget(&mut self, id: ElementId) {
        self.elements.remove(&id);
    }

    fn sweep(&mut self) {
        let before = self.elements.len();
        self.elements.retain(|_, element| element.is_connected());
        self.sweep_at = (self.elements.len() * 2).max(MIN_SWEEP_AT);
        debug!(
            dropped = before - self.elements.len(),
            kept = self.elements.len(),
            "dom: detached elements swept"
        );
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
