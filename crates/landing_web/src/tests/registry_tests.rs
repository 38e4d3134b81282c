use std::{cell::Cell, rc::Rc};

use super::*;

#[derive(Clone, Default)]
struct FakeNode {
    tag: Rc<Cell<Option<u64>>>,
    connected: Rc<Cell<bool>>,
}

impl FakeNode {
    fn attached() -> Self {
        let node = Self::default();
        node.connected.set(true);
        node
    }
}

impl Tagged for FakeNode {
    fn tag(&self) -> Option<u64> {
        self.tag.get()
    }

    fn set_tag(&self, id: u64) {
        self.tag.set(Some(id));
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}

#[test]
fn repeat_interning_returns_the_same_id() {
    let mut registry = ElementRegistry::default();
    let node = FakeNode::attached();

    let first = registry.intern(&node);
    assert_eq!(registry.intern(&node.clone()), first);
    assert_eq!(node.tag(), Some(first.0));
    assert_ne!(registry.intern(&FakeNode::attached()), first);
}

#[test]
fn forgotten_element_gets_a_fresh_id() {
    let mut registry = ElementRegistry::default();
    let node = FakeNode::attached();
    let first = registry.intern(&node);

    registry.forget(first);
    assert!(registry.get(first).is_none());
    assert_ne!(registry.intern(&node), first);
}

#[test]
fn detached_elements_are_swept_as_the_map_grows() {
    let mut registry = ElementRegistry::default();
    let kept = FakeNode::attached();
    let kept_id = registry.intern(&kept);

    let detached: Vec<ElementId> = (1..MIN_SWEEP_AT)
        .map(|_| {
            let node = FakeNode::attached();
            let id = registry.intern(&node);
            node.connected.set(false);
            id
        })
        .collect();
    assert!(detached.iter().all(|id| registry.get(*id).is_some()));

    let fresh = registry.intern(&FakeNode::attached());

    assert!(detached.iter().all(|id| registry.get(*id).is_none()));
    assert!(registry.get(kept_id).is_some());
    assert!(registry.get(fresh).is_some());
    assert_eq!(registry.intern(&kept), kept_id);
}
