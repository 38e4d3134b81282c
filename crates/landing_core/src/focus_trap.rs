use shared::domain::ElementId;

/// Keeps Tab / Shift+Tab cycling inside one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusTrap {
    focusable: Vec<ElementId>,
}

impl FocusTrap {
    /// `None` when the container has nothing focusable.
    pub fn new(focusable: Vec<ElementId>) -> Option<Self> {
        if focusable.is_empty() {
            return None;
        }
        Some(Self { focusable })
    }

    pub fn first(&self) -> ElementId {
        self.focusable[0]
    }

    pub fn last(&self) -> ElementId {
        self.focusable[self.focusable.len() - 1]
    }

    /// Where focus must move for a Tab press, or `None` to let the browser
    /// handle it. Focus that has escaped the trap is pulled back in.
    pub fn next_focus(&self, active: Option<ElementId>, shift: bool) -> Option<ElementId> {
        let inside = active.is_some_and(|element| self.focusable.contains(&element));
        if !inside {
            return Some(if shift { self.last() } else { self.first() });
        }
        match (shift, active) {
            (true, Some(element)) if element == self.first() => Some(self.last()),
            (false, Some(element)) if element == self.last() => Some(self.first()),
            _ => None,
        }
    }
}
