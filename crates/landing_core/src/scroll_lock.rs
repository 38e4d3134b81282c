//! Page scroll lock shared by the navigation menu and the modal dialog.
//!
//! Owners are tracked explicitly: the lock engages when the first owner
//! acquires it and only releases when the last owner lets go.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LockOwner {
    Menu,
    Modal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LockChange {
    /// First owner; the page must be locked at `offset`.
    Engaged { offset: f64 },
    /// Another owner already locked the page.
    Joined,
    /// No visible change: the owner already held it, or others still do.
    Held,
    /// Last owner left; scrolling resumes and the page returns to `restore_to`.
    Released { restore_to: f64 },
    NotHeld,
}

#[derive(Debug, Default)]
pub struct ScrollLock {
    owners: Vec<LockOwner>,
    saved_offset: f64,
}

impl ScrollLock {
    pub fn acquire(&mut self, owner: LockOwner, current_offset: f64) -> LockChange {
        if self.owners.contains(&owner) {
            return LockChange::Held;
        }
        let was_unlocked = self.owners.is_empty();
        self.owners.push(owner);
        if was_unlocked {
            self.saved_offset = current_offset;
            LockChange::Engaged {
                offset: current_offset,
            }
        } else {
            LockChange::Joined
        }
    }

    pub fn release(&mut self, owner: LockOwner) -> LockChange {
        let Some(position) = self.owners.iter().position(|held| *held == owner) else {
            return LockChange::NotHeld;
        };
        self.owners.remove(position);
        if self.owners.is_empty() {
            LockChange::Released {
                restore_to: self.saved_offset,
            }
        } else {
            LockChange::Held
        }
    }

    pub fn is_locked(&self) -> bool {
        !self.owners.is_empty()
    }

    pub fn saved_offset(&self) -> f64 {
        self.saved_offset
    }
}

#[cfg(test)]
#[path = "tests/scroll_lock_tests.rs"]
mod tests;
