use super::*;

#[test]
fn first_owner_engages_and_saves_offset() {
    let mut lock = ScrollLock::default();
    assert_eq!(
        lock.acquire(LockOwner::Menu, 420.0),
        LockChange::Engaged { offset: 420.0 }
    );
    assert!(lock.is_locked());
    assert_eq!(lock.saved_offset(), 420.0);
}

#[test]
fn second_owner_joins_without_overwriting_offset() {
    let mut lock = ScrollLock::default();
    lock.acquire(LockOwner::Menu, 420.0);
    assert_eq!(lock.acquire(LockOwner::Modal, 0.0), LockChange::Joined);
    assert_eq!(lock.saved_offset(), 420.0);
    assert_eq!(lock.release(LockOwner::Modal), LockChange::Held);
}

#[test]
fn releasing_one_of_two_owners_keeps_the_page_locked() {
    let mut lock = ScrollLock::default();
    lock.acquire(LockOwner::Menu, 120.0);
    lock.acquire(LockOwner::Modal, 0.0);

    assert_eq!(lock.release(LockOwner::Menu), LockChange::Held);
    assert!(lock.is_locked());
    assert_eq!(lock.release(LockOwner::Menu), LockChange::NotHeld);

    assert_eq!(
        lock.release(LockOwner::Modal),
        LockChange::Released { restore_to: 120.0 }
    );
    assert!(!lock.is_locked());
    assert_eq!(lock.release(LockOwner::Modal), LockChange::NotHeld);
}

#[test]
fn reacquiring_by_same_owner_is_a_no_op() {
    let mut lock = ScrollLock::default();
    lock.acquire(LockOwner::Modal, 10.0);
    assert_eq!(lock.acquire(LockOwner::Modal, 99.0), LockChange::Held);
    assert_eq!(
        lock.release(LockOwner::Modal),
        LockChange::Released { restore_to: 10.0 }
    );
}
