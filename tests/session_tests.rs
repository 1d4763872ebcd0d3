use broadside::{GameError, SessionDirectory, SessionId, Slot};

#[test]
fn test_assigns_slots_in_arrival_order() {
    let mut directory = SessionDirectory::new();
    assert_eq!(directory.assign(SessionId(10)), Ok(Slot::One));
    assert_eq!(directory.assign(SessionId(11)), Ok(Slot::Two));
    assert!(directory.is_full());
}

#[test]
fn test_third_connection_rejected() {
    let mut directory = SessionDirectory::new();
    directory.assign(SessionId(1)).unwrap();
    directory.assign(SessionId(2)).unwrap();
    assert_eq!(directory.assign(SessionId(3)), Err(GameError::MatchFull));
    // existing mappings untouched
    assert_eq!(directory.resolve(SessionId(1)), Some(Slot::One));
    assert_eq!(directory.resolve(SessionId(2)), Some(Slot::Two));
    assert_eq!(directory.resolve(SessionId(3)), None);
}

#[test]
fn test_resolve_both_directions() {
    let mut directory = SessionDirectory::new();
    directory.assign(SessionId(7)).unwrap();
    assert_eq!(directory.resolve(SessionId(7)), Some(Slot::One));
    assert_eq!(directory.reverse_resolve(Slot::One), Some(SessionId(7)));
    assert_eq!(directory.reverse_resolve(Slot::Two), None);
}

#[test]
fn test_release_is_idempotent() {
    let mut directory = SessionDirectory::new();
    directory.assign(SessionId(1)).unwrap();
    assert_eq!(directory.release(SessionId(1)), Some(Slot::One));
    assert_eq!(directory.release(SessionId(1)), None);
    assert_eq!(directory.occupied(), 0);
}

#[test]
fn test_freed_slot_is_reassigned_first() {
    let mut directory = SessionDirectory::new();
    directory.assign(SessionId(1)).unwrap();
    directory.assign(SessionId(2)).unwrap();
    directory.release(SessionId(1));
    // slot 1 is free again even though slot 2 is still held
    assert_eq!(directory.assign(SessionId(3)), Ok(Slot::One));
    assert_eq!(directory.reverse_resolve(Slot::Two), Some(SessionId(2)));
}
