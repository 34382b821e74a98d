use base::Epoch;

#[test]
fn test_epoch_starts_current() {
    let epoch = Epoch::new();
    let value = epoch.current();
    assert!(epoch.is_current(value));
}

#[test]
fn test_advance_invalidates_previous_value() {
    let epoch = Epoch::new();
    let before = epoch.current();
    let after = epoch.advance();

    assert_eq!(after, before + 1);
    assert!(!epoch.is_current(before));
    assert!(epoch.is_current(after));
}

#[test]
fn test_clones_share_the_counter() {
    let epoch = Epoch::new();
    let watcher = epoch.clone();

    epoch.advance();
    epoch.advance();

    assert_eq!(watcher.current(), epoch.current());
}
