//! Integration tests for the snapshot ledger

use historical_snapshots::ledger::{LedgerConfig, SnapshotLedger};
use historical_snapshots::types::{BatchItem, CallContext, EventType, Statistics};
use historical_snapshots::LedgerError;

const OWNER: &str = "admin";

fn setup_ledger() -> SnapshotLedger {
    SnapshotLedger::new(LedgerConfig::new(OWNER))
}

fn ctx(caller: &str, tick: u64) -> CallContext {
    CallContext::new(caller, tick)
}

fn stats(sum: u128, avg: u64, min: u64, max: u64, count: u64) -> (u128, u64, u64, u64, u64) {
    (sum, avg, min, max, count)
}

fn fields(s: &Statistics) -> (u128, u64, u64, u64, u64) {
    (s.sum, s.avg, s.min, s.max, s.count)
}

/// "temp" = 100 at tick 10, 200 at tick 20
fn temp_ledger() -> SnapshotLedger {
    let ledger = setup_ledger();
    ledger.store(&ctx("alice", 10), "temp", 100).unwrap();
    ledger.store(&ctx("alice", 20), "temp", 200).unwrap();
    ledger
}

#[test]
fn test_store_and_read_back() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 7);

    let stored = ledger.store(&alice, "price", 42).unwrap();
    assert_eq!((stored.tick, stored.value), (7, 42));

    assert_eq!(ledger.get_at(&alice, "price", 7).unwrap().value, 42);
    let latest = ledger.get_latest(&alice, "price").unwrap();
    assert_eq!((latest.tick, latest.value), (7, 42));
    assert_eq!(ledger.get_timeline(&alice, "price").unwrap(), vec![7]);
    assert_eq!(ledger.get_current_tick(), 7);
}

#[test]
fn test_overwrite_same_tick() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 5);

    ledger.store(&alice, "k", 1).unwrap();
    ledger.store(&alice, "k", 2).unwrap();

    assert_eq!(ledger.get_at(&alice, "k", 5).unwrap().value, 2);
    assert_eq!(ledger.get_total_snapshots(), 2);
    assert_eq!(ledger.get_timeline(&alice, "k").unwrap(), vec![5]);
}

#[test]
fn test_missing_lookups_fail() {
    let ledger = temp_ledger();
    let reader = ctx("bob", 20);

    assert_eq!(
        ledger.get_at(&reader, "temp", 15),
        Err(LedgerError::SnapshotNotFound { key: "temp".to_string() })
    );
    assert!(matches!(
        ledger.get_latest(&reader, "never-written"),
        Err(LedgerError::SnapshotNotFound { .. })
    ));
}

#[test]
fn test_predecessor_search() {
    let ledger = temp_ledger();
    let reader = ctx("bob", 20);

    let found = ledger.get_at_or_before(&reader, "temp", 15).unwrap();
    assert_eq!((found.tick, found.value), (10, 100));

    let exact = ledger.get_at_or_before(&reader, "temp", 20).unwrap();
    assert_eq!(exact.value, 200);

    let far_future = ledger.get_at_or_before(&reader, "temp", 1_000_000).unwrap();
    assert_eq!(far_future.tick, 20);

    assert!(matches!(
        ledger.get_at_or_before(&reader, "temp", 5),
        Err(LedgerError::SnapshotNotFound { .. })
    ));
}

#[test]
fn test_range_listing() {
    let ledger = temp_ledger();
    let reader = ctx("bob", 20);

    let all = ledger.get_range(&reader, "temp", 0, 25).unwrap();
    assert_eq!(all.iter().map(|s| s.tick).collect::<Vec<_>>(), vec![10, 20]);

    let inclusive = ledger.get_range(&reader, "temp", 10, 10).unwrap();
    assert_eq!(inclusive.len(), 1);

    assert_eq!(
        ledger.get_range(&reader, "temp", 25, 0),
        Err(LedgerError::InvalidRange { start: 25, end: 0 })
    );
}

#[test]
fn test_range_aggregation() {
    let ledger = temp_ledger();
    let reader = ctx("bob", 20);

    let full = ledger.calculate_statistics(&reader, "temp", 0, 25).unwrap();
    assert_eq!(fields(&full), stats(300, 150, 100, 200, 2));

    let empty = ledger.calculate_statistics(&reader, "temp", 0, 5).unwrap();
    assert_eq!(fields(&empty), stats(0, 0, 0, 0, 0));

    assert!(matches!(
        ledger.calculate_statistics(&reader, "temp", 9, 3),
        Err(LedgerError::InvalidRange { .. })
    ));
}

#[test]
fn test_cache_coherence_across_ticks() {
    let ledger = temp_ledger();
    let alice = ctx("alice", 20);

    let cached = ledger
        .calculate_and_cache_statistics(&alice, "temp", 0, 25)
        .unwrap();
    assert_eq!(fields(&cached), stats(300, 150, 100, 200, 2));
    assert!(ledger.get_cached_statistics(&alice, "temp", 0, 25).is_ok());

    ledger.store(&alice.at(22), "temp", 50).unwrap();

    let fresh = ledger.get_statistics(&alice.at(22), "temp", 0, 25).unwrap();
    assert_eq!(fields(&fresh), stats(350, 116, 50, 200, 3));

    // The old entry is stale, not silently served
    assert!(matches!(
        ledger.get_cached_statistics(&alice.at(22), "temp", 0, 25),
        Err(LedgerError::SnapshotNotFound { .. })
    ));
}

#[test]
fn test_cache_coherence_within_one_tick() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 30);

    ledger.store(&alice, "k", 10).unwrap();
    ledger.calculate_and_cache_statistics(&alice, "k", 0, 30).unwrap();

    // Overwrite at the same tick must still invalidate
    ledger.store(&alice, "k", 90).unwrap();
    let s = ledger.get_statistics(&alice, "k", 0, 30).unwrap();
    assert_eq!(fields(&s), stats(90, 90, 90, 90, 1));
}

#[test]
fn test_moving_average() {
    let ledger = temp_ledger();
    let reader = ctx("bob", 20);

    assert_eq!(ledger.get_moving_average(&reader, "temp", 15, 10).unwrap(), 150);
    assert_eq!(ledger.get_moving_average(&reader, "temp", 10, 4).unwrap(), 100);
    // Window reaching below tick 0 is clamped
    assert_eq!(ledger.get_moving_average(&reader, "temp", 2, 10).unwrap(), 0);
}

#[test]
fn test_access_control() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);
    let mallory = ctx("mallory", 1);

    ledger.register(&alice, "private", false, false, 0).unwrap();

    assert_eq!(
        ledger.store(&mallory, "private", 1),
        Err(LedgerError::NotAuthorized {
            caller: "mallory".to_string(),
            action: "write",
            key: "private".to_string(),
        })
    );
    assert!(ledger.store(&alice, "private", 1).is_ok());
    assert!(ledger.store(&ctx(OWNER, 1), "private", 2).is_ok());

    // Unregistered keys accept any writer
    assert!(ledger.store(&mallory, "open", 3).is_ok());

    // Reads are gated the same way
    assert!(matches!(
        ledger.get_latest(&mallory, "private"),
        Err(LedgerError::NotAuthorized { .. })
    ));
    assert_eq!(ledger.get_latest(&alice, "private").unwrap().value, 2);
}

#[test]
fn test_public_flags() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);
    let bob = ctx("bob", 1);

    ledger.register(&alice, "board", true, true, 0).unwrap();
    ledger.store(&bob, "board", 5).unwrap();
    assert_eq!(ledger.get_latest(&bob, "board").unwrap().value, 5);
}

#[test]
fn test_grant_and_revoke_writer() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);
    let bob = ctx("bob", 1);

    ledger.register(&alice, "feed", false, false, 0).unwrap();
    ledger.grant_writer(&alice, "feed", "bob").unwrap();
    assert!(ledger.is_writer("feed", "bob"));
    assert!(ledger.store(&bob, "feed", 10).is_ok());

    ledger.revoke_writer(&alice, "feed", "bob").unwrap();
    assert!(!ledger.is_writer("feed", "bob"));
    assert!(matches!(
        ledger.store(&bob, "feed", 11),
        Err(LedgerError::NotAuthorized { .. })
    ));

    // Only the creator manages grants, not even the owner
    assert!(matches!(
        ledger.grant_writer(&ctx(OWNER, 1), "feed", "carol"),
        Err(LedgerError::NotAuthorized { .. })
    ));
    assert!(matches!(
        ledger.grant_writer(&bob, "feed", "bob"),
        Err(LedgerError::NotAuthorized { .. })
    ));
}

#[test]
fn test_revoke_is_idempotent() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);

    ledger.register(&alice, "feed", false, false, 0).unwrap();
    let events_before = ledger.status().event_counter;

    assert!(ledger.revoke_writer(&alice, "feed", "nobody").is_ok());
    assert!(ledger.revoke_writer(&alice, "feed", "nobody").is_ok());
    assert_eq!(ledger.status().event_counter, events_before);
}

#[test]
fn test_batch_is_all_or_nothing() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 3);
    ledger.register(&ctx("carol", 3), "locked", false, false, 0).unwrap();
    let before = ledger.get_total_snapshots();

    let items = vec![
        BatchItem::new("a", 1),
        BatchItem::new("locked", 2),
        BatchItem::new("c", 3),
    ];
    assert!(matches!(
        ledger.batch_store(&alice, &items),
        Err(LedgerError::NotAuthorized { .. })
    ));

    assert_eq!(ledger.get_total_snapshots(), before);
    assert!(ledger.get_latest(&alice, "a").is_err());
    assert!(ledger.get_latest(&alice, "c").is_err());
}

#[test]
fn test_batch_success_and_limits() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 4);

    let items: Vec<BatchItem> = (0..3).map(|i| BatchItem::new(format!("k{}", i), i)).collect();
    let stored = ledger.batch_store(&alice, &items).unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(ledger.get_total_snapshots(), 3);

    let too_many: Vec<BatchItem> = (0..51).map(|i| BatchItem::new("k", i)).collect();
    assert!(matches!(
        ledger.batch_store(&alice, &too_many),
        Err(LedgerError::BatchTooLarge { size: 51, .. })
    ));
    assert!(matches!(
        ledger.batch_store(&alice, &[]),
        Err(LedgerError::BatchTooLarge { size: 0, .. })
    ));
}

#[test]
fn test_input_validation() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);

    assert!(matches!(ledger.store(&alice, "", 1), Err(LedgerError::InvalidKey { .. })));
    let long_key = "x".repeat(65);
    assert!(matches!(ledger.store(&alice, &long_key, 1), Err(LedgerError::InvalidKey { .. })));
    assert!(ledger.store(&alice, &"x".repeat(64), 1).is_ok());

    assert!(matches!(
        ledger.store(&alice, "k", 1_000_000_000_000_000_001),
        Err(LedgerError::ValueTooLarge { .. })
    ));
    assert!(ledger.store(&alice, "k", 1_000_000_000_000_000_000).is_ok());
}

#[test]
fn test_metadata() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 8).with_timestamp(1_700_000_000);

    let stored = ledger
        .store_with_metadata(&alice, "temp", 21, "morning reading", vec!["sensor".to_string()])
        .unwrap();
    assert!(stored.metadata_attached);

    let metadata = ledger.get_snapshot_metadata(&alice, "temp", 8).unwrap();
    assert_eq!(metadata.author, "alice");
    assert_eq!(metadata.timestamp, 1_700_000_000);
    assert_eq!(metadata.tags, vec!["sensor".to_string()]);

    // A plain overwrite drops the metadata
    ledger.store(&alice, "temp", 22).unwrap();
    assert!(ledger.get_snapshot_metadata(&alice, "temp", 8).is_err());

    let tags: Vec<String> = (0..11).map(|i| i.to_string()).collect();
    assert!(matches!(
        ledger.store_with_metadata(&alice, "temp", 1, "", tags),
        Err(LedgerError::InvalidMetadata(_))
    ));
    assert_eq!(ledger.get_latest(&alice, "temp").unwrap().value, 22);
}

#[test]
fn test_pause_blocks_writes_only() {
    let ledger = temp_ledger();
    let owner = ctx(OWNER, 20);

    assert!(matches!(
        ledger.set_paused(&ctx("alice", 20), true),
        Err(LedgerError::NotAuthorized { .. })
    ));
    ledger.set_paused(&owner, true).unwrap();
    assert!(ledger.get_paused());

    assert_eq!(ledger.store(&ctx("alice", 21), "temp", 1), Err(LedgerError::Paused));
    assert_eq!(ledger.get_latest(&owner, "temp").unwrap().value, 200);
    // Registration is not a snapshot write
    assert!(ledger.register(&ctx("alice", 21), "other", true, false, 0).is_ok());

    ledger.set_paused(&owner.at(21), false).unwrap();
    assert!(ledger.store(&ctx("alice", 22), "temp", 1).is_ok());
}

#[test]
fn test_tick_never_moves_backwards() {
    let ledger = temp_ledger();

    assert_eq!(
        ledger.store(&ctx("alice", 19), "temp", 1),
        Err(LedgerError::TickRegression { tick: 19, current: 20 })
    );
    // Reads at an older tick are fine and do not move the clock
    assert!(ledger.get_latest(&ctx("bob", 3), "temp").is_ok());
    assert_eq!(ledger.get_current_tick(), 20);
}

#[test]
fn test_future_ticks_rejected_when_configured() {
    let ledger = SnapshotLedger::new(LedgerConfig::new(OWNER).with_reject_future_ticks(true));
    ledger.store(&ctx("alice", 10), "temp", 100).unwrap();
    let reader = ctx("bob", 10);

    assert_eq!(
        ledger.get_at_or_before(&reader, "temp", 11),
        Err(LedgerError::FutureTick { tick: 11, current: 10 })
    );
    assert!(matches!(
        ledger.get_statistics(&reader, "temp", 0, 50),
        Err(LedgerError::FutureTick { .. })
    ));

    // Default config answers the same query
    let open = temp_ledger();
    assert!(open.get_at_or_before(&reader, "temp", 11).is_ok());
}

#[test]
fn test_closed_unregistered_keys() {
    let ledger = SnapshotLedger::new(LedgerConfig::new(OWNER).with_open_unregistered_keys(false));

    assert!(matches!(
        ledger.store(&ctx("alice", 1), "k", 1),
        Err(LedgerError::NotAuthorized { .. })
    ));
    assert!(ledger.store(&ctx(OWNER, 1), "k", 1).is_ok());
}

#[test]
fn test_re_registration() {
    let ledger = setup_ledger();
    ledger.register(&ctx("alice", 1), "k", false, false, 0).unwrap();

    // Permissive default: creator is reassigned
    ledger.register(&ctx("bob", 2), "k", false, false, 0).unwrap();
    assert_eq!(ledger.get_key_settings("k").unwrap().creator, "bob");

    let hardened = SnapshotLedger::new(LedgerConfig::new(OWNER).with_immutable_creator(true));
    hardened.register(&ctx("alice", 1), "k", false, false, 0).unwrap();
    assert!(matches!(
        hardened.register(&ctx("bob", 2), "k", true, true, 0),
        Err(LedgerError::NotAuthorized { .. })
    ));
    // The creator may still update its own settings
    hardened.register(&ctx("alice", 3), "k", true, false, 0).unwrap();
    assert!(hardened.get_key_settings("k").unwrap().public_read);
}

#[test]
fn test_retention_cleanup() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);
    ledger.register(&alice, "metrics", false, false, 10).unwrap();
    for tick in [1, 5, 12, 18] {
        ledger.store(&alice.at(tick), "metrics", tick * 10).unwrap();
    }

    assert!(matches!(
        ledger.cleanup(&ctx("alice", 20), "metrics"),
        Err(LedgerError::NotAuthorized { .. })
    ));

    // cutoff = 20 - 10: ticks 1 and 5 go
    let removed = ledger.cleanup(&ctx(OWNER, 20), "metrics").unwrap();
    assert_eq!(removed, 2);
    assert_eq!(ledger.get_timeline(&alice, "metrics").unwrap(), vec![12, 18]);
    assert!(ledger.get_at_or_before(&alice, "metrics", 6).is_err());

    let last = ledger.get_latest_events(1);
    assert_eq!(last[0].event_type, EventType::SnapshotsCleaned);
    assert_eq!(last[0].value, 2);

    // Nothing more to remove
    assert_eq!(ledger.cleanup(&ctx(OWNER, 20), "metrics").unwrap(), 0);
}

#[test]
fn test_cleanup_recomputes_latest() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);
    ledger.register(&alice, "k", false, false, 5).unwrap();
    ledger.store(&alice.at(2), "k", 7).unwrap();

    assert_eq!(ledger.cleanup(&ctx(OWNER, 100), "k").unwrap(), 1);
    assert!(matches!(
        ledger.get_latest(&alice.at(100), "k"),
        Err(LedgerError::SnapshotNotFound { .. })
    ));
}

#[test]
fn test_cleanup_without_retention_is_noop() {
    let ledger = temp_ledger();
    assert_eq!(ledger.cleanup(&ctx(OWNER, 500), "temp").unwrap(), 0);
    assert_eq!(ledger.get_timeline(&ctx(OWNER, 500), "temp").unwrap(), vec![10, 20]);
}

#[test]
fn test_audit_log() {
    let ledger = setup_ledger();
    let alice = ctx("alice", 1);

    ledger.register(&alice, "k", true, false, 0).unwrap();
    ledger.grant_writer(&alice, "k", "bob").unwrap();
    ledger.store(&ctx("bob", 2), "k", 9).unwrap();

    assert_eq!(ledger.status().event_counter, 3);
    let first = ledger.get_event(0).unwrap();
    assert_eq!(first.event_type, EventType::KeyRegistered);
    assert_eq!(first.author, "alice");

    let latest = ledger.get_latest_events(2);
    assert_eq!(latest.len(), 2);
    assert_eq!(latest[0].event_type, EventType::WriterGranted);
    assert_eq!(latest[1].event_type, EventType::SnapshotStored);
    assert_eq!((latest[1].tick, latest[1].value), (2, 9));

    assert_eq!(ledger.get_latest_events(100).len(), 3);
    assert!(ledger.get_event(3).is_none());
}

#[test]
fn test_failed_calls_leave_no_trace() {
    let ledger = temp_ledger();
    let status_before = ledger.status();

    let _ = ledger.store(&ctx("alice", 30), "", 1);
    let _ = ledger.store(&ctx("alice", 30), "temp", u64::MAX);
    let _ = ledger.set_fee(&ctx("alice", 30), 5);

    assert_eq!(ledger.status(), status_before);
}

#[test]
fn test_fee_settlement() {
    let ledger = setup_ledger();
    ledger.set_fee(&ctx(OWNER, 1), 10).unwrap();
    assert_eq!(ledger.get_fee(), 10);

    assert_eq!(
        ledger.store(&ctx("alice", 1), "k", 1),
        Err(LedgerError::InsufficientBalance {
            principal: "alice".to_string(),
            balance: 0,
            required: 10,
        })
    );

    ledger.deposit("alice", 25);
    ledger.store(&ctx("alice", 2), "k", 1).unwrap();
    assert_eq!(ledger.balance("alice"), 15);
    assert_eq!(ledger.balance(OWNER), 10);

    // A batch pays for every item up front, or nothing at all
    let items = vec![BatchItem::new("a", 1), BatchItem::new("b", 2)];
    assert!(matches!(
        ledger.batch_store(&ctx("alice", 3), &items),
        Err(LedgerError::InsufficientBalance { required: 20, .. })
    ));
    assert_eq!(ledger.balance("alice"), 15);
    assert_eq!(ledger.get_total_snapshots(), 1);
}
