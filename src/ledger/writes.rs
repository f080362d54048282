//! Snapshot writes: single, with metadata, and batched
//!
//! Every write validates everything first (pause flag, key, value,
//! permission, fee) and only then commits. Commit steps cannot fail, so an
//! error always leaves the ledger untouched and a batch is all-or-nothing.

use tracing::{debug, info};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{BatchItem, CallContext, EventType, Snapshot, SnapshotMetadata, StoredSnapshot};
use crate::validation::{validate_batch_size, validate_key, validate_metadata, validate_value};

use super::access::can_write;
use super::state::LedgerState;
use super::{check_tick, SnapshotLedger};

fn validate_write(
    ledger: &SnapshotLedger,
    state: &LedgerState,
    ctx: &CallContext,
    key: &str,
    value: u64,
) -> LedgerResult<()> {
    if state.paused {
        return Err(LedgerError::Paused);
    }
    validate_key(key)?;
    validate_value(value)?;
    if !can_write(&ledger.config, state, &ctx.caller, key) {
        return Err(LedgerError::not_authorized(&ctx.caller, "write", key));
    }
    Ok(())
}

/// Apply an already validated write
fn commit_write(state: &mut LedgerState, ctx: &CallContext, key: &str, value: u64) -> Snapshot {
    state
        .keys
        .entry(key.to_string())
        .or_default()
        .put(ctx.tick, value);
    state.total_snapshots += 1;
    state.current_tick = ctx.tick;
    state
        .audit
        .append(EventType::SnapshotStored, key, ctx.tick, value, &ctx.caller, ctx.timestamp);
    debug!(key, tick = ctx.tick, value, "snapshot stored");
    Snapshot::new(key, ctx.tick, value)
}

fn charge_fees(ledger: &SnapshotLedger, state: &mut LedgerState, ctx: &CallContext, count: usize) -> LedgerResult<()> {
    let fee = state.snapshot_fee;
    let charged = state
        .balances
        .pay_fees(&ctx.caller, &ledger.config.owner, fee, count)?;
    if charged > 0 {
        debug!(caller = %ctx.caller, charged, "snapshot fees paid");
    }
    Ok(())
}

/// Record `value` for `key` at the caller's tick
pub fn store(ledger: &SnapshotLedger, ctx: &CallContext, key: &str, value: u64) -> LedgerResult<Snapshot> {
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    validate_write(ledger, &state, ctx, key, value)?;
    charge_fees(ledger, &mut state, ctx, 1)?;
    Ok(commit_write(&mut state, ctx, key, value))
}

/// Store and attach metadata as a single unit
pub fn store_with_metadata(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    value: u64,
    description: &str,
    tags: Vec<String>,
) -> LedgerResult<StoredSnapshot> {
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    validate_write(ledger, &state, ctx, key, value)?;
    validate_metadata(description, &tags)?;
    charge_fees(ledger, &mut state, ctx, 1)?;

    let snapshot = commit_write(&mut state, ctx, key, value);
    let metadata = SnapshotMetadata {
        timestamp: ctx.timestamp,
        author: ctx.caller.clone(),
        description: description.to_string(),
        tags,
    };
    if let Some(key_state) = state.keys.get_mut(key) {
        key_state.metadata.insert(ctx.tick, metadata);
    }

    Ok(StoredSnapshot {
        snapshot,
        metadata_attached: true,
    })
}

/// Apply up to 50 writes in order; the first invalid item rejects the batch
pub fn batch_store(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    items: &[BatchItem],
) -> LedgerResult<Vec<Snapshot>> {
    validate_batch_size(items.len())?;

    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    for item in items {
        validate_write(ledger, &state, ctx, &item.key, item.value)?;
    }
    charge_fees(ledger, &mut state, ctx, items.len())?;

    let snapshots: Vec<Snapshot> = items
        .iter()
        .map(|item| commit_write(&mut state, ctx, &item.key, item.value))
        .collect();

    info!(caller = %ctx.caller, tick = ctx.tick, items = snapshots.len(), "batch stored");
    Ok(snapshots)
}
