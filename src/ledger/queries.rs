//! Point-in-time and range lookups

use crate::error::{LedgerError, LedgerResult};
use crate::types::{CallContext, Snapshot, SnapshotMetadata, Tick};

use super::access::can_read;
use super::state::LedgerState;
use super::SnapshotLedger;

pub(crate) fn ensure_readable(
    ledger: &SnapshotLedger,
    state: &LedgerState,
    ctx: &CallContext,
    key: &str,
) -> LedgerResult<()> {
    if can_read(&ledger.config, state, &ctx.caller, key) {
        Ok(())
    } else {
        Err(LedgerError::not_authorized(&ctx.caller, "read", key))
    }
}

/// Only enforced when the ledger is configured to reject future ticks
pub(crate) fn check_not_future(
    ledger: &SnapshotLedger,
    state: &LedgerState,
    tick: Tick,
) -> LedgerResult<()> {
    if ledger.config.reject_future_ticks && tick > state.current_tick {
        return Err(LedgerError::FutureTick {
            tick,
            current: state.current_tick,
        });
    }
    Ok(())
}

pub(crate) fn check_range(
    ledger: &SnapshotLedger,
    state: &LedgerState,
    start: Tick,
    end: Tick,
) -> LedgerResult<()> {
    if start > end {
        return Err(LedgerError::InvalidRange { start, end });
    }
    check_not_future(ledger, state, end)
}

/// Exact lookup at `tick`
pub fn get_at(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    tick: Tick,
) -> LedgerResult<Snapshot> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_not_future(ledger, &state, tick)?;

    state
        .keys
        .get(key)
        .and_then(|k| k.value_at(tick))
        .map(|value| Snapshot::new(key, tick, value))
        .ok_or_else(|| LedgerError::not_found(key))
}

/// Snapshot at the latest pointer
pub fn get_latest(ledger: &SnapshotLedger, ctx: &CallContext, key: &str) -> LedgerResult<Snapshot> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;

    state
        .keys
        .get(key)
        .and_then(|k| k.latest.and_then(|tick| k.value_at(tick).map(|v| (tick, v))))
        .map(|(tick, value)| Snapshot::new(key, tick, value))
        .ok_or_else(|| LedgerError::not_found(key))
}

/// Snapshot at the greatest tick <= `target`
pub fn get_at_or_before(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    target: Tick,
) -> LedgerResult<Snapshot> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_not_future(ledger, &state, target)?;

    state
        .keys
        .get(key)
        .and_then(|k| k.predecessor(target))
        .map(|(tick, value)| Snapshot::new(key, tick, value))
        .ok_or_else(|| LedgerError::not_found(key))
}

/// All snapshots with tick in [start, end], ascending
pub fn get_range(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    start: Tick,
    end: Tick,
) -> LedgerResult<Vec<Snapshot>> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_range(ledger, &state, start, end)?;

    Ok(state
        .keys
        .get(key)
        .map(|k| {
            k.range(start, end)
                .map(|(tick, value)| Snapshot::new(key, tick, value))
                .collect()
        })
        .unwrap_or_default())
}

/// Metadata attached at exactly `tick`
pub fn get_snapshot_metadata(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    tick: Tick,
) -> LedgerResult<SnapshotMetadata> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;

    state
        .keys
        .get(key)
        .and_then(|k| k.metadata.get(&tick))
        .cloned()
        .ok_or_else(|| LedgerError::not_found(key))
}

/// Every tick holding a snapshot, ascending
pub fn get_timeline(ledger: &SnapshotLedger, ctx: &CallContext, key: &str) -> LedgerResult<Vec<Tick>> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;

    Ok(state
        .keys
        .get(key)
        .map(|k| k.timeline.iter().collect())
        .unwrap_or_default())
}
