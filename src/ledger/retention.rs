//! Retention cleanup

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{CallContext, EventType};
use crate::validation::validate_key;

use super::{check_tick, SnapshotLedger};

/// Owner-only purge of snapshots older than the key's retention window.
///
/// Removes every snapshot with tick < current_tick - retention_ticks and
/// returns how many were removed. A zero window (or an unregistered key)
/// is a no-op.
pub fn cleanup(ledger: &SnapshotLedger, ctx: &CallContext, key: &str) -> LedgerResult<u64> {
    validate_key(key)?;
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    if !ledger.config.is_owner(&ctx.caller) {
        return Err(LedgerError::not_authorized(&ctx.caller, "clean up", key));
    }
    state.current_tick = ctx.tick;

    let retention = match state.settings.get(key) {
        Some(settings) if settings.retention_ticks > 0 => settings.retention_ticks,
        _ => return Ok(0),
    };
    let cutoff = ctx.tick.saturating_sub(retention);

    let removed = state
        .keys
        .get_mut(key)
        .map_or(0, |key_state| key_state.remove_before(cutoff)) as u64;

    if removed > 0 {
        state
            .audit
            .append(EventType::SnapshotsCleaned, key, ctx.tick, removed, &ctx.caller, ctx.timestamp);
        info!(key, cutoff, removed, "retention cleanup");
    }
    Ok(removed)
}
