//! Owner administration and global getters

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{CallContext, LedgerStatus};

use super::{check_tick, SnapshotLedger};

fn ensure_owner(ledger: &SnapshotLedger, ctx: &CallContext, action: &'static str) -> LedgerResult<()> {
    if ledger.config.is_owner(&ctx.caller) {
        Ok(())
    } else {
        Err(LedgerError::not_authorized(&ctx.caller, action, "*"))
    }
}

/// Gate (or re-open) every snapshot write
pub fn set_paused(ledger: &SnapshotLedger, ctx: &CallContext, paused: bool) -> LedgerResult<bool> {
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    ensure_owner(ledger, ctx, "pause")?;

    state.current_tick = ctx.tick;
    state.paused = paused;
    info!(paused, tick = ctx.tick, "pause flag changed");
    Ok(paused)
}

/// Fee charged per snapshot write, paid to the owner
pub fn set_fee(ledger: &SnapshotLedger, ctx: &CallContext, fee: u64) -> LedgerResult<u64> {
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    ensure_owner(ledger, ctx, "set the fee of")?;

    state.current_tick = ctx.tick;
    state.snapshot_fee = fee;
    info!(fee, tick = ctx.tick, "snapshot fee changed");
    Ok(fee)
}

pub fn status(ledger: &SnapshotLedger) -> LedgerStatus {
    let state = ledger.state.read();
    LedgerStatus {
        total_snapshots: state.total_snapshots,
        event_counter: state.audit.counter(),
        paused: state.paused,
        snapshot_fee: state.snapshot_fee,
        current_tick: state.current_tick,
        owner: ledger.config.owner.clone(),
    }
}
