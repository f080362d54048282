//! Access control: owner bypass, per-key settings, writer allow-list

use tracing::{info, warn};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{CallContext, EventType, KeySettings};
use crate::validation::validate_key;

use super::config::LedgerConfig;
use super::state::LedgerState;
use super::{check_tick, SnapshotLedger};

/// Owner, or unregistered (when open), or public/creator/granted writer
pub(crate) fn can_write(config: &LedgerConfig, state: &LedgerState, caller: &str, key: &str) -> bool {
    if config.is_owner(caller) {
        return true;
    }
    match state.settings.get(key) {
        None => config.open_unregistered_keys,
        Some(settings) => {
            settings.public_write || settings.creator == caller || state.has_grant(key, caller)
        }
    }
}

/// Same tiers as `can_write`, keyed on `public_read`
pub(crate) fn can_read(config: &LedgerConfig, state: &LedgerState, caller: &str, key: &str) -> bool {
    if config.is_owner(caller) {
        return true;
    }
    match state.settings.get(key) {
        None => config.open_unregistered_keys,
        Some(settings) => {
            settings.public_read || settings.creator == caller || state.has_grant(key, caller)
        }
    }
}

/// Create or overwrite a key's settings with the caller as creator
pub fn register(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    public_read: bool,
    public_write: bool,
    retention_ticks: u64,
) -> LedgerResult<String> {
    validate_key(key)?;
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;

    if let Some(existing) = state.settings.get(key) {
        if existing.creator != ctx.caller {
            if ledger.config.immutable_creator {
                return Err(LedgerError::not_authorized(&ctx.caller, "re-register", key));
            }
            warn!(
                key,
                previous = %existing.creator,
                creator = %ctx.caller,
                "key re-registered by a different caller"
            );
        }
    }

    state.settings.insert(
        key.to_string(),
        KeySettings {
            created_at: ctx.tick,
            creator: ctx.caller.clone(),
            public_read,
            public_write,
            retention_ticks,
        },
    );
    state.current_tick = ctx.tick;
    state.audit.append(
        EventType::KeyRegistered,
        key,
        ctx.tick,
        retention_ticks,
        &ctx.caller,
        ctx.timestamp,
    );

    info!(key, creator = %ctx.caller, public_read, public_write, retention_ticks, "key registered");
    Ok(key.to_string())
}

/// Creator only; the owner bypass does not apply here
fn ensure_creator(state: &LedgerState, ctx: &CallContext, key: &str, action: &'static str) -> LedgerResult<()> {
    match state.settings.get(key) {
        Some(settings) if settings.creator == ctx.caller => Ok(()),
        _ => Err(LedgerError::not_authorized(&ctx.caller, action, key)),
    }
}

pub fn grant_writer(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    writer: &str,
) -> LedgerResult<()> {
    validate_key(key)?;
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    ensure_creator(&state, ctx, key, "grant writers on")?;

    state.current_tick = ctx.tick;
    let added = state
        .grants
        .entry(key.to_string())
        .or_default()
        .insert(writer.to_string());
    if added {
        state
            .audit
            .append(EventType::WriterGranted, key, ctx.tick, 0, &ctx.caller, ctx.timestamp);
        info!(key, writer, "writer granted");
    }
    Ok(())
}

/// Revoking a grant that does not exist is not an error
pub fn revoke_writer(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    writer: &str,
) -> LedgerResult<()> {
    validate_key(key)?;
    let mut state = ledger.state.write();
    check_tick(&state, ctx)?;
    ensure_creator(&state, ctx, key, "revoke writers on")?;

    state.current_tick = ctx.tick;
    let removed = state
        .grants
        .get_mut(key)
        .is_some_and(|writers| writers.remove(writer));
    if removed {
        state
            .audit
            .append(EventType::WriterRevoked, key, ctx.tick, 0, &ctx.caller, ctx.timestamp);
        info!(key, writer, "writer revoked");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registered(public_write: bool) -> LedgerState {
        let mut state = LedgerState::new(4);
        state.settings.insert(
            "temp".to_string(),
            KeySettings {
                created_at: 1,
                creator: "alice".to_string(),
                public_read: false,
                public_write,
                retention_ticks: 0,
            },
        );
        state
    }

    #[test]
    fn test_unregistered_is_open_by_default() {
        let state = LedgerState::new(4);
        let config = LedgerConfig::new("owner");
        assert!(can_write(&config, &state, "anyone", "free"));
        assert!(can_read(&config, &state, "anyone", "free"));

        let closed = config.with_open_unregistered_keys(false);
        assert!(!can_write(&closed, &state, "anyone", "free"));
        assert!(can_write(&closed, &state, "owner", "free"));
    }

    #[test]
    fn test_registered_tiers() {
        let mut state = registered(false);
        let config = LedgerConfig::new("owner");

        assert!(can_write(&config, &state, "alice", "temp"));
        assert!(can_write(&config, &state, "owner", "temp"));
        assert!(!can_write(&config, &state, "bob", "temp"));
        assert!(!can_read(&config, &state, "bob", "temp"));

        state
            .grants
            .entry("temp".to_string())
            .or_default()
            .insert("bob".to_string());
        assert!(can_write(&config, &state, "bob", "temp"));
    }

    #[test]
    fn test_public_write() {
        let state = registered(true);
        let config = LedgerConfig::new("owner");
        assert!(can_write(&config, &state, "mallory", "temp"));
        assert!(!can_read(&config, &state, "mallory", "temp"));
    }
}
