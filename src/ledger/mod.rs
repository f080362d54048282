//! Snapshot Ledger - core data engine
//!
//! Per-key timelines of values with point-in-time lookups, permissioned
//! writers, cached range statistics, an audit log and retention cleanup.
//!
//! Every operation takes an explicit [`CallContext`] carrying the caller and
//! the host's current tick. Mutating operations hold the write lock for their
//! whole validate-then-commit sequence, so each call is atomic with respect to
//! all others and a failed call leaves no trace.

mod access;
mod admin;
mod aggregation;
mod audit;
mod config;
mod fees;
mod queries;
mod retention;
mod state;
mod timeline;
mod writes;

use parking_lot::RwLock;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::persistence::{PersistedState, PersistenceResult};
use crate::types::{
    AggregationCacheEntry, BatchItem, CallContext, EventLogEntry, KeySettings, LedgerStatus,
    Snapshot, SnapshotMetadata, Statistics, StoredSnapshot, Tick,
};

pub use audit::AuditLog;
pub use config::LedgerConfig;
pub use fees::Balances;
pub use timeline::TimelineIndex;

use state::LedgerState;

/// Ticks never move backwards; a write at an older tick is rejected
pub(crate) fn check_tick(state: &LedgerState, ctx: &CallContext) -> LedgerResult<()> {
    if ctx.tick < state.current_tick {
        return Err(LedgerError::TickRegression {
            tick: ctx.tick,
            current: state.current_tick,
        });
    }
    Ok(())
}

/// Versioned key-value snapshot store
pub struct SnapshotLedger {
    pub(crate) config: LedgerConfig,
    pub(crate) state: RwLock<LedgerState>,
}

impl SnapshotLedger {
    /// Create an empty ledger
    pub fn new(config: LedgerConfig) -> Self {
        let state = LedgerState::new(config.max_cache_entries);
        Self {
            config,
            state: RwLock::new(state),
        }
    }

    /// Rebuild a ledger from a checkpoint
    pub fn restore(config: LedgerConfig, persisted: PersistedState) -> PersistenceResult<Self> {
        if persisted.owner != config.owner {
            tracing::warn!(
                checkpoint_owner = %persisted.owner,
                owner = %config.owner,
                "checkpoint was written under a different owner"
            );
        }
        let state = LedgerState::from_persisted(persisted, config.max_cache_entries)?;
        info!(
            keys = state.keys.len(),
            events = state.audit.counter(),
            tick = state.current_tick,
            "ledger restored"
        );
        Ok(Self {
            config,
            state: RwLock::new(state),
        })
    }

    /// Snapshot of the persisted tables
    pub fn export_state(&self) -> PersistedState {
        self.state.read().to_persisted(&self.config.owner)
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn owner(&self) -> &str {
        &self.config.owner
    }
}

impl Default for SnapshotLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

// Writes (from writes.rs)
impl SnapshotLedger {
    pub fn store(&self, ctx: &CallContext, key: &str, value: u64) -> LedgerResult<Snapshot> {
        writes::store(self, ctx, key, value)
    }

    pub fn store_with_metadata(
        &self,
        ctx: &CallContext,
        key: &str,
        value: u64,
        description: &str,
        tags: Vec<String>,
    ) -> LedgerResult<StoredSnapshot> {
        writes::store_with_metadata(self, ctx, key, value, description, tags)
    }

    pub fn batch_store(&self, ctx: &CallContext, items: &[BatchItem]) -> LedgerResult<Vec<Snapshot>> {
        writes::batch_store(self, ctx, items)
    }
}

// Access control (from access.rs)
impl SnapshotLedger {
    pub fn register(
        &self,
        ctx: &CallContext,
        key: &str,
        public_read: bool,
        public_write: bool,
        retention_ticks: u64,
    ) -> LedgerResult<String> {
        access::register(self, ctx, key, public_read, public_write, retention_ticks)
    }

    pub fn grant_writer(&self, ctx: &CallContext, key: &str, writer: &str) -> LedgerResult<()> {
        access::grant_writer(self, ctx, key, writer)
    }

    pub fn revoke_writer(&self, ctx: &CallContext, key: &str, writer: &str) -> LedgerResult<()> {
        access::revoke_writer(self, ctx, key, writer)
    }

    pub fn can_write(&self, caller: &str, key: &str) -> bool {
        access::can_write(&self.config, &self.state.read(), caller, key)
    }

    pub fn can_read(&self, caller: &str, key: &str) -> bool {
        access::can_read(&self.config, &self.state.read(), caller, key)
    }

    pub fn get_key_settings(&self, key: &str) -> Option<KeySettings> {
        self.state.read().settings.get(key).cloned()
    }

    pub fn is_writer(&self, key: &str, writer: &str) -> bool {
        self.state.read().has_grant(key, writer)
    }
}

// Lookups (from queries.rs)
impl SnapshotLedger {
    pub fn get_at(&self, ctx: &CallContext, key: &str, tick: Tick) -> LedgerResult<Snapshot> {
        queries::get_at(self, ctx, key, tick)
    }

    pub fn get_latest(&self, ctx: &CallContext, key: &str) -> LedgerResult<Snapshot> {
        queries::get_latest(self, ctx, key)
    }

    pub fn get_at_or_before(&self, ctx: &CallContext, key: &str, target: Tick) -> LedgerResult<Snapshot> {
        queries::get_at_or_before(self, ctx, key, target)
    }

    pub fn get_range(
        &self,
        ctx: &CallContext,
        key: &str,
        start: Tick,
        end: Tick,
    ) -> LedgerResult<Vec<Snapshot>> {
        queries::get_range(self, ctx, key, start, end)
    }

    pub fn get_snapshot_metadata(
        &self,
        ctx: &CallContext,
        key: &str,
        tick: Tick,
    ) -> LedgerResult<SnapshotMetadata> {
        queries::get_snapshot_metadata(self, ctx, key, tick)
    }

    pub fn get_timeline(&self, ctx: &CallContext, key: &str) -> LedgerResult<Vec<Tick>> {
        queries::get_timeline(self, ctx, key)
    }
}

// Statistics (from aggregation.rs)
impl SnapshotLedger {
    pub fn calculate_statistics(
        &self,
        ctx: &CallContext,
        key: &str,
        start: Tick,
        end: Tick,
    ) -> LedgerResult<Statistics> {
        aggregation::calculate_statistics(self, ctx, key, start, end)
    }

    pub fn get_statistics(
        &self,
        ctx: &CallContext,
        key: &str,
        start: Tick,
        end: Tick,
    ) -> LedgerResult<Statistics> {
        aggregation::get_statistics(self, ctx, key, start, end)
    }

    pub fn calculate_and_cache_statistics(
        &self,
        ctx: &CallContext,
        key: &str,
        start: Tick,
        end: Tick,
    ) -> LedgerResult<Statistics> {
        aggregation::calculate_and_cache_statistics(self, ctx, key, start, end)
    }

    pub fn get_cached_statistics(
        &self,
        ctx: &CallContext,
        key: &str,
        start: Tick,
        end: Tick,
    ) -> LedgerResult<AggregationCacheEntry> {
        aggregation::get_cached_statistics(self, ctx, key, start, end)
    }

    pub fn get_moving_average(
        &self,
        ctx: &CallContext,
        key: &str,
        center: Tick,
        window: u64,
    ) -> LedgerResult<u64> {
        aggregation::get_moving_average(self, ctx, key, center, window)
    }
}

// Retention and administration (from retention.rs, admin.rs)
impl SnapshotLedger {
    pub fn cleanup(&self, ctx: &CallContext, key: &str) -> LedgerResult<u64> {
        retention::cleanup(self, ctx, key)
    }

    pub fn set_paused(&self, ctx: &CallContext, paused: bool) -> LedgerResult<bool> {
        admin::set_paused(self, ctx, paused)
    }

    pub fn set_fee(&self, ctx: &CallContext, fee: u64) -> LedgerResult<u64> {
        admin::set_fee(self, ctx, fee)
    }

    pub fn status(&self) -> LedgerStatus {
        admin::status(self)
    }

    pub fn get_total_snapshots(&self) -> u64 {
        self.state.read().total_snapshots
    }

    pub fn get_paused(&self) -> bool {
        self.state.read().paused
    }

    pub fn get_fee(&self) -> u64 {
        self.state.read().snapshot_fee
    }

    pub fn get_current_tick(&self) -> Tick {
        self.state.read().current_tick
    }

    pub fn get_event(&self, event_id: u64) -> Option<EventLogEntry> {
        self.state.read().audit.get(event_id).cloned()
    }

    pub fn get_latest_events(&self, n: usize) -> Vec<EventLogEntry> {
        self.state.read().audit.latest(n).to_vec()
    }

    /// Events with id >= `from_id`, used for incremental export
    pub fn events_since(&self, from_id: u64) -> Vec<EventLogEntry> {
        self.state.read().audit.since(from_id).to_vec()
    }

    /// Credit a principal's balance (host-side funding)
    pub fn deposit(&self, principal: &str, amount: u64) -> u64 {
        self.state.write().balances.deposit(principal, amount)
    }

    pub fn balance(&self, principal: &str) -> u64 {
        self.state.read().balances.balance(principal)
    }
}
