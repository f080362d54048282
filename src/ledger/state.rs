//! In-memory ledger state and its persisted row layout

use std::collections::{HashMap, HashSet};

use crate::persistence::{
    BalanceRow, MetadataRow, PersistedState, PersistenceError, PersistenceResult, SettingsRow,
    CHECKPOINT_VERSION,
};
use crate::types::{KeySettings, Principal, Snapshot, SnapshotMetadata, Tick, WriterGrant};

use super::aggregation::AggregationCache;
use super::audit::AuditLog;
use super::fees::Balances;
use super::timeline::TimelineIndex;

/// Snapshots, metadata and bookkeeping for one key
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyState {
    pub timeline: TimelineIndex,
    pub values: HashMap<Tick, u64>,
    pub metadata: HashMap<Tick, SnapshotMetadata>,
    /// Always equal to `timeline.latest()`
    pub latest: Option<Tick>,
    /// Bumped on every write and on every cleanup that removes snapshots
    pub write_sequence: u64,
    /// Highest tick ever written
    pub last_mutation_tick: Option<Tick>,
}

impl KeyState {
    /// Record a value; a second write within the same tick replaces the first
    pub fn put(&mut self, tick: Tick, value: u64) {
        self.timeline.insert(tick);
        self.values.insert(tick, value);
        // the earlier metadata described a value that no longer exists
        self.metadata.remove(&tick);
        if self.latest.map_or(true, |latest| tick >= latest) {
            self.latest = Some(tick);
        }
        self.last_mutation_tick = Some(self.last_mutation_tick.map_or(tick, |t| t.max(tick)));
        self.write_sequence += 1;
    }

    pub fn value_at(&self, tick: Tick) -> Option<u64> {
        self.values.get(&tick).copied()
    }

    pub fn predecessor(&self, target: Tick) -> Option<(Tick, u64)> {
        let tick = self.timeline.predecessor(target)?;
        self.value_at(tick).map(|value| (tick, value))
    }

    pub fn range(&self, start: Tick, end: Tick) -> impl Iterator<Item = (Tick, u64)> + '_ {
        self.timeline
            .range(start, end)
            .iter()
            .filter_map(move |&tick| self.value_at(tick).map(|value| (tick, value)))
    }

    /// Drop every snapshot older than `cutoff`; returns how many went
    pub fn remove_before(&mut self, cutoff: Tick) -> usize {
        let removed = self.timeline.remove_before(cutoff);
        for tick in &removed {
            self.values.remove(tick);
            self.metadata.remove(tick);
        }
        if !removed.is_empty() {
            if self.latest.is_some_and(|latest| latest < cutoff) {
                self.latest = self.timeline.latest();
            }
            self.write_sequence += 1;
        }
        removed.len()
    }
}

/// Everything the ledger knows, guarded by one lock
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    pub keys: HashMap<String, KeyState>,
    pub settings: HashMap<String, KeySettings>,
    pub grants: HashMap<String, HashSet<Principal>>,
    pub cache: AggregationCache,
    pub audit: AuditLog,
    pub balances: Balances,
    pub total_snapshots: u64,
    pub paused: bool,
    pub snapshot_fee: u64,
    pub current_tick: Tick,
}

impl LedgerState {
    pub fn new(max_cache_entries: usize) -> Self {
        Self {
            cache: AggregationCache::new(max_cache_entries),
            ..Default::default()
        }
    }

    pub fn has_grant(&self, key: &str, writer: &str) -> bool {
        self.grants
            .get(key)
            .is_some_and(|writers| writers.contains(writer))
    }

    /// Flatten into the persisted table layout, rows sorted for stable output
    pub fn to_persisted(&self, owner: &str) -> PersistedState {
        let mut settings: Vec<SettingsRow> = self
            .settings
            .iter()
            .map(|(key, settings)| SettingsRow {
                key: key.clone(),
                settings: settings.clone(),
            })
            .collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));

        let mut snapshots = Vec::new();
        let mut metadata = Vec::new();
        let mut keys: Vec<&String> = self.keys.keys().collect();
        keys.sort();
        for key in keys {
            let state = &self.keys[key];
            for tick in state.timeline.iter() {
                if let Some(value) = state.value_at(tick) {
                    snapshots.push(Snapshot::new(key.clone(), tick, value));
                }
                if let Some(meta) = state.metadata.get(&tick) {
                    metadata.push(MetadataRow {
                        key: key.clone(),
                        tick,
                        metadata: meta.clone(),
                    });
                }
            }
        }

        let mut grants: Vec<WriterGrant> = self
            .grants
            .iter()
            .flat_map(|(key, writers)| {
                writers.iter().map(move |writer| WriterGrant {
                    key: key.clone(),
                    writer: writer.clone(),
                })
            })
            .collect();
        grants.sort_by(|a, b| (&a.key, &a.writer).cmp(&(&b.key, &b.writer)));

        let mut balances: Vec<BalanceRow> = self
            .balances
            .iter()
            .map(|(principal, balance)| BalanceRow {
                principal: principal.clone(),
                balance: *balance,
            })
            .collect();
        balances.sort_by(|a, b| a.principal.cmp(&b.principal));

        PersistedState {
            version: CHECKPOINT_VERSION,
            owner: owner.to_string(),
            current_tick: self.current_tick,
            total_snapshots: self.total_snapshots,
            paused: self.paused,
            snapshot_fee: self.snapshot_fee,
            settings,
            snapshots,
            metadata,
            grants,
            events: self.audit.entries().to_vec(),
            balances,
        }
    }

    /// Rebuild from persisted tables. The aggregation cache starts empty.
    pub fn from_persisted(
        persisted: PersistedState,
        max_cache_entries: usize,
    ) -> PersistenceResult<Self> {
        let mut state = LedgerState::new(max_cache_entries);
        state.current_tick = persisted.current_tick;
        state.total_snapshots = persisted.total_snapshots;
        state.paused = persisted.paused;
        state.snapshot_fee = persisted.snapshot_fee;

        for row in persisted.settings {
            state.settings.insert(row.key, row.settings);
        }

        for snapshot in persisted.snapshots {
            let key_state = state.keys.entry(snapshot.key).or_default();
            key_state.put(snapshot.tick, snapshot.value);
        }

        for row in persisted.metadata {
            let key_state = state
                .keys
                .get_mut(&row.key)
                .filter(|k| k.timeline.contains(row.tick))
                .ok_or_else(|| {
                    PersistenceError::CheckpointCorrupted(format!(
                        "metadata for '{}' at tick {} has no snapshot",
                        row.key, row.tick
                    ))
                })?;
            key_state.metadata.insert(row.tick, row.metadata);
        }

        for grant in persisted.grants {
            state.grants.entry(grant.key).or_default().insert(grant.writer);
        }

        for row in persisted.balances {
            state.balances.deposit(&row.principal, row.balance);
        }

        state.audit = AuditLog::from_entries(persisted.events).ok_or_else(|| {
            PersistenceError::CheckpointCorrupted("event ids are not contiguous from 0".to_string())
        })?;

        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_overwrite_same_tick() {
        let mut key = KeyState::default();
        key.put(10, 1);
        key.put(10, 2);
        assert_eq!(key.value_at(10), Some(2));
        assert_eq!(key.timeline.len(), 1);
        assert_eq!(key.write_sequence, 2);
        assert_eq!(key.latest, Some(10));
    }

    #[test]
    fn test_put_out_of_order_keeps_latest() {
        let mut key = KeyState::default();
        key.put(20, 1);
        key.put(10, 2);
        assert_eq!(key.latest, Some(20));
        assert_eq!(key.last_mutation_tick, Some(20));
    }

    #[test]
    fn test_remove_before_recomputes_latest() {
        let mut key = KeyState::default();
        key.put(1, 10);
        key.put(2, 20);
        key.put(9, 90);

        assert_eq!(key.remove_before(5), 2);
        assert_eq!(key.latest, Some(9));
        assert_eq!(key.write_sequence, 4);

        assert_eq!(key.remove_before(10), 1);
        assert_eq!(key.latest, None);
        assert!(key.values.is_empty());
    }

    #[test]
    fn test_remove_nothing_keeps_sequence() {
        let mut key = KeyState::default();
        key.put(5, 1);
        assert_eq!(key.remove_before(5), 0);
        assert_eq!(key.write_sequence, 1);
    }

    #[test]
    fn test_persisted_round_trip() {
        let mut state = LedgerState::new(8);
        state.keys.entry("temp".to_string()).or_default().put(10, 100);
        state.keys.get_mut("temp").unwrap().metadata.insert(
            10,
            SnapshotMetadata {
                timestamp: 10,
                author: "alice".to_string(),
                description: "first".to_string(),
                tags: vec![],
            },
        );
        state
            .grants
            .entry("temp".to_string())
            .or_default()
            .insert("bob".to_string());
        state.total_snapshots = 1;

        let restored = LedgerState::from_persisted(state.to_persisted("owner"), 8).unwrap();
        assert_eq!(restored.keys["temp"].value_at(10), Some(100));
        assert!(restored.keys["temp"].metadata.contains_key(&10));
        assert!(restored.has_grant("temp", "bob"));
        assert_eq!(restored.total_snapshots, 1);
    }

    #[test]
    fn test_orphan_metadata_is_corruption() {
        let mut persisted = LedgerState::new(8).to_persisted("owner");
        persisted.metadata.push(MetadataRow {
            key: "ghost".to_string(),
            tick: 1,
            metadata: SnapshotMetadata {
                timestamp: 1,
                author: "a".to_string(),
                description: String::new(),
                tags: vec![],
            },
        });
        assert!(matches!(
            LedgerState::from_persisted(persisted, 8),
            Err(PersistenceError::CheckpointCorrupted(_))
        ));
    }
}
