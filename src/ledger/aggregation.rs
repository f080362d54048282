//! Range statistics and their memoization cache
//!
//! A cache entry remembers the key's write-sequence at the time it was
//! computed. Any write (or cleanup) bumps the sequence, so an entry is valid
//! exactly while `write_sequence[key] == entry.write_sequence`. Comparing
//! sequences instead of ticks keeps this precise when several writes land in
//! the same tick.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::types::{AggregationCacheEntry, CallContext, Statistics, Tick};

use super::queries::{check_range, ensure_readable};
use super::state::LedgerState;
use super::SnapshotLedger;

type CacheKey = (String, Tick, Tick);

/// Bounded map of memoized statistics
#[derive(Debug, Default)]
pub(crate) struct AggregationCache {
    entries: HashMap<CacheKey, (u64, AggregationCacheEntry)>,
    capacity: usize,
    inserted: u64,
}

impl AggregationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            inserted: 0,
        }
    }

    /// Entry for the range if it is still coherent with `write_sequence`
    pub fn get_valid(
        &self,
        key: &str,
        start: Tick,
        end: Tick,
        write_sequence: u64,
    ) -> Option<&AggregationCacheEntry> {
        self.entries
            .get(&(key.to_string(), start, end))
            .map(|(_, entry)| entry)
            .filter(|entry| entry.write_sequence == write_sequence)
    }

    pub fn insert(&mut self, entry: AggregationCacheEntry) {
        let cache_key = (entry.key.clone(), entry.start, entry.end);
        if !self.entries.contains_key(&cache_key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.inserted += 1;
        self.entries.insert(cache_key, (self.inserted, entry));
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (stamp, _))| *stamp)
            .map(|(k, _)| k.clone());
        if let Some(k) = oldest {
            self.entries.remove(&k);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Fold the values of `key` in [start, end] at tick `computed_at`
pub(crate) fn compute(state: &LedgerState, key: &str, start: Tick, end: Tick, computed_at: Tick) -> Statistics {
    match state.keys.get(key) {
        Some(key_state) => {
            Statistics::from_values(key_state.range(start, end).map(|(_, v)| v), computed_at)
        }
        None => Statistics::from_values(std::iter::empty(), computed_at),
    }
}

fn write_sequence(state: &LedgerState, key: &str) -> u64 {
    state.keys.get(key).map_or(0, |k| k.write_sequence)
}

/// Fresh statistics, never cached
pub fn calculate_statistics(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    start: Tick,
    end: Tick,
) -> LedgerResult<Statistics> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_range(ledger, &state, start, end)?;
    Ok(compute(&state, key, start, end, ctx.tick))
}

/// Cached statistics when still valid, otherwise computed without caching
pub fn get_statistics(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    start: Tick,
    end: Tick,
) -> LedgerResult<Statistics> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_range(ledger, &state, start, end)?;

    if let Some(entry) = state
        .cache
        .get_valid(key, start, end, write_sequence(&state, key))
    {
        debug!(key, start, end, "statistics cache hit");
        return Ok(entry.stats);
    }
    Ok(compute(&state, key, start, end, ctx.tick))
}

/// Compute and memoize, stamped with the key's current write-sequence
pub fn calculate_and_cache_statistics(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    start: Tick,
    end: Tick,
) -> LedgerResult<Statistics> {
    let mut state = ledger.state.write();
    ensure_readable(ledger, &state, ctx, key)?;
    check_range(ledger, &state, start, end)?;

    let stats = compute(&state, key, start, end, ctx.tick);
    let entry = AggregationCacheEntry {
        key: key.to_string(),
        start,
        end,
        stats,
        write_sequence: write_sequence(&state, key),
    };
    state.cache.insert(entry);
    debug!(key, start, end, cached = state.cache.len(), "statistics cached");
    Ok(stats)
}

/// Only a valid cached entry; never computes
pub fn get_cached_statistics(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    start: Tick,
    end: Tick,
) -> LedgerResult<AggregationCacheEntry> {
    let state = ledger.state.read();
    ensure_readable(ledger, &state, ctx, key)?;
    check_range(ledger, &state, start, end)?;

    state
        .cache
        .get_valid(key, start, end, write_sequence(&state, key))
        .cloned()
        .ok_or_else(|| LedgerError::not_found(key))
}

/// Average over [center - window/2, center + window/2]
pub fn get_moving_average(
    ledger: &SnapshotLedger,
    ctx: &CallContext,
    key: &str,
    center: Tick,
    window: u64,
) -> LedgerResult<u64> {
    let half = window / 2;
    let start = center.saturating_sub(half);
    let end = center.saturating_add(half);
    get_statistics(ledger, ctx, key, start, end).map(|stats| stats.avg)
}
