//! Range aggregation results

use serde::{Deserialize, Serialize};

use super::Tick;

/// Aggregate over the snapshots of one key in a tick range.
///
/// An empty range yields all zeroes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub sum: u128,
    pub avg: u64,
    pub min: u64,
    pub max: u64,
    pub count: u64,
    pub computed_at: Tick,
}

impl Statistics {
    /// Fold values into sum/min/max/count; avg truncates toward zero
    pub fn from_values<I>(values: I, computed_at: Tick) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut stats = Statistics {
            computed_at,
            ..Default::default()
        };

        for value in values {
            if stats.count == 0 {
                stats.min = value;
                stats.max = value;
            } else {
                stats.min = stats.min.min(value);
                stats.max = stats.max.max(value);
            }
            stats.sum = stats.sum.saturating_add(value as u128);
            stats.count += 1;
        }

        if stats.count > 0 {
            // avg never exceeds max, so it fits back into u64
            stats.avg = (stats.sum / stats.count as u128) as u64;
        }

        stats
    }
}

/// Memoized statistics for (key, start, end)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationCacheEntry {
    pub key: String,
    pub start: Tick,
    pub end: Tick,
    pub stats: Statistics,
    /// Key's write-sequence when computed; any later write makes the entry stale
    pub write_sequence: u64,
}

/// Global counters of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerStatus {
    pub total_snapshots: u64,
    pub event_counter: u64,
    pub paused: bool,
    pub snapshot_fee: u64,
    pub current_tick: Tick,
    pub owner: String,
}
