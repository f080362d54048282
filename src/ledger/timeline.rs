//! Per-key ordered tick index
//!
//! Ticks arrive in non-decreasing order in practice, so the index is a sorted
//! `Vec` with an append fast path. Lookups are binary searches via
//! `partition_point`, which keeps predecessor queries O(log n) no matter how
//! sparse the timeline is or how far back the target lies.

use serde::{Deserialize, Serialize};

use crate::types::Tick;

/// Sorted, de-duplicated set of ticks that hold a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineIndex {
    ticks: Vec<Tick>,
}

impl TimelineIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tick; returns false if it was already present
    pub fn insert(&mut self, tick: Tick) -> bool {
        match self.ticks.last() {
            None => {
                self.ticks.push(tick);
                true
            }
            Some(&last) if tick > last => {
                self.ticks.push(tick);
                true
            }
            _ => match self.ticks.binary_search(&tick) {
                Ok(_) => false,
                Err(pos) => {
                    self.ticks.insert(pos, tick);
                    true
                }
            },
        }
    }

    pub fn contains(&self, tick: Tick) -> bool {
        self.ticks.binary_search(&tick).is_ok()
    }

    /// Greatest tick <= target
    pub fn predecessor(&self, target: Tick) -> Option<Tick> {
        let idx = self.ticks.partition_point(|&t| t <= target);
        idx.checked_sub(1).map(|i| self.ticks[i])
    }

    /// Ticks in [start, end], ascending. Empty when start > end.
    pub fn range(&self, start: Tick, end: Tick) -> &[Tick] {
        if start > end {
            return &[];
        }
        let lo = self.ticks.partition_point(|&t| t < start);
        let hi = self.ticks.partition_point(|&t| t <= end);
        &self.ticks[lo..hi]
    }

    /// Remove and return every tick < cutoff
    pub fn remove_before(&mut self, cutoff: Tick) -> Vec<Tick> {
        let idx = self.ticks.partition_point(|&t| t < cutoff);
        self.ticks.drain(..idx).collect()
    }

    pub fn latest(&self) -> Option<Tick> {
        self.ticks.last().copied()
    }

    pub fn earliest(&self) -> Option<Tick> {
        self.ticks.first().copied()
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tick> + '_ {
        self.ticks.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(ticks: &[Tick]) -> TimelineIndex {
        let mut idx = TimelineIndex::new();
        for &t in ticks {
            idx.insert(t);
        }
        idx
    }

    #[test]
    fn test_insert_keeps_order_and_dedups() {
        let mut idx = index(&[10, 30, 20]);
        assert!(!idx.insert(20));
        assert!(idx.insert(5));
        assert_eq!(idx.iter().collect::<Vec<_>>(), vec![5, 10, 20, 30]);
        assert_eq!(idx.len(), 4);
    }

    #[test]
    fn test_predecessor() {
        let idx = index(&[10, 20]);
        assert_eq!(idx.predecessor(15), Some(10));
        assert_eq!(idx.predecessor(20), Some(20));
        assert_eq!(idx.predecessor(1_000_000), Some(20));
        assert_eq!(idx.predecessor(9), None);
        assert_eq!(TimelineIndex::new().predecessor(5), None);
    }

    #[test]
    fn test_predecessor_far_in_the_past() {
        // A fixed lookback window would miss this
        let idx = index(&[3, 5_000_000]);
        assert_eq!(idx.predecessor(4_999_999), Some(3));
    }

    #[test]
    fn test_range_is_inclusive() {
        let idx = index(&[10, 20, 30, 40]);
        assert_eq!(idx.range(20, 30), &[20, 30]);
        assert_eq!(idx.range(0, 25), &[10, 20]);
        assert_eq!(idx.range(41, 50), &[] as &[Tick]);
        assert_eq!(idx.range(30, 20), &[] as &[Tick]);
    }

    #[test]
    fn test_remove_before() {
        let mut idx = index(&[1, 2, 5, 8]);
        assert_eq!(idx.remove_before(5), vec![1, 2]);
        assert_eq!(idx.earliest(), Some(5));
        assert_eq!(idx.latest(), Some(8));
        assert!(idx.remove_before(0).is_empty());
        assert_eq!(idx.remove_before(100), vec![5, 8]);
        assert!(idx.is_empty());
    }
}
