//! Append-only audit log

use crate::types::{EventLogEntry, EventType, Tick};

/// Event log keyed by a dense, strictly increasing id starting at 0
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    entries: Vec<EventLogEntry>,
}

impl AuditLog {
    /// Rebuild from persisted entries; ids must be exactly 0..n
    pub fn from_entries(entries: Vec<EventLogEntry>) -> Option<Self> {
        let dense = entries
            .iter()
            .enumerate()
            .all(|(i, e)| e.event_id == i as u64);
        dense.then_some(Self { entries })
    }

    pub fn append(
        &mut self,
        event_type: EventType,
        key: &str,
        tick: Tick,
        value: u64,
        author: &str,
        timestamp: i64,
    ) -> u64 {
        let event_id = self.entries.len() as u64;
        self.entries.push(EventLogEntry {
            event_id,
            event_type,
            key: key.to_string(),
            tick,
            value,
            author: author.to_string(),
            timestamp,
        });
        event_id
    }

    /// Number of events ever appended (also the next id)
    pub fn counter(&self) -> u64 {
        self.entries.len() as u64
    }

    pub fn get(&self, event_id: u64) -> Option<&EventLogEntry> {
        usize::try_from(event_id)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    /// Newest `min(n, counter)` entries, oldest first
    pub fn latest(&self, n: usize) -> &[EventLogEntry] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    /// Entries with id >= `from_id`, oldest first
    pub fn since(&self, from_id: u64) -> &[EventLogEntry] {
        let start = usize::try_from(from_id)
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[EventLogEntry] {
        &self.entries
    }
}
