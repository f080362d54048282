//! JSONL export of the audit log
//!
//! The ledger keeps the full log in memory; this appends entries that have
//! not been written yet to `events.jsonl` for external indexers.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};

use tracing::{debug, warn};

use crate::types::EventLogEntry;

use super::{PersistenceConfig, PersistenceResult};

/// Appends audit entries to a JSONL file, tracking how far it has written
pub struct EventExporter {
    config: PersistenceConfig,
    next_event_id: u64,
}

impl EventExporter {
    /// Resume after whatever the file already holds
    pub fn open(config: PersistenceConfig) -> PersistenceResult<Self> {
        let next_event_id = Self::read_events(&config)?
            .last()
            .map_or(0, |e| e.event_id + 1);
        Ok(Self {
            config,
            next_event_id,
        })
    }

    /// Id of the next entry to be exported
    pub fn next_event_id(&self) -> u64 {
        self.next_event_id
    }

    /// Append entries with id >= next_event_id; returns how many were written
    pub fn export(&mut self, entries: &[EventLogEntry]) -> PersistenceResult<usize> {
        let pending: Vec<&EventLogEntry> = entries
            .iter()
            .filter(|e| e.event_id >= self.next_event_id)
            .collect();
        if pending.is_empty() {
            return Ok(0);
        }

        let path = self.config.events_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        for entry in &pending {
            writeln!(file, "{}", entry.to_json_line()?)?;
        }
        file.sync_all()?;

        if let Some(last) = pending.last() {
            self.next_event_id = last.event_id + 1;
        }
        debug!(written = pending.len(), next = self.next_event_id, "events exported");
        Ok(pending.len())
    }

    /// Read back every exported entry, skipping unparseable lines
    pub fn read_events(config: &PersistenceConfig) -> PersistenceResult<Vec<EventLogEntry>> {
        let path = config.events_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&path)?);
        let mut events = Vec::new();
        for (line_num, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match EventLogEntry::from_json_line(&line) {
                Ok(event) => events.push(event),
                Err(e) => warn!(line = line_num + 1, error = %e, "skipping malformed event"),
            }
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventType;
    use tempfile::TempDir;

    fn entry(id: u64) -> EventLogEntry {
        EventLogEntry {
            event_id: id,
            event_type: EventType::SnapshotStored,
            key: "temp".to_string(),
            tick: id,
            value: id * 10,
            author: "alice".to_string(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_export_is_incremental() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(temp_dir.path());
        let mut exporter = EventExporter::open(config.clone()).unwrap();

        assert_eq!(exporter.export(&[entry(0), entry(1)]).unwrap(), 2);
        assert_eq!(exporter.export(&[entry(0), entry(1), entry(2)]).unwrap(), 1);
        assert_eq!(exporter.export(&[entry(2)]).unwrap(), 0);

        let events = EventExporter::read_events(&config).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].value, 20);
    }

    #[test]
    fn test_reopen_resumes() {
        let temp_dir = TempDir::new().unwrap();
        let config = PersistenceConfig::new(temp_dir.path());
        EventExporter::open(config.clone())
            .unwrap()
            .export(&[entry(0), entry(1)])
            .unwrap();

        let exporter = EventExporter::open(config).unwrap();
        assert_eq!(exporter.next_event_id(), 2);
    }
}
