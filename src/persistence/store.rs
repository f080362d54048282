//! Ledger bound to a data directory

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::ledger::{LedgerConfig, SnapshotLedger};

use super::{cleanup_temp_files, CheckpointManager, EventExporter, PersistenceConfig, PersistenceResult};

/// Owns a ledger together with its checkpoint and event export files
pub struct LedgerStore {
    ledger: Arc<SnapshotLedger>,
    checkpoints: CheckpointManager,
    exporter: Mutex<EventExporter>,
}

impl LedgerStore {
    /// Restore from the data directory, or start empty when nothing is there
    pub fn open(config: LedgerConfig, persistence: PersistenceConfig) -> PersistenceResult<Self> {
        std::fs::create_dir_all(&persistence.data_dir)?;
        match cleanup_temp_files(&persistence.data_dir) {
            Ok(0) => {}
            Ok(n) => warn!(removed = n, "removed leftover temp files"),
            Err(e) => warn!(error = %e, "could not scan for temp files"),
        }

        let checkpoints = CheckpointManager::new(persistence.clone());
        let ledger = match checkpoints.load_or_recover()? {
            Some(state) => SnapshotLedger::restore(config, state)?,
            None => {
                info!(dir = %persistence.data_dir.display(), "no checkpoint, starting empty");
                SnapshotLedger::new(config)
            }
        };
        let exporter = EventExporter::open(persistence)?;

        Ok(Self {
            ledger: Arc::new(ledger),
            checkpoints,
            exporter: Mutex::new(exporter),
        })
    }

    pub fn ledger(&self) -> Arc<SnapshotLedger> {
        self.ledger.clone()
    }

    /// Write a checkpoint and export any new audit entries.
    ///
    /// Holds the exporter lock throughout, so flushes from different threads
    /// never share the staged checkpoint file.
    pub fn flush(&self) -> PersistenceResult<()> {
        let mut exporter = self.exporter.lock();
        let state = self.ledger.export_state();
        self.checkpoints.save(&state)?;

        let pending = self.ledger.events_since(exporter.next_event_id());
        let written = exporter.export(&pending)?;
        debug!(tick = state.current_tick, exported = written, "ledger flushed");
        Ok(())
    }
}
