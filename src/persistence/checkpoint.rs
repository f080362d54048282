//! Checkpoint manager
//!
//! Writes the persisted tables atomically and keeps the prior checkpoint as
//! `state.prev.json`, so a corrupted latest file can be recovered from.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use super::{atomic_write_with, PersistedState, PersistenceConfig, PersistenceError, PersistenceResult, CHECKPOINT_VERSION};

/// Creates and loads ledger checkpoints
pub struct CheckpointManager {
    config: PersistenceConfig,
}

impl CheckpointManager {
    pub fn new(config: PersistenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    pub fn checkpoint_exists(&self) -> bool {
        self.config.checkpoint_path().exists()
    }

    /// Write a new checkpoint, copying the current one to the backup slot.
    ///
    /// `state.json` is only ever replaced by a rename, so at every point on
    /// disk there is a complete latest checkpoint or a complete backup.
    pub fn save(&self, state: &PersistedState) -> PersistenceResult<()> {
        let latest = self.config.checkpoint_path();
        let previous = self.config.previous_checkpoint_path();
        let staged = latest.with_extension("next");

        atomic_write_with(&staged, |file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, state)?;
            writer.flush()
        })?;

        if latest.exists() {
            atomic_write_with(&previous, |file| {
                let mut current = File::open(&latest)?;
                io::copy(&mut current, file)?;
                Ok(())
            })?;
        }
        fs::rename(&staged, &latest)?;

        info!(
            path = %latest.display(),
            tick = state.current_tick,
            snapshots = state.snapshots.len(),
            events = state.events.len(),
            "checkpoint written"
        );
        Ok(())
    }

    fn read(path: &Path) -> PersistenceResult<PersistedState> {
        let reader = BufReader::new(File::open(path)?);
        let state: PersistedState = serde_json::from_reader(reader)
            .map_err(|e| PersistenceError::CheckpointCorrupted(format!("{}: {}", path.display(), e)))?;
        if state.version > CHECKPOINT_VERSION {
            return Err(PersistenceError::CheckpointCorrupted(format!(
                "unsupported checkpoint version {}",
                state.version
            )));
        }
        Ok(state)
    }

    /// Load the latest checkpoint; None when none has been written
    pub fn load(&self) -> PersistenceResult<Option<PersistedState>> {
        let path = self.config.checkpoint_path();
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    /// Load the backup checkpoint
    pub fn recover_from_backup(&self) -> PersistenceResult<Option<PersistedState>> {
        let path = self.config.previous_checkpoint_path();
        if !path.exists() {
            return Ok(None);
        }
        warn!(path = %path.display(), "recovering from backup checkpoint");
        Self::read(&path).map(Some)
    }

    /// Latest checkpoint, falling back to the backup if the latest is
    /// missing or unreadable
    pub fn load_or_recover(&self) -> PersistenceResult<Option<PersistedState>> {
        match self.load() {
            Ok(Some(state)) => Ok(Some(state)),
            Ok(None) => self.recover_from_backup(),
            Err(e) => {
                warn!(error = %e, "latest checkpoint unreadable");
                match self.recover_from_backup()? {
                    Some(state) => Ok(Some(state)),
                    None => Err(e),
                }
            }
        }
    }
}
