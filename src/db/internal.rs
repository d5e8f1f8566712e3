#[cfg(feature = "snapshot")]
use crate::error::Result;
use crate::storage::MemoryStore;
#[cfg(feature = "snapshot")]
use crate::storage::SnapshotFile;

/// State guarded by the storage lock.
pub(crate) struct StorageInner {
    pub(crate) store: MemoryStore,
    #[cfg(feature = "snapshot")]
    pub(crate) snapshot_file: Option<SnapshotFile>,
}

impl StorageInner {
    pub(crate) fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            #[cfg(feature = "snapshot")]
            snapshot_file: None,
        }
    }

    #[cfg(feature = "snapshot")]
    pub(crate) fn load_from_snapshot(&mut self, snapshot_file: &SnapshotFile) -> Result<()> {
        let state = snapshot_file.load()?;
        self.store = MemoryStore::from_state(state);
        Ok(())
    }

    /// Count a committed mutation and save if the snapshot interval is reached.
    ///
    /// The mutation stays applied when the save fails; the failure is logged
    /// and the save is retried on the next mutation.
    pub(crate) fn record_mutation(&mut self) {
        #[cfg(feature = "snapshot")]
        if let Some(snapshot_file) = self.snapshot_file.as_mut() {
            snapshot_file.record_operation();
            if snapshot_file.should_snapshot()
                && let Err(e) = snapshot_file.save(&self.store.to_state())
            {
                log::warn!(
                    "auto snapshot to {} failed: {}",
                    snapshot_file.path().display(),
                    e
                );
            }
        }
    }

    #[cfg(feature = "snapshot")]
    pub(crate) fn save_snapshot(&mut self) -> Result<bool> {
        match self.snapshot_file.as_mut() {
            Some(snapshot_file) => {
                snapshot_file.save(&self.store.to_state())?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
