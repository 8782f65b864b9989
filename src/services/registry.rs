use std::sync::{Arc, RwLock};

use crate::models::RegistrySnapshot;

/// Holds the current channel table as an atomically swapped snapshot.
///
/// The refresh scheduler is the only writer; request handlers clone the `Arc`
/// and read from an immutable snapshot. A reader that obtained a snapshot
/// before a publish keeps reading that snapshot; nothing is mutated in place,
/// so no reader can ever observe a half-merged table.
pub struct ChannelRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RegistrySnapshot::empty())),
        }
    }

    /// The current snapshot. Never blocks on a refresh in progress: the lock
    /// is only held for the duration of the pointer clone.
    pub fn current(&self) -> Arc<RegistrySnapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Atomically replace the current snapshot.
    pub fn publish(&self, snapshot: RegistrySnapshot) {
        let mut slot = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Arc::new(snapshot);
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
