//! Storage backend abstraction.

use std::sync::Mutex;

use super::{PatientCollection, StoreResult};

/// Where a [`PatientStore`](super::PatientStore) keeps its collection.
///
/// Backends only ever see the full collection: `load` returns all of it and
/// `flush` replaces all of it.
pub trait StorageBackend: Send + Sync {
    /// Read the entire persisted collection. Absent state is an empty
    /// collection, not an error.
    fn load(&self) -> StoreResult<PatientCollection>;

    /// Overwrite persisted state with `collection`.
    fn flush(&self, collection: &PatientCollection) -> StoreResult<()>;
}

/// In-process backend (for testing).
#[derive(Debug, Default)]
pub struct MemoryBackend {
    collection: Mutex<PatientCollection>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing collection.
    pub fn with_collection(collection: PatientCollection) -> Self {
        Self {
            collection: Mutex::new(collection),
        }
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self) -> StoreResult<PatientCollection> {
        Ok(self.collection.lock()?.clone())
    }

    fn flush(&self, collection: &PatientCollection) -> StoreResult<()> {
        *self.collection.lock()? = collection.clone();
        Ok(())
    }
}
