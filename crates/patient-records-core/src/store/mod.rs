//! Whole-collection patient store.
//!
//! Every mutation loads the full collection from the backend, changes it in
//! memory and flushes it back in one piece. There is no incremental access.

mod backend;
mod json_file;
mod sort;
mod sqlite;

pub use backend::*;
pub use json_file::*;
pub use sort::*;
pub use sqlite::*;

use std::sync::Mutex;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::{Patient, PatientRecord, PatientUpdate, ValidationError};

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Patient not found: {0}")]
    NotFound(String),

    #[error("Patient already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        StoreError::LockPoisoned(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Every stored patient, keyed by id, in insertion order.
///
/// New ids append, replacing an id keeps its slot and removal closes the gap.
/// The order survives flushes, so listings and sort tie-breaks are stable
/// across restarts.
pub type PatientCollection = IndexMap<String, PatientRecord>;

/// Patient store over an injected storage backend.
///
/// Mutations hold a per-store write lock across load, change and flush, so
/// writers sharing one `PatientStore` never lose each other's updates.
/// Separate processes writing the same file still race; the last flush wins.
pub struct PatientStore {
    backend: Box<dyn StorageBackend>,
    write_lock: Mutex<()>,
}

impl PatientStore {
    /// Create a store over `backend`.
    pub fn new<B: StorageBackend + 'static>(backend: B) -> Self {
        Self {
            backend: Box::new(backend),
            write_lock: Mutex::new(()),
        }
    }

    /// Create a store backed by memory only (for testing).
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Load the whole collection. Missing persisted state is empty.
    pub fn load_all(&self) -> StoreResult<PatientCollection> {
        let collection = self.backend.load()?;
        debug!(count = collection.len(), "loaded patient collection");
        Ok(collection)
    }

    /// Overwrite persisted state with `collection`.
    pub fn flush(&self, collection: &PatientCollection) -> StoreResult<()> {
        self.backend.flush(collection)?;
        debug!(count = collection.len(), "flushed patient collection");
        Ok(())
    }

    /// Get the stored record for `id`.
    pub fn get(&self, id: &str) -> StoreResult<PatientRecord> {
        self.load_all()?
            .swap_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Get the patient stored under `id`, revalidated with fresh metrics.
    pub fn get_patient(&self, id: &str) -> StoreResult<Patient> {
        Ok(self.get(id)?.to_patient(id)?)
    }

    /// All records ordered by `field`.
    pub fn list_sorted(&self, field: SortField, order: SortOrder) -> StoreResult<Vec<PatientRecord>> {
        Ok(sort_records(self.load_all()?, field, order))
    }

    /// Insert or replace the record for `patient.id()`.
    pub fn upsert_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.mutate(|collection| {
            collection.insert(patient.id().to_string(), PatientRecord::from(patient));
            Ok(())
        })?;
        info!(patient_id = patient.id(), "patient saved");
        Ok(())
    }

    /// Insert a new patient, refusing an id that is already stored.
    pub fn create_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.mutate(|collection| {
            if collection.contains_key(patient.id()) {
                return Err(StoreError::AlreadyExists(patient.id().to_string()));
            }
            collection.insert(patient.id().to_string(), PatientRecord::from(patient));
            Ok(())
        })?;
        info!(patient_id = patient.id(), "patient created");
        Ok(())
    }

    /// Apply a partial update to the patient stored under `id`.
    ///
    /// Returns the rebuilt patient, whose metrics reflect the merged height
    /// and weight.
    pub fn update_patient(&self, id: &str, update: &PatientUpdate) -> StoreResult<Patient> {
        let patient = self.mutate(|collection| {
            let existing = collection
                .get(id)
                .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
            let patient = update.apply(id, existing)?;
            collection.insert(id.to_string(), PatientRecord::from(&patient));
            Ok(patient)
        })?;
        info!(patient_id = id, bmi = patient.bmi(), verdict = %patient.verdict(), "patient updated");
        Ok(patient)
    }

    /// Remove the patient stored under `id`.
    pub fn delete_patient(&self, id: &str) -> StoreResult<()> {
        self.mutate(|collection| {
            collection
                .shift_remove(id)
                .map(|_| ())
                .ok_or_else(|| StoreError::NotFound(id.to_string()))
        })?;
        info!(patient_id = id, "patient deleted");
        Ok(())
    }

    /// Load, apply `change`, flush. Nothing is flushed if `change` fails.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut PatientCollection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let _guard = self.write_lock.lock()?;
        let mut collection = self.load_all()?;
        let result = change(&mut collection)?;
        self.flush(&collection)?;
        Ok(result)
    }
}
