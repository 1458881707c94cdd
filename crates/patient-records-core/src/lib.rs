//! Patient Records Core Library
//!
//! Validated patient records with derived health metrics, kept in a flat
//! collection that is rewritten in full on every change.
//!
//! # Architecture
//!
//! ```text
//! request body ──► Patient::from_fields ─┐
//!                                        ├─► validate ─► derive (bmi, verdict)
//! PatientUpdate::apply(stored record) ───┘                     │
//!                                                              ▼
//!                          PatientStore: load all ─► change ─► flush all
//!                                                              │
//!                                           ┌──────────────────┼──────────────┐
//!                                           ▼                  ▼              ▼
//!                                       JSON file           SQLite         memory
//! ```
//!
//! # Core Principle
//!
//! **Derived fields are never a source of truth.** BMI and verdict are
//! recomputed from height and weight every time a [`Patient`] is built,
//! including after a partial update.
//!
//! # Modules
//!
//! - [`models`]: Patient, partial update, metrics and validation errors
//! - [`store`]: Whole-collection store and its storage backends
//! - [`config`]: Backend selection

pub mod config;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use config::{StoreBackendKind, StoreConfig};
pub use models::{
    FieldMap, FieldViolation, Gender, HealthMetrics, Patient, PatientAttributes, PatientRecord,
    PatientUpdate, ValidationError, Verdict,
};
pub use store::{
    JsonFileBackend, MemoryBackend, PatientCollection, PatientStore, SortField, SortOrder,
    SqliteBackend, StorageBackend, StoreError, StoreResult,
};
