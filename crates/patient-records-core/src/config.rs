//! Store configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::store::{JsonFileBackend, PatientStore, SqliteBackend, StoreResult};

/// Default location of the persisted collection.
pub const DEFAULT_STORE_PATH: &str = "patients.json";

/// Which backend persists the collection.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackendKind {
    /// Single pretty-printed JSON file
    #[default]
    Json,
    /// SQLite database file
    Sqlite,
}

/// Where and how patients are stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub backend: StoreBackendKind,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            backend: StoreBackendKind::default(),
        }
    }
}

impl StoreConfig {
    /// Open a store over the configured backend.
    pub fn open(&self) -> StoreResult<PatientStore> {
        let store = match self.backend {
            StoreBackendKind::Json => PatientStore::new(JsonFileBackend::new(&self.path)),
            StoreBackendKind::Sqlite => PatientStore::new(SqliteBackend::open(&self.path)?),
        };
        Ok(store)
    }
}
