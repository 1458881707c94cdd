//! JSON file backend.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::{PatientCollection, StorageBackend, StoreResult};

/// Stores the collection as one pretty-printed JSON object keyed by id.
///
/// Flushing truncates and rewrites the file in place. A crash mid-write can
/// leave it truncated.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self) -> StoreResult<PatientCollection> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PatientCollection::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&contents)?)
    }

    fn flush(&self, collection: &PatientCollection) -> StoreResult<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"    "));
        collection.serialize(&mut serializer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FieldMap, PatientRecord};
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: serde_json::Value) -> PatientRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("patients.json"));
        assert!(backend.load().unwrap().is_empty());
    }

    #[test]
    fn test_flush_then_load() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("patients.json"));

        let mut collection = PatientCollection::new();
        collection.insert("P001".into(), record(json!({"name": "Ananya", "bmi": 24.56})));
        backend.flush(&collection).unwrap();

        assert_eq!(backend.load().unwrap(), collection);

        let text = fs::read_to_string(backend.path()).unwrap();
        assert!(text.starts_with("{\n    \"P001\": {\n        "));
    }

    #[test]
    fn test_flush_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("patients.json"));

        let mut collection = PatientCollection::new();
        collection.insert("P001".into(), PatientRecord::new(FieldMap::new()));
        collection.insert("P002".into(), PatientRecord::new(FieldMap::new()));
        backend.flush(&collection).unwrap();

        collection.shift_remove("P001");
        backend.flush(&collection).unwrap();

        let loaded = backend.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("P002"));
    }

    #[test]
    fn test_rewrite_preserves_key_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.json");
        fs::write(
            &path,
            r#"{"P010": {"name": "Kavya", "city": "Mumbai"}, "P002": {"name": "Rahul", "age": 40}}"#,
        )
        .unwrap();

        let backend = JsonFileBackend::new(&path);
        let collection = backend.load().unwrap();
        assert_eq!(collection.keys().collect::<Vec<_>>(), vec!["P010", "P002"]);
        backend.flush(&collection).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let position = |needle: &str| text.find(needle).unwrap();
        assert!(position("\"P010\"") < position("\"P002\""));
        assert!(position("\"name\": \"Kavya\"") < position("\"city\""));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patients.json");
        fs::write(&path, "{ not json").unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(matches!(backend.load(), Err(crate::store::StoreError::Json(_))));
    }
}
