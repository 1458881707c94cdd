//! Patient store integration tests against real files.

use std::fs;

use patient_records_core::models::{FieldMap, Patient, PatientUpdate};
use patient_records_core::store::{
    JsonFileBackend, PatientStore, SortField, SortOrder, SqliteBackend, StoreError,
};
use serde_json::{json, Value};
use tempfile::TempDir;

fn make_patient(id: &str, name: &str, height: f64, weight: f64) -> Patient {
    let fields: FieldMap = match json!({
        "id": id,
        "name": name,
        "city": "Delhi",
        "age": 30,
        "gender": "male",
        "height": height,
        "weight": weight,
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    Patient::from_fields(&fields).unwrap()
}

fn seed(store: &PatientStore) {
    store.upsert_patient(&make_patient("P001", "Ananya", 1.75, 75.2)).unwrap();
    store.upsert_patient(&make_patient("P002", "Ravi", 1.60, 45.0)).unwrap();
    store.upsert_patient(&make_patient("P003", "Sneha", 1.80, 95.0)).unwrap();
}

#[test]
fn test_json_file_full_lifecycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.json");
    let store = PatientStore::new(JsonFileBackend::new(&path));

    // No file yet
    assert!(store.load_all().unwrap().is_empty());
    assert!(!path.exists());

    seed(&store);
    assert!(path.exists());

    let update = PatientUpdate {
        weight: Some(100.0),
        ..Default::default()
    };
    store.update_patient("P001", &update).unwrap();
    store.delete_patient("P002").unwrap();

    // A second store over the same file sees every change
    let reopened = PatientStore::new(JsonFileBackend::new(&path));
    let collection = reopened.load_all().unwrap();
    assert_eq!(collection.len(), 2);

    let p001 = &collection["P001"];
    assert_eq!(p001.number("bmi"), Some(32.65));
    assert_eq!(p001.text("verdict"), Some("Obese"));
    assert_eq!(p001.text("name"), Some("Ananya"));
    assert!(matches!(reopened.get("P002"), Err(StoreError::NotFound(_))));
}

#[test]
fn test_persisted_layout() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.json");
    let store = PatientStore::new(JsonFileBackend::new(&path));
    seed(&store);

    let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let p001 = &raw["P001"];
    assert!(p001.get("id").is_none());
    assert_eq!(p001["name"], "Ananya");
    assert_eq!(p001["gender"], "male");
    assert_eq!(p001["bmi"], 24.56);
    assert_eq!(p001["verdict"], "Normal");
}

#[test]
fn test_loads_hand_written_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.json");
    fs::write(
        &path,
        r#"{
            "P001": {"name": "Ananya", "city": "Guwahati", "age": 28, "gender": "female",
                     "height": 1.65, "weight": 90.0, "bmi": 33.06, "verdict": "Obese"},
            "P002": {"name": "Ravi", "city": "Kolkata", "age": 35, "gender": "male",
                     "weight": 68.0}
        }"#,
    )
    .unwrap();

    let store = PatientStore::new(JsonFileBackend::new(&path));

    // P002 has no height or bmi; it still lists, sorting as 0
    let sorted = store.list_sorted(SortField::Height, SortOrder::Asc).unwrap();
    let names: Vec<_> = sorted.iter().filter_map(|r| r.text("name")).collect();
    assert_eq!(names, vec!["Ravi", "Ananya"]);

    // Updating the incomplete record fails validation and changes nothing
    let result = store.update_patient("P002", &PatientUpdate::default());
    assert!(matches!(result, Err(StoreError::Validation(ref e)) if e.has_field("height")));

    // Supplying the missing field repairs it and derives metrics
    let update = PatientUpdate {
        height: Some(1.7),
        ..Default::default()
    };
    let repaired = store.update_patient("P002", &update).unwrap();
    assert_eq!(repaired.bmi(), 23.53);
    assert_eq!(store.get("P002").unwrap().text("verdict"), Some("Normal"));
}

#[test]
fn test_sqlite_store_lifecycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.db");
    let store = PatientStore::new(SqliteBackend::open(&path).unwrap());
    seed(&store);

    let asc = store.list_sorted(SortField::Weight, SortOrder::Asc).unwrap();
    let weights: Vec<_> = asc.iter().filter_map(|r| r.number("weight")).collect();
    assert_eq!(weights, vec![45.0, 75.2, 95.0]);

    store.delete_patient("P003").unwrap();
    drop(store);

    let reopened = PatientStore::new(SqliteBackend::open(&path).unwrap());
    assert_eq!(reopened.load_all().unwrap().len(), 2);
    assert_eq!(reopened.get_patient("P001").unwrap().bmi(), 24.56);
}
