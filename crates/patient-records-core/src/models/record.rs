//! Persisted record data.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patient::Patient;
use super::validation::ValidationError;

/// A loosely typed JSON object, as received over the wire or read from disk.
pub type FieldMap = serde_json::Map<String, Value>;

/// The stored field set of one patient: base attributes plus the metrics last
/// derived from them.
///
/// The id is the collection key and is not repeated inside. Kept as a JSON
/// object rather than a typed struct so hand-edited or partial entries still
/// load, list and sort; anything that needs a trustworthy view goes through
/// [`PatientRecord::to_patient`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatientRecord(FieldMap);

impl PatientRecord {
    pub fn new(fields: FieldMap) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &FieldMap {
        &self.0
    }

    pub fn into_fields(self) -> FieldMap {
        self.0
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Numeric value of `field`, if present and a number.
    pub fn number(&self, field: &str) -> Option<f64> {
        self.0.get(field).and_then(Value::as_f64)
    }

    /// String value of `field`, if present and a string.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Rebuild the patient stored under `id`, revalidating and recomputing
    /// its metrics.
    pub fn to_patient(&self, id: &str) -> Result<Patient, ValidationError> {
        let mut fields = self.0.clone();
        fields.insert("id".into(), Value::from(id));
        Patient::from_fields(&fields)
    }
}

impl From<&Patient> for PatientRecord {
    fn from(patient: &Patient) -> Self {
        let mut fields = FieldMap::new();
        fields.insert("name".into(), Value::from(patient.name()));
        fields.insert("city".into(), Value::from(patient.city()));
        fields.insert("age".into(), Value::from(patient.age()));
        fields.insert("gender".into(), Value::from(patient.gender().as_str()));
        fields.insert("height".into(), Value::from(patient.height()));
        fields.insert("weight".into(), Value::from(patient.weight()));
        fields.insert("bmi".into(), Value::from(patient.bmi()));
        fields.insert("verdict".into(), Value::from(patient.verdict().as_str()));
        Self(fields)
    }
}

impl From<Patient> for PatientRecord {
    fn from(patient: Patient) -> Self {
        Self::from(&patient)
    }
}
