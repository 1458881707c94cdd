//! Partial updates to stored patients.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::patient::{FieldReader, Gender, Patient};
use super::record::{FieldMap, PatientRecord};
use super::validation::ValidationError;

/// Fields a caller may change on an existing patient.
///
/// `id`, `bmi` and `verdict` are deliberately absent. Omitted (or `null`)
/// fields leave the stored value untouched. Deserializing goes through
/// [`PatientUpdate::from_fields`], so both paths accept the same input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FieldMap")]
pub struct PatientUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl TryFrom<FieldMap> for PatientUpdate {
    type Error = ValidationError;

    fn try_from(fields: FieldMap) -> Result<Self, Self::Error> {
        Self::from_fields(&fields)
    }
}

impl PatientUpdate {
    /// Read an update from a loosely typed body.
    ///
    /// Every provided field is type and range checked the same way a full
    /// record is, and all violations are reported together. Keys outside the
    /// update set (`id`, `bmi`, `verdict`, unknown names) are ignored.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::partial(fields);
        let update = Self {
            name: reader.text("name"),
            city: reader.text("city"),
            age: reader.age(),
            gender: reader.gender(),
            height: reader.measure("height"),
            weight: reader.measure("weight"),
        };
        reader.finish(update)
    }

    /// True when no field was provided.
    pub fn is_empty(&self) -> bool {
        self.provided_fields().is_empty()
    }

    /// Only the fields the caller actually set.
    pub fn provided_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        if let Some(name) = &self.name {
            fields.insert("name".into(), Value::from(name.as_str()));
        }
        if let Some(city) = &self.city {
            fields.insert("city".into(), Value::from(city.as_str()));
        }
        if let Some(age) = self.age {
            fields.insert("age".into(), Value::from(age));
        }
        if let Some(gender) = self.gender {
            fields.insert("gender".into(), Value::from(gender.as_str()));
        }
        if let Some(height) = self.height {
            fields.insert("height".into(), Value::from(height));
        }
        if let Some(weight) = self.weight {
            fields.insert("weight".into(), Value::from(weight));
        }
        fields
    }

    /// Overlay this update on the stored record for `id` and rebuild a full
    /// patient from the result.
    ///
    /// Runs the same validation as a fresh record, so an update can neither
    /// smuggle in an out-of-range value nor leave BMI and verdict stale.
    pub fn apply(&self, id: &str, existing: &PatientRecord) -> Result<Patient, ValidationError> {
        let mut merged = existing.fields().clone();
        merged.extend(self.provided_fields());
        merged.insert("id".into(), Value::from(id));
        Patient::from_fields(&merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PatientAttributes, Verdict};
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn stored() -> PatientRecord {
        let patient = Patient::new(PatientAttributes {
            id: "P001".into(),
            name: "Ananya Verma".into(),
            city: "Guwahati".into(),
            age: 28,
            gender: Gender::Female,
            height: 1.75,
            weight: 75.2,
        })
        .unwrap();
        PatientRecord::from(&patient)
    }

    #[test]
    fn test_weight_change_recomputes_metrics() {
        let update = PatientUpdate {
            weight: Some(100.0),
            ..Default::default()
        };

        let patient = update.apply("P001", &stored()).unwrap();
        assert_eq!(patient.bmi(), 32.65);
        assert_eq!(patient.verdict(), Verdict::Obese);
        assert_eq!(patient.id(), "P001");
        assert_eq!(patient.name(), "Ananya Verma");
        assert_eq!(patient.city(), "Guwahati");
    }

    #[test]
    fn test_name_change_keeps_metrics() {
        let update = PatientUpdate {
            name: Some("Ananya V.".into()),
            city: Some("Delhi".into()),
            ..Default::default()
        };

        let patient = update.apply("P001", &stored()).unwrap();
        assert_eq!(patient.name(), "Ananya V.");
        assert_eq!(patient.city(), "Delhi");
        assert_eq!(patient.bmi(), 24.56);
        assert_eq!(patient.verdict(), Verdict::Normal);
    }

    #[test]
    fn test_update_cannot_bypass_validation() {
        let update = PatientUpdate {
            age: Some(150),
            height: Some(0.0),
            ..Default::default()
        };

        let err = update.apply("P001", &stored()).unwrap_err();
        assert!(err.has_field("age"));
        assert!(err.has_field("height"));
    }

    #[test]
    fn test_update_repairs_incomplete_record() {
        let mut fields = stored().into_fields();
        fields.remove("city");
        let incomplete = PatientRecord::new(fields);

        assert!(PatientUpdate::default().apply("P001", &incomplete).is_err());

        let update = PatientUpdate {
            city: Some("Shillong".into()),
            ..Default::default()
        };
        assert_eq!(update.apply("P001", &incomplete).unwrap().city(), "Shillong");
    }

    #[test]
    fn test_deserialize_omits_missing_fields() {
        let update: PatientUpdate = serde_json::from_str(r#"{"weight": 80.5, "city": null}"#).unwrap();
        assert_eq!(update.weight, Some(80.5));
        assert_eq!(update.city, None);
        assert!(!update.is_empty());

        let provided = update.provided_fields();
        assert_eq!(provided.len(), 1);
        assert!(provided.contains_key("weight"));
    }

    #[test]
    fn test_unknown_gender_rejected_at_parse() {
        let result: Result<PatientUpdate, _> = serde_json::from_str(r#"{"gender": "robot"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_fields_collects_every_violation() {
        let body = fields(json!({
            "name": 5,
            "age": "old",
            "gender": "robot",
            "height": 1.7,
            "weight": "heavy"
        }));

        let err = PatientUpdate::from_fields(&body).unwrap_err();
        let failed: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(failed, vec!["name", "age", "gender", "weight"]);
    }

    #[test]
    fn test_from_fields_accepts_integral_float_age() {
        let update = PatientUpdate::from_fields(&fields(json!({"age": 30.0}))).unwrap();
        assert_eq!(update.age, Some(30));

        let err = PatientUpdate::from_fields(&fields(json!({"age": 30.5}))).unwrap_err();
        assert!(err.has_field("age"));
    }

    #[test]
    fn test_from_fields_ignores_fixed_and_derived_keys() {
        let body = fields(json!({"id": "P999", "bmi": 1.0, "verdict": "Obese", "city": "Pune"}));
        let update = PatientUpdate::from_fields(&body).unwrap();
        assert_eq!(
            update,
            PatientUpdate {
                city: Some("Pune".into()),
                ..Default::default()
            }
        );
    }
}
