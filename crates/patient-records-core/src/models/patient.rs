//! Patient models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::metrics::{HealthMetrics, Verdict};
use super::record::FieldMap;
use super::validation::{FieldViolation, ValidationError};

/// Ages must fall strictly between 0 and this.
pub const MAX_AGE_EXCLUSIVE: i64 = 120;

const NON_EMPTY: &str = "must not be empty";
const AGE_RANGE: &str = "must be greater than 0 and less than 120";
const POSITIVE: &str = "must be greater than 0";
const GENDER_CHOICES: &str = "must be one of 'male', 'female', 'others'";

/// Patient gender.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }

    /// Parse the lowercase wire form.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == value)
    }
}

/// Base attributes of a patient, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientAttributes {
    /// Caller-supplied key, immutable after creation
    pub id: String,
    pub name: String,
    /// City where the patient lives
    pub city: String,
    pub age: i64,
    pub gender: Gender,
    /// Height in meters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
}

/// A validated patient with its derived health metrics.
///
/// The only ways to obtain one are [`Patient::new`] and
/// [`Patient::from_fields`], both of which validate every attribute and
/// recompute BMI and verdict. Fields are private so metrics can never drift
/// from height and weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Patient {
    #[serde(flatten)]
    attributes: PatientAttributes,
    #[serde(flatten)]
    metrics: HealthMetrics,
}

impl Patient {
    /// Validate typed attributes and derive metrics.
    pub fn new(attributes: PatientAttributes) -> Result<Self, ValidationError> {
        let mut violations = Vec::new();
        let mut check = |field: &str, violation: Option<&str>| {
            if let Some(message) = violation {
                violations.push(FieldViolation::new(field, message));
            }
        };
        check("id", text_violation(&attributes.id));
        check("name", text_violation(&attributes.name));
        check("city", text_violation(&attributes.city));
        check("age", age_violation(attributes.age));
        check("height", measure_violation(attributes.height));
        check("weight", measure_violation(attributes.weight));
        ValidationError::check(violations)?;

        let metrics = HealthMetrics::derive(attributes.height, attributes.weight);
        Ok(Self {
            attributes,
            metrics,
        })
    }

    /// Validate a loosely typed field map (a request body or a persisted
    /// record with its id re-inserted).
    ///
    /// Missing fields, wrong types and out-of-range values are all collected
    /// before failing. Any `bmi`/`verdict` keys in the map are ignored.
    pub fn from_fields(fields: &FieldMap) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(fields);
        let id = reader.text("id");
        let name = reader.text("name");
        let city = reader.text("city");
        let age = reader.age();
        let gender = reader.gender();
        let height = reader.measure("height");
        let weight = reader.measure("weight");

        match (id, name, city, age, gender, height, weight) {
            (Some(id), Some(name), Some(city), Some(age), Some(gender), Some(height), Some(weight)) => {
                Self::new(PatientAttributes {
                    id,
                    name,
                    city,
                    age,
                    gender,
                    height,
                    weight,
                })
            }
            _ => Err(ValidationError::from(reader.violations)),
        }
    }

    pub fn id(&self) -> &str {
        &self.attributes.id
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn city(&self) -> &str {
        &self.attributes.city
    }

    pub fn age(&self) -> i64 {
        self.attributes.age
    }

    pub fn gender(&self) -> Gender {
        self.attributes.gender
    }

    pub fn height(&self) -> f64 {
        self.attributes.height
    }

    pub fn weight(&self) -> f64 {
        self.attributes.weight
    }

    pub fn bmi(&self) -> f64 {
        self.metrics.bmi
    }

    pub fn verdict(&self) -> Verdict {
        self.metrics.verdict
    }

    pub fn attributes(&self) -> &PatientAttributes {
        &self.attributes
    }

    pub fn metrics(&self) -> HealthMetrics {
        self.metrics
    }

    /// Give back the base attributes, dropping the derived metrics.
    pub fn into_attributes(self) -> PatientAttributes {
        self.attributes
    }
}

fn text_violation(value: &str) -> Option<&'static str> {
    value.trim().is_empty().then_some(NON_EMPTY)
}

fn age_violation(age: i64) -> Option<&'static str> {
    (age <= 0 || age >= MAX_AGE_EXCLUSIVE).then_some(AGE_RANGE)
}

fn measure_violation(value: f64) -> Option<&'static str> {
    (!value.is_finite() || value <= 0.0).then_some(POSITIVE)
}

/// Pulls typed values out of a field map, recording a violation for each
/// field that is mistyped or out of range.
///
/// A full reader also rejects missing (or `null`) fields. A partial reader,
/// used for updates, skips them.
pub(super) struct FieldReader<'a> {
    fields: &'a FieldMap,
    partial: bool,
    violations: Vec<FieldViolation>,
}

impl<'a> FieldReader<'a> {
    pub(super) fn new(fields: &'a FieldMap) -> Self {
        Self {
            fields,
            partial: false,
            violations: Vec::new(),
        }
    }

    pub(super) fn partial(fields: &'a FieldMap) -> Self {
        Self {
            partial: true,
            ..Self::new(fields)
        }
    }

    /// `value` if nothing was rejected, otherwise every violation seen.
    pub(super) fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        ValidationError::check(self.violations).map(|()| value)
    }

    fn reject(&mut self, field: &str, message: &str) {
        self.violations.push(FieldViolation::new(field, message));
    }

    fn accept<T>(&mut self, field: &str, value: T, violation: Option<&str>) -> Option<T> {
        match violation {
            Some(message) => {
                self.reject(field, message);
                None
            }
            None => Some(value),
        }
    }

    fn lookup(&mut self, field: &str) -> Option<&'a Value> {
        let fields = self.fields;
        match fields.get(field) {
            None | Some(Value::Null) => {
                if !self.partial {
                    self.reject(field, "field required");
                }
                None
            }
            Some(value) => Some(value),
        }
    }

    pub(super) fn text(&mut self, field: &str) -> Option<String> {
        let value = self.lookup(field)?;
        let Some(text) = value.as_str() else {
            self.reject(field, "must be a string");
            return None;
        };
        self.accept(field, text.to_owned(), text_violation(text))
    }

    pub(super) fn age(&mut self) -> Option<i64> {
        let value = self.lookup("age")?;
        let Some(age) = as_integer(value) else {
            self.reject("age", "must be an integer");
            return None;
        };
        self.accept("age", age, age_violation(age))
    }

    pub(super) fn gender(&mut self) -> Option<Gender> {
        let value = self.lookup("gender")?;
        match value.as_str().and_then(Gender::parse) {
            Some(gender) => Some(gender),
            None => {
                self.reject("gender", GENDER_CHOICES);
                None
            }
        }
    }

    pub(super) fn measure(&mut self, field: &str) -> Option<f64> {
        let value = self.lookup(field)?;
        let Some(number) = value.as_f64() else {
            self.reject(field, "must be a number");
            return None;
        };
        self.accept(field, number, measure_violation(number))
    }
}

/// Integers, and floats with no fractional part (`30.0`).
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
            .map(|f| f as i64)
    })
}
