//! Field-level validation errors.

use serde::Serialize;
use thiserror::Error;

/// A single constraint violation on a named field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every violation found while validating one record.
#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(transparent)]
#[error("{}", describe(.violations))]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    /// `Ok(())` when nothing was collected.
    pub fn check(violations: Vec<FieldViolation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    /// Whether any violation names `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl From<Vec<FieldViolation>> for ValidationError {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }
}

fn describe(violations: &[FieldViolation]) -> String {
    let mut text = format!("{} invalid field(s)", violations.len());
    for violation in violations {
        text.push_str(&format!("; {}: {}", violation.field, violation.message));
    }
    text
}
