//! Sorted listings.

use std::fmt;
use std::str::FromStr;

use tracing::warn;

use super::{PatientCollection, StoreError};
use crate::models::PatientRecord;

/// Numeric fields a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Height,
    Weight,
    Bmi,
}

impl SortField {
    pub const ALL: [SortField; 3] = [SortField::Height, SortField::Weight, SortField::Bmi];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Height => "height",
            SortField::Weight => "weight",
            SortField::Bmi => "bmi",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|f| f.as_str() == s).ok_or_else(|| {
            StoreError::InvalidArgument("Invalid field. Choose from ['height', 'weight', 'bmi']".into())
        })
    }
}

/// Listing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(StoreError::InvalidArgument("Invalid order. Choose 'asc' or 'desc'".into())),
        }
    }
}

/// Order every record in `collection` by `field`.
///
/// The sort is stable in both directions: records with equal keys keep their
/// collection order. A missing or non-numeric value sorts as 0.
pub fn sort_records(
    collection: PatientCollection,
    field: SortField,
    order: SortOrder,
) -> Vec<PatientRecord> {
    let mut keyed: Vec<(f64, PatientRecord)> = collection
        .into_iter()
        .map(|(id, record)| (sort_key(&id, &record, field), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match order {
        SortOrder::Asc => a.total_cmp(b),
        SortOrder::Desc => b.total_cmp(a),
    });

    keyed.into_iter().map(|(_, record)| record).collect()
}

fn sort_key(id: &str, record: &PatientRecord, field: SortField) -> f64 {
    match record.get(field.as_str()) {
        Some(value) => value.as_f64().unwrap_or_else(|| {
            warn!(patient_id = id, field = field.as_str(), %value, "non-numeric sort value, treating as 0");
            0.0
        }),
        None => {
            warn!(patient_id = id, field = field.as_str(), "missing sort value, treating as 0");
            0.0
        }
    }
}
