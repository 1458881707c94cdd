//! Health metrics derived from height and weight.

use serde::{Deserialize, Serialize};

/// BMI below this is underweight.
pub const UNDERWEIGHT_BELOW: f64 = 18.5;
/// BMI at or above this is obese.
pub const OBESE_FROM: f64 = 25.0;

/// Categorical health classification derived from BMI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Verdict {
    Underweight,
    Normal,
    Obese,
}

impl Verdict {
    /// Classify a (rounded) BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < UNDERWEIGHT_BELOW {
            Verdict::Underweight
        } else if bmi < OBESE_FROM {
            Verdict::Normal
        } else {
            Verdict::Obese
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Underweight => "Underweight",
            Verdict::Normal => "Normal",
            Verdict::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body-mass index and the verdict computed from it.
///
/// Always produced together by [`HealthMetrics::derive`]; the verdict is a
/// function of the rounded BMI, not of the raw height and weight.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct HealthMetrics {
    pub bmi: f64,
    pub verdict: Verdict,
}

impl HealthMetrics {
    /// Compute metrics for a height in meters and a weight in kilograms.
    pub fn derive(height: f64, weight: f64) -> Self {
        let bmi = round_to_hundredths(weight / height.powi(2));
        Self {
            bmi,
            verdict: Verdict::from_bmi(bmi),
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
