use serde::{Deserialize, Serialize};

/// Tolerance used when matching raw grade values against the scale
pub const GRADE_EPSILON: f64 = 1e-9;

/// The ten-step grade scale a member aims for.
///
/// Variants are declared from most to least ambitious, so the derived
/// ordering reads "smaller is more ambitious", matching the numeric grade
/// where 1.0 is the best outcome and 4.0 a bare pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExpectationLevel {
    Grade10,
    Grade13,
    Grade17,
    Grade20,
    Grade23,
    Grade27,
    Grade30,
    Grade33,
    Grade37,
    Grade40,
}

impl ExpectationLevel {
    /// All steps, most ambitious first
    pub const STEPS: [ExpectationLevel; 10] = [
        ExpectationLevel::Grade10,
        ExpectationLevel::Grade13,
        ExpectationLevel::Grade17,
        ExpectationLevel::Grade20,
        ExpectationLevel::Grade23,
        ExpectationLevel::Grade27,
        ExpectationLevel::Grade30,
        ExpectationLevel::Grade33,
        ExpectationLevel::Grade37,
        ExpectationLevel::Grade40,
    ];

    pub fn value(self) -> f64 {
        match self {
            ExpectationLevel::Grade10 => 1.0,
            ExpectationLevel::Grade13 => 1.3,
            ExpectationLevel::Grade17 => 1.7,
            ExpectationLevel::Grade20 => 2.0,
            ExpectationLevel::Grade23 => 2.3,
            ExpectationLevel::Grade27 => 2.7,
            ExpectationLevel::Grade30 => 3.0,
            ExpectationLevel::Grade33 => 3.3,
            ExpectationLevel::Grade37 => 3.7,
            ExpectationLevel::Grade40 => 4.0,
        }
    }

    /// Maps a raw grade back onto the scale, or None if it is not one of the steps
    pub fn from_value(value: f64) -> Option<Self> {
        Self::STEPS
            .iter()
            .copied()
            .find(|step| (step.value() - value).abs() < GRADE_EPSILON)
    }

    pub fn label(self) -> String {
        match self {
            ExpectationLevel::Grade10 => "1.0 (Very Good)".to_string(),
            ExpectationLevel::Grade40 => "4.0 (Pass)".to_string(),
            other => format!("{:.1}", other.value()),
        }
    }
}
