use serde::Serialize;

use crate::model::expectation::GRADE_EPSILON;
use crate::model::MemberWithData;

/// Minimum spread between the most and least ambitious grade aims that
/// counts as a goal mismatch
pub const CONFLICT_THRESHOLD: f64 = 1.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictSignal {
    pub has_conflict: bool,
    /// Most ambitious (numerically smallest) aim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Least ambitious (numerically largest) aim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl ConflictSignal {
    pub fn spread(&self) -> Option<f64> {
        Some(self.max? - self.min?)
    }
}

/// Compares grade aims across the roster.
///
/// Only members with a questionnaire and a positive expectation level take
/// part; zero means "no opinion". Fewer than two opinions never conflict.
pub fn compute_conflict(members: &[MemberWithData]) -> ConflictSignal {
    let levels: Vec<f64> = members
        .iter()
        .filter_map(|m| m.questionnaire.as_ref())
        .map(|q| q.expectation_level)
        .filter(|level| level.is_finite() && *level > 0.0)
        .collect();

    let min = levels.iter().copied().reduce(f64::min);
    let max = levels.iter().copied().reduce(f64::max);

    let has_conflict = match (min, max) {
        (Some(lo), Some(hi)) if levels.len() >= 2 => hi - lo + GRADE_EPSILON >= CONFLICT_THRESHOLD,
        _ => false,
    };

    ConflictSignal { has_conflict, min, max }
}
