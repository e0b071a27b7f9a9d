use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expectation::ExpectationLevel;
use crate::alignment::slots::SLOT_COUNT;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
}

/// Stored check-in answers of one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub user_id: String,
    /// Raw grade aim; 0 means the member gave no opinion
    #[serde(default)]
    pub expectation_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realistic_expectation: Option<f64>,
    #[serde(default = "default_scale")]
    pub grade_vs_learning: u8,
    #[serde(default = "default_scale")]
    pub project_experience: u8,
    #[serde(default)]
    pub weekly_hours: u32,
    #[serde(default)]
    pub prior_experience_takeaway: String,
    #[serde(default)]
    pub course_motivation: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_role: Option<String>,
    #[serde(default)]
    pub meeting_frequency: String,
    #[serde(default)]
    pub project_methodology: String,
    /// Selected weekly slots, `day * 24 + hour`
    #[serde(default, rename = "availabilityJson")]
    pub availability: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Questionnaire {
    pub fn expectation(&self) -> Option<ExpectationLevel> {
        ExpectationLevel::from_value(self.expectation_level)
    }
}

fn default_scale() -> u8 {
    3
}

fn default_weekly_hours() -> u32 {
    5
}

fn default_meeting_frequency() -> String {
    "1x / week".to_string()
}

fn default_methodology() -> String {
    "Flexible".to_string()
}

/// Questionnaire body sent by a member
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireSubmission {
    pub expectation_level: f64,
    #[serde(default)]
    pub realistic_expectation: Option<f64>,
    #[serde(default = "default_scale")]
    pub grade_vs_learning: u8,
    #[serde(default = "default_scale")]
    pub project_experience: u8,
    #[serde(default = "default_weekly_hours")]
    pub weekly_hours: u32,
    #[serde(default)]
    pub prior_experience_takeaway: String,
    #[serde(default)]
    pub course_motivation: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub preferred_role: Option<String>,
    #[serde(default = "default_meeting_frequency")]
    pub meeting_frequency: String,
    #[serde(default = "default_methodology")]
    pub project_methodology: String,
    #[serde(default, rename = "availabilityJson")]
    pub availability: Vec<i64>,
}

impl QuestionnaireSubmission {
    /// Builds the stored record; slots are deduplicated and sorted.
    pub fn into_questionnaire(self, user_id: &str, now: DateTime<Utc>) -> Questionnaire {
        let mut availability = self.availability;
        availability.sort_unstable();
        availability.dedup();

        let preferred_role = self
            .preferred_role
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Questionnaire {
            user_id: user_id.to_string(),
            expectation_level: self.expectation_level,
            realistic_expectation: self.realistic_expectation,
            grade_vs_learning: self.grade_vs_learning,
            project_experience: self.project_experience,
            weekly_hours: self.weekly_hours,
            prior_experience_takeaway: self.prior_experience_takeaway,
            course_motivation: self.course_motivation,
            skills: self
                .skills
                .into_iter()
                .map(|s| Skill {
                    name: s.name.trim().to_string(),
                    level: s.level,
                })
                .collect(),
            preferred_role,
            meeting_frequency: self.meeting_frequency,
            project_methodology: self.project_methodology,
            availability,
            submitted_at: Some(now),
        }
    }
}

/// Validates a questionnaire submission
pub fn validate_submission(req: &QuestionnaireSubmission) -> Result<()> {
    if ExpectationLevel::from_value(req.expectation_level).is_none() {
        return Err(Error::InvalidInput(format!(
            "Expectation level {} is not a grade step",
            req.expectation_level
        )));
    }

    if let Some(realistic) = req.realistic_expectation {
        if ExpectationLevel::from_value(realistic).is_none() {
            return Err(Error::InvalidInput(format!(
                "Realistic expectation {} is not a grade step",
                realistic
            )));
        }
    }

    if !(1..=5).contains(&req.grade_vs_learning) {
        return Err(Error::InvalidInput("Grade vs learning must be between 1 and 5".to_string()));
    }
    if !(1..=5).contains(&req.project_experience) {
        return Err(Error::InvalidInput("Project experience must be between 1 and 5".to_string()));
    }

    for &slot in &req.availability {
        if slot < 0 || slot >= SLOT_COUNT as i64 {
            return Err(Error::InvalidInput(format!("Invalid availability slot: {}", slot)));
        }
    }

    if req.skills.iter().any(|s| s.name.trim().is_empty()) {
        return Err(Error::InvalidInput("Skill names must not be empty".to_string()));
    }

    Ok(())
}
