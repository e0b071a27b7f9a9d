use serde::{Deserialize, Serialize};

use super::questionnaire::Questionnaire;

/// A person belonging to one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub group_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub has_submitted: bool,
}

impl Member {
    pub fn new(id: String, group_id: String, name: String, is_admin: bool) -> Self {
        Self {
            id,
            group_id,
            name,
            role: None,
            is_admin,
            has_submitted: false,
        }
    }

    pub fn with_role(&self, role: &str) -> Self {
        Self {
            role: Some(role.to_string()),
            ..self.clone()
        }
    }

    pub fn submitted(&self) -> Self {
        Self {
            has_submitted: true,
            ..self.clone()
        }
    }
}

/// A member paired with its questionnaire, if one was submitted.
/// This is the engine's input record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberWithData {
    #[serde(flatten)]
    pub member: Member,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire: Option<Questionnaire>,
}

impl MemberWithData {
    pub fn new(member: Member, questionnaire: Option<Questionnaire>) -> Self {
        Self { member, questionnaire }
    }
}
