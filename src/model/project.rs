use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub role: String,
    pub email: String,
}

/// Links and meeting details shared on the group dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub zoom_link: String,
    #[serde(default)]
    pub drive_link: String,
    #[serde(default)]
    pub task_board_link: String,
    #[serde(default)]
    pub weekly_meeting_time: String,
}

impl ProjectConfig {
    pub fn empty(group_id: &str, weekly_meeting_time: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            contacts: Vec::new(),
            zoom_link: String::new(),
            drive_link: String::new(),
            task_board_link: String::new(),
            weekly_meeting_time: weekly_meeting_time.to_string(),
        }
    }

    pub fn with_meeting_time(&self, weekly_meeting_time: &str) -> Self {
        Self {
            weekly_meeting_time: weekly_meeting_time.to_string(),
            ..self.clone()
        }
    }
}
