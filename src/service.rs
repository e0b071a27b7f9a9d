//! Group lifecycle: create, join, check in, review, finalize.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::alignment::{analyze, AlignmentReport};
use crate::error::{Error, Result};
use crate::model::{
    validate_submission, Group, Member, MemberWithData, ProjectConfig, Questionnaire, QuestionnaireSubmission,
};
use crate::session::{self, SessionClaims};
use crate::store::Store;

const ID_LEN: usize = 9;
const CODE_LEN: usize = 6;
const CODE_ATTEMPTS: usize = 16;

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: Member,
    pub group: Group,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub user: Member,
    pub group: Group,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStatus {
    pub total_members: usize,
    pub submitted_count: usize,
    pub users: Vec<Member>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub group: Group,
    pub config: ProjectConfig,
    pub users: Vec<MemberWithData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeRequest {
    pub weekly_meeting_time: String,
    /// member id -> role
    #[serde(default)]
    pub assigned_roles: HashMap<String, String>,
}

#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn Store>,
    secret: String,
}

impl GroupService {
    pub fn new(store: Arc<dyn Store>, secret: impl Into<String>) -> Self {
        Self {
            store,
            secret: secret.into(),
        }
    }

    /// Creates a group with the caller as its admin
    pub fn create_group(&self, project_name: &str, admin_name: &str) -> Result<AuthResponse> {
        let project_name = required(project_name, "Project name")?;
        let admin_name = required(admin_name, "Name")?;

        let group = Group::new(random_id(), self.unused_code()?, project_name);
        let admin = Member::new(random_id(), group.id.clone(), admin_name, true);

        self.store.create_group(group.clone(), admin.clone())?;
        log::info!("Created group {} ({}) with code {}", group.project_name, group.id, group.code);

        self.auth_response(admin, group)
    }

    /// Joins by code, or logs back in when the name already exists in the group
    pub fn join_group(&self, code: &str, name: &str) -> Result<AuthResponse> {
        let code = required(code, "Group code")?;
        let name = required(name, "Name")?;

        let group = self
            .store
            .group_by_code(&code)?
            .ok_or_else(|| Error::NotFound("Group".to_string()))?;

        let candidate = Member::new(random_id(), group.id.clone(), name, false);
        let (user, inserted) = self.store.join_or_get(candidate)?;
        if inserted {
            log::info!("Member {} joined group {}", user.id, group.id);
        } else {
            log::info!("Member {} rejoined group {}", user.id, group.id);
        }

        self.auth_response(user, group)
    }

    /// Checks a token and loads the member and group it names
    pub fn validate_session(&self, token: &str) -> Result<SessionInfo> {
        let claims = session::verify(token, &self.secret, Utc::now().timestamp_millis())?;
        let user = self
            .store
            .member_by_id(&claims.sub)?
            .ok_or_else(|| Error::Unauthorized("unknown member".to_string()))?;
        let group = self
            .store
            .group_by_id(&claims.group_id)?
            .ok_or_else(|| Error::Unauthorized("unknown group".to_string()))?;

        if user.group_id != group.id {
            return Err(Error::Unauthorized("member does not belong to group".to_string()));
        }
        Ok(SessionInfo { user, group })
    }

    pub fn submit_questionnaire(&self, member_id: &str, submission: QuestionnaireSubmission) -> Result<Questionnaire> {
        validate_submission(&submission)?;

        let questionnaire = submission.into_questionnaire(member_id, Utc::now());
        self.store.submit_questionnaire(questionnaire.clone())?;
        log::info!(
            "Member {} submitted questionnaire ({} slots)",
            member_id,
            questionnaire.availability.len()
        );

        Ok(questionnaire)
    }

    pub fn group_status(&self, group_id: &str) -> Result<GroupStatus> {
        let roster = self.store.roster(group_id)?;
        Ok(GroupStatus {
            total_members: roster.len(),
            submitted_count: roster.iter().filter(|m| m.questionnaire.is_some()).count(),
            users: roster.into_iter().map(|m| m.member).collect(),
        })
    }

    pub fn alignment_data(&self, group_id: &str) -> Result<AlignmentReport> {
        self.require_group(group_id)?;
        let report = analyze(self.store.roster(group_id)?);
        log::debug!(
            "Alignment for group {}: {}/{} submitted, conflict={}",
            group_id,
            report.submitted_count,
            report.total_members,
            report.conflict.has_conflict
        );
        Ok(report)
    }

    /// Locks the group, assigns roles and records the weekly meeting time
    pub fn finalize_group(&self, group_id: &str, request: FinalizeRequest) -> Result<Group> {
        let meeting_time = required(&request.weekly_meeting_time, "Weekly meeting time")?;
        let finalized = self
            .store
            .finalize(group_id, &meeting_time, &request.assigned_roles)?;

        log::info!("Finalized group {} with meeting time {:?}", group_id, meeting_time);
        Ok(finalized)
    }

    pub fn update_project_config(&self, group_id: &str, config: ProjectConfig) -> Result<ProjectConfig> {
        self.require_group(group_id)?;
        let config = ProjectConfig {
            group_id: group_id.to_string(),
            ..config
        };
        self.store.put_project_config(config.clone())?;
        Ok(config)
    }

    pub fn dashboard_data(&self, group_id: &str) -> Result<DashboardData> {
        let group = self.require_group(group_id)?;
        let config = self
            .store
            .project_config(group_id)?
            .unwrap_or_else(|| ProjectConfig::empty(group_id, "TBD"));
        Ok(DashboardData {
            group,
            config,
            users: self.store.roster(group_id)?,
        })
    }

    fn require_group(&self, group_id: &str) -> Result<Group> {
        self.store
            .group_by_id(group_id)?
            .ok_or_else(|| Error::NotFound("Group".to_string()))
    }

    fn auth_response(&self, user: Member, group: Group) -> Result<AuthResponse> {
        let claims = SessionClaims::for_member(&user, Utc::now().timestamp_millis());
        let token = session::issue(&claims, &self.secret)?;
        Ok(AuthResponse { token, user, group })
    }

    fn unused_code(&self) -> Result<String> {
        for _ in 0..CODE_ATTEMPTS {
            let code = random_string(CODE_LEN).to_uppercase();
            if self.store.group_by_code(&code)?.is_none() {
                return Ok(code);
            }
        }
        Err(Error::Storage("could not allocate a free group code".to_string()))
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn random_id() -> String {
    random_string(ID_LEN).to_lowercase()
}
