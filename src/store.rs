//! Persistence for groups, members, questionnaires and project configs.
//!
//! The rest of the crate only talks to the [`Store`] trait. Every write is a
//! single trait call, so a read-modify-write never spans two calls.
//! [`JsonStore`] keeps the whole database in memory and, when opened on a
//! file, rewrites that file after each change.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::error::{Error, Result};
use crate::model::{Group, Member, MemberWithData, ProjectConfig, Questionnaire};

pub trait Store: Send + Sync {
    /// Inserts a new group together with its admin
    fn create_group(&self, group: Group, admin: Member) -> Result<()>;
    fn group_by_id(&self, group_id: &str) -> Result<Option<Group>>;
    /// Join codes compare case-insensitively
    fn group_by_code(&self, code: &str) -> Result<Option<Group>>;

    /// Returns the member of `candidate.group_id` whose name matches
    /// `candidate.name` case-insensitively, inserting `candidate` when there
    /// is none. The flag is true when the candidate was inserted.
    fn join_or_get(&self, candidate: Member) -> Result<(Member, bool)>;
    fn member_by_id(&self, member_id: &str) -> Result<Option<Member>>;

    /// Stores a questionnaire, replacing any earlier one from the same
    /// member, and marks that member submitted
    fn submit_questionnaire(&self, questionnaire: Questionnaire) -> Result<Member>;

    /// Members of a group paired with their questionnaires, read as one snapshot
    fn roster(&self, group_id: &str) -> Result<Vec<MemberWithData>>;

    /// Locks the group, applies non-blank roles to its own members and
    /// records the weekly meeting time in its project config
    fn finalize(&self, group_id: &str, weekly_meeting_time: &str, roles: &HashMap<String, String>) -> Result<Group>;

    fn project_config(&self, group_id: &str) -> Result<Option<ProjectConfig>>;
    fn put_project_config(&self, config: ProjectConfig) -> Result<()>;
}

/// On-disk layout of the database file
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub users: Vec<Member>,
    #[serde(default)]
    pub questionnaires: Vec<Questionnaire>,
    #[serde(default)]
    pub project_configs: Vec<ProjectConfig>,
}

pub struct JsonStore {
    path: Option<PathBuf>,
    db: Mutex<Database>,
}

impl JsonStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            db: Mutex::new(Database::default()),
        }
    }

    /// Opens a database file, starting empty if it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                Database::default()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            Database::default()
        };

        log::info!(
            "Opened store {} ({} groups, {} members)",
            path.display(),
            db.groups.len(),
            db.users.len()
        );

        Ok(Self {
            path: Some(path),
            db: Mutex::new(db),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>> {
        self.db
            .lock()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))
    }

    /// Applies a change to a copy of the database, persists the copy and only
    /// then swaps it in. A failed change or a failed write leaves the store as it was.
    fn mutate<T>(&self, change: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut db = self.lock()?;
        let mut next = db.clone();
        let out = change(&mut next)?;
        self.persist(&next)?;
        *db = next;
        Ok(out)
    }

    fn persist(&self, db: &Database) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(db)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, path)?;
        log::debug!("Persisted store to {}", path.display());
        Ok(())
    }
}

impl Store for JsonStore {
    fn create_group(&self, group: Group, admin: Member) -> Result<()> {
        self.mutate(|db| {
            if db.groups.iter().any(|g| g.id == group.id || g.code.eq_ignore_ascii_case(&group.code)) {
                return Err(Error::Storage(format!("group {} already exists", group.id)));
            }
            if db.users.iter().any(|u| u.id == admin.id) {
                return Err(Error::Storage(format!("member {} already exists", admin.id)));
            }
            db.groups.push(group);
            db.users.push(admin);
            Ok(())
        })
    }

    fn group_by_id(&self, group_id: &str) -> Result<Option<Group>> {
        Ok(self.lock()?.groups.iter().find(|g| g.id == group_id).cloned())
    }

    fn group_by_code(&self, code: &str) -> Result<Option<Group>> {
        Ok(self
            .lock()?
            .groups
            .iter()
            .find(|g| g.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    fn join_or_get(&self, candidate: Member) -> Result<(Member, bool)> {
        self.mutate(|db| {
            if !db.groups.iter().any(|g| g.id == candidate.group_id) {
                return Err(Error::NotFound("Group".to_string()));
            }

            let wanted = candidate.name.to_lowercase();
            if let Some(existing) = db
                .users
                .iter()
                .find(|u| u.group_id == candidate.group_id && u.name.to_lowercase() == wanted)
            {
                return Ok((existing.clone(), false));
            }

            if db.users.iter().any(|u| u.id == candidate.id) {
                return Err(Error::Storage(format!("member {} already exists", candidate.id)));
            }
            db.users.push(candidate.clone());
            Ok((candidate, true))
        })
    }

    fn member_by_id(&self, member_id: &str) -> Result<Option<Member>> {
        Ok(self.lock()?.users.iter().find(|u| u.id == member_id).cloned())
    }

    fn submit_questionnaire(&self, questionnaire: Questionnaire) -> Result<Member> {
        self.mutate(|db| {
            let member = db
                .users
                .iter_mut()
                .find(|u| u.id == questionnaire.user_id)
                .ok_or_else(|| Error::NotFound("Member".to_string()))?;
            *member = member.submitted();
            let member = member.clone();

            db.questionnaires.retain(|q| q.user_id != questionnaire.user_id);
            db.questionnaires.push(questionnaire);
            Ok(member)
        })
    }

    fn roster(&self, group_id: &str) -> Result<Vec<MemberWithData>> {
        let db = self.lock()?;
        Ok(db
            .users
            .iter()
            .filter(|u| u.group_id == group_id)
            .map(|u| {
                let questionnaire = db.questionnaires.iter().find(|q| q.user_id == u.id).cloned();
                MemberWithData::new(u.clone(), questionnaire)
            })
            .collect())
    }

    fn finalize(&self, group_id: &str, weekly_meeting_time: &str, roles: &HashMap<String, String>) -> Result<Group> {
        self.mutate(|db| {
            let group = db
                .groups
                .iter_mut()
                .find(|g| g.id == group_id)
                .ok_or_else(|| Error::NotFound("Group".to_string()))?;
            *group = group.finalized();
            let group = group.clone();

            for member in db.users.iter_mut().filter(|u| u.group_id == group_id) {
                let role = roles.get(&member.id).map(|r| r.trim()).filter(|r| !r.is_empty());
                if let Some(role) = role {
                    *member = member.with_role(role);
                }
            }

            match db.project_configs.iter_mut().find(|c| c.group_id == group_id) {
                Some(config) => *config = config.with_meeting_time(weekly_meeting_time),
                None => db
                    .project_configs
                    .push(ProjectConfig::empty(group_id, weekly_meeting_time)),
            }
            Ok(group)
        })
    }

    fn project_config(&self, group_id: &str) -> Result<Option<ProjectConfig>> {
        Ok(self
            .lock()?
            .project_configs
            .iter()
            .find(|c| c.group_id == group_id)
            .cloned())
    }

    fn put_project_config(&self, config: ProjectConfig) -> Result<()> {
        self.mutate(|db| {
            match db.project_configs.iter_mut().find(|c| c.group_id == config.group_id) {
                Some(existing) => *existing = config,
                None => db.project_configs.push(config),
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questionnaire(user_id: &str, slots: Vec<i64>) -> Questionnaire {
        Questionnaire {
            availability: slots,
            ..serde_json::from_value(serde_json::json!({ "userId": user_id })).unwrap()
        }
    }

    fn group(id: &str, code: &str) -> Group {
        Group::new(id.into(), code.into(), "Compilers".into())
    }

    fn admin(id: &str, group_id: &str) -> Member {
        Member::new(id.into(), group_id.into(), "Ana".into(), true)
    }

    #[test]
    fn code_lookup_ignores_case() {
        let store = JsonStore::in_memory();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();
        assert!(store.group_by_code("abc123").unwrap().is_some());
        assert!(store.group_by_code("ZZZ999").unwrap().is_none());
        assert!(store.member_by_id("u1").unwrap().unwrap().is_admin);
    }

    #[test]
    fn duplicate_code_is_rejected_without_partial_insert() {
        let store = JsonStore::in_memory();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();
        let err = store.create_group(group("g2", "abc123"), admin("u2", "g2"));
        assert!(matches!(err, Err(Error::Storage(_))));
        assert!(store.group_by_id("g2").unwrap().is_none());
        assert!(store.member_by_id("u2").unwrap().is_none());
    }

    #[test]
    fn join_or_get_returns_existing_member_by_name() {
        let store = JsonStore::in_memory();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();

        let (ben, inserted) = store
            .join_or_get(Member::new("u2".into(), "g1".into(), "Ben".into(), false))
            .unwrap();
        assert!(inserted);
        let (again, inserted) = store
            .join_or_get(Member::new("u3".into(), "g1".into(), "BEN".into(), false))
            .unwrap();
        assert!(!inserted);
        assert_eq!(again.id, ben.id);
        assert_eq!(store.roster("g1").unwrap().len(), 2);
    }

    #[test]
    fn join_into_unknown_group_is_not_found() {
        let store = JsonStore::in_memory();
        let err = store.join_or_get(Member::new("u2".into(), "g9".into(), "Ben".into(), false));
        assert!(matches!(err, Err(Error::NotFound(_))));
    }

    #[test]
    fn submission_replaces_previous_and_marks_member() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kickoff.json");
        let store = JsonStore::open(&path).unwrap();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();

        store.submit_questionnaire(questionnaire("u1", vec![1])).unwrap();
        let member = store.submit_questionnaire(questionnaire("u1", vec![2, 3])).unwrap();
        assert!(member.has_submitted);

        let saved: Database = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.questionnaires.len(), 1);
        assert_eq!(saved.questionnaires[0].availability, vec![2, 3]);
        assert!(saved.users[0].has_submitted);
    }

    #[test]
    fn submission_for_unknown_member_stores_nothing() {
        let store = JsonStore::in_memory();
        let err = store.submit_questionnaire(questionnaire("u9", vec![1]));
        assert!(matches!(err, Err(Error::NotFound(_))));
        assert!(store.roster("g1").unwrap().is_empty());
    }

    #[test]
    fn finalize_keeps_submission_flag_and_roles_together() {
        let store = JsonStore::in_memory();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();
        store
            .join_or_get(Member::new("u2".into(), "g1".into(), "Ben".into(), false))
            .unwrap();
        store.submit_questionnaire(questionnaire("u2", vec![0])).unwrap();

        let mut roles = HashMap::new();
        roles.insert("u2".to_string(), "Tester".to_string());
        let group = store.finalize("g1", "Mondays 2pm", &roles).unwrap();
        assert!(group.is_finalized);

        let ben = store.member_by_id("u2").unwrap().unwrap();
        assert_eq!(ben.role.as_deref(), Some("Tester"));
        assert!(ben.has_submitted);

        // a later resubmission keeps the assigned role
        let ben = store.submit_questionnaire(questionnaire("u2", vec![1])).unwrap();
        assert_eq!(ben.role.as_deref(), Some("Tester"));
        assert_eq!(
            store.project_config("g1").unwrap().unwrap().weekly_meeting_time,
            "Mondays 2pm"
        );
    }

    #[test]
    fn roster_only_includes_group_members() {
        let store = JsonStore::in_memory();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();
        store.create_group(group("g2", "DEF456"), admin("u2", "g2")).unwrap();
        store.submit_questionnaire(questionnaire("u1", vec![0])).unwrap();

        let roster = store.roster("g1").unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].member.id, "u1");
        assert!(roster[0].questionnaire.is_some());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kickoff.json");

        let store = JsonStore::open(&path).unwrap();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();
        store
            .put_project_config(ProjectConfig::empty("g1", "Mondays 2pm"))
            .unwrap();
        drop(store);

        let reopened = JsonStore::open(&path).unwrap();
        assert_eq!(reopened.group_by_id("g1").unwrap().unwrap().project_name, "Compilers");
        assert_eq!(
            reopened.project_config("g1").unwrap().unwrap().weekly_meeting_time,
            "Mondays 2pm"
        );
    }

    #[test]
    fn failed_write_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kickoff.json");
        let store = JsonStore::open(&path).unwrap();
        store.create_group(group("g1", "ABC123"), admin("u1", "g1")).unwrap();

        // a directory where the temp file should go makes the write fail
        fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store.create_group(group("g2", "DEF456"), admin("u2", "g2"));
        assert!(matches!(err, Err(Error::Io(_))));
        assert!(store.group_by_code("DEF456").unwrap().is_none());
        assert!(store.member_by_id("u2").unwrap().is_none());

        let err = store.submit_questionnaire(questionnaire("u1", vec![4]));
        assert!(err.is_err());
        assert!(!store.member_by_id("u1").unwrap().unwrap().has_submitted);
        assert!(store.roster("g1").unwrap()[0].questionnaire.is_none());

        let saved: Database = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved.groups.len(), 1);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kickoff.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonStore::open(&path), Err(Error::Json(_))));
    }
}
