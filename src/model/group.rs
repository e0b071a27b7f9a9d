use serde::{Deserialize, Serialize};

/// A project group members join with a short code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub code: String,
    pub project_name: String,
    #[serde(default)]
    pub is_finalized: bool,
}

impl Group {
    pub fn new(id: String, code: String, project_name: String) -> Self {
        Self {
            id,
            code,
            project_name,
            is_finalized: false,
        }
    }

    /// Returns a copy of the group with the setup locked
    pub fn finalized(&self) -> Self {
        Self {
            is_finalized: true,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_keeps_identity() {
        let group = Group::new("g1".into(), "ABC123".into(), "Compilers".into());
        let locked = group.finalized();
        assert!(locked.is_finalized);
        assert!(!group.is_finalized);
        assert_eq!(locked.code, "ABC123");
        assert_eq!(locked.project_name, "Compilers");
    }

    #[test]
    fn missing_finalized_flag_defaults_to_open() {
        let group: Group =
            serde_json::from_str(r#"{"id":"g1","code":"ABC123","projectName":"Compilers"}"#).unwrap();
        assert!(!group.is_finalized);
    }
}
