use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GroupAction {
    MemberJoined,
    MemberLeft,
    MemberRemoved,
    RoleChanged,
    TaskCreated,
    TaskCompleted,
    TaskDeleted,
    SettingsChanged,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupActivityLog {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub action: GroupAction,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl GroupActivityLog {
    pub fn new(
        group_id: Uuid,
        user_id: Uuid,
        user_name: impl Into<String>,
        action: GroupAction,
        description: impl Into<String>,
    ) -> Self {
        GroupActivityLog {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            user_name: user_name.into(),
            action,
            description: description.into(),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
