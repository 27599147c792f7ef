use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Baixa,
    Media,
    Alta,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Trabalho,
    Pessoal,
    Estudos,
    Saude,
    Outros,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pendente,
    Concluida,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityComment {
    pub id: Uuid,
    pub activity_id: Uuid,
    pub user_id: Uuid,
    pub user_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub priority: Priority,
    pub category: Category,
    pub duration_minutes: u32,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    pub created_by: Uuid,
    pub assignees: Vec<Uuid>,
    pub is_shared: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub comments: Vec<ActivityComment>,
}

impl Activity {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Concluida
    }
}

/// Caller-supplied fields of a new activity; the registry stamps the rest.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub priority: Priority,
    pub category: Category,
    pub duration_minutes: u32,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub assignees: Vec<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update applied by `update_activity`. Unset fields are kept.
/// Status is excluded on purpose: completion goes through `toggle_complete`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub duration_minutes: Option<u32>,
    pub assignees: Option<Vec<Uuid>>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Personal,
    Groups,
    #[default]
    All,
}

/// Conjunctive activity filter. An unset field means "no constraint".
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ActivityFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub group_id: Option<Uuid>,
    pub assignee: Option<Uuid>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub scope: Scope,
}
