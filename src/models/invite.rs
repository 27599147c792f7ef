use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Invite {
    pub id: Uuid,
    pub code: String,
    pub group_id: Uuid,
    pub group_name: String,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_uses: Option<u32>,
    pub current_uses: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Invite {
    /// An invite grants access while active, unexpired and below its use cap.
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && now < self.expires_at
            && self.max_uses.is_none_or(|max| self.current_uses < max)
    }
}
