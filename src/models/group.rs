use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::DEFAULT_MAX_MEMBERS;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")] // Ensures JSON uses "owner" / "admin" / "member"
pub enum Role {
    Owner,
    Admin,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    Familiar,
    Empresarial,
    Projetos,
    Pessoal,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSettings {
    pub allow_members_to_invite: bool,
    pub allow_members_to_create_tasks: bool,
    pub require_approval_for_tasks: bool,
    pub max_members: usize,
}

impl Default for GroupSettings {
    fn default() -> Self {
        GroupSettings {
            allow_members_to_invite: true,
            allow_members_to_create_tasks: true,
            require_approval_for_tasks: false,
            max_members: DEFAULT_MAX_MEMBERS,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invited_by: Option<Uuid>,
}

impl GroupMember {
    pub fn is_owner(&self) -> bool {
        self.role == Role::Owner
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub group_type: GroupType,
    pub owner_id: Uuid,
    pub invite_code: String,
    pub members: Vec<GroupMember>,
    pub settings: GroupSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn member(&self, user_id: Uuid) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    pub fn member_mut(&mut self, user_id: Uuid) -> Option<&mut GroupMember> {
        self.members.iter_mut().find(|m| m.user_id == user_id)
    }

    pub fn is_member(&self, user_id: Uuid) -> bool {
        self.member(user_id).is_some()
    }

    pub fn owner(&self) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.is_owner())
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.settings.max_members
    }
}

/// Partial update applied by `update_group`. Unset fields are kept.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub group_type: Option<GroupType>,
    pub settings: Option<GroupSettings>,
}
