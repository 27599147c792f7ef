//! Capability derivation for group members.
//!
//! Capabilities are a pure function of the member's role and the group
//! settings. Non-members always get the empty set.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Group, Role};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permissions {
    pub can_create_tasks: bool,
    pub can_edit_tasks: bool,
    pub can_delete_tasks: bool,
    pub can_invite_members: bool,
    pub can_remove_members: bool,
    pub can_change_roles: bool,
    pub can_manage_settings: bool,
    pub can_delete_group: bool,
}

impl Permissions {
    /// The empty capability set, granted to non-members.
    pub fn none() -> Self {
        Permissions::default()
    }
}

pub fn permissions_for(group: &Group, user_id: Uuid) -> Permissions {
    let Some(member) = group.member(user_id) else {
        return Permissions::none();
    };

    let settings = &group.settings;
    let owner = member.role == Role::Owner;
    let admin = member.role == Role::Admin;
    let plain = member.role == Role::Member;

    Permissions {
        can_create_tasks: owner || admin || (plain && settings.allow_members_to_create_tasks),
        can_edit_tasks: owner || admin,
        can_delete_tasks: owner || admin,
        can_invite_members: owner || admin || (plain && settings.allow_members_to_invite),
        can_remove_members: owner || admin,
        can_change_roles: owner,
        can_manage_settings: owner || admin,
        can_delete_group: owner,
    }
}
