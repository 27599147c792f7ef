use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Serialize)]
pub enum TimeflowError {
    /// Group with given ID not found
    #[error("Group {0} not found")]
    GroupNotFound(Uuid),

    /// Activity with given ID not found
    #[error("Activity {0} not found")]
    ActivityNotFound(Uuid),

    /// Notification with given ID not found
    #[error("Notification {0} not found")]
    NotificationNotFound(Uuid),

    /// User is not a member of the group
    #[error("User {0} is not a group member")]
    NotGroupMember(Uuid),

    /// User lacks the capability required for the operation
    #[error("User {0} is not authorized for this action")]
    NotAuthorized(Uuid),

    /// Group already holds its configured maximum of members
    #[error("Group is full ({0} members max)")]
    GroupFull(usize),

    /// Invite code does not match any group or invite
    #[error("Invite code not found")]
    InviteNotFound,

    /// Invite exists but is inactive, expired or exhausted
    #[error("Invite is no longer usable")]
    InviteExpired,

    /// Group owner cannot leave their own group
    #[error("Owner cannot leave the group")]
    OwnerCannotLeave,

    /// Group owner cannot be removed from the group
    #[error("Owner cannot be removed from the group")]
    CannotRemoveOwner,

    /// The owner's role cannot be changed
    #[error("Owner role cannot be changed")]
    OwnerRoleImmutable,

    /// The owner role cannot be assigned through a role change
    #[error("Owner role cannot be granted")]
    OwnerRoleNotGrantable,

    /// Activity has no group, so a group-only operation does not apply
    #[error("Activity {0} is not a group task")]
    NotGroupActivity(Uuid),

    /// Assignee is not a member of the activity's group
    #[error("Assignee {0} is not a group member")]
    AssigneeNotMember(Uuid),

    /// Group name is empty
    #[error("Group name is required")]
    MissingName,

    /// Activity title is empty
    #[error("Activity title is required")]
    MissingTitle,

    /// Could not generate an unused invite code
    #[error("Unable to generate a unique invite code")]
    InviteCodeExhausted,

    /// Storage operation failed
    #[error("Storage error: {0}")]
    Storage(String),
}
