use uuid::Uuid;

use crate::error::TimeflowError;
use crate::models::*;

pub trait Storage {
    fn current_user(&self) -> Option<User>;
    fn save_current_user(&mut self, user: User) -> Result<User, TimeflowError>;

    fn list_activities(&self) -> Vec<Activity>;
    fn get_activity(&self, id: Uuid) -> Option<Activity>;
    fn insert_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError>;
    fn update_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError>;
    fn remove_activity(&mut self, id: Uuid) -> Result<bool, TimeflowError>;
    /// Removes every activity belonging to the group, returning the count.
    fn remove_group_activities(&mut self, group_id: Uuid) -> Result<usize, TimeflowError>;

    fn list_groups(&self) -> Vec<Group>;
    fn get_group(&self, id: Uuid) -> Option<Group>;
    fn find_group_by_invite_code(&self, code: &str) -> Option<Group>;
    fn insert_group(&mut self, group: Group) -> Result<Group, TimeflowError>;
    fn update_group(&mut self, group: Group) -> Result<Group, TimeflowError>;
    fn remove_group(&mut self, id: Uuid) -> Result<bool, TimeflowError>;

    fn list_invites(&self) -> Vec<Invite>;
    fn find_invite_by_code(&self, code: &str) -> Option<Invite>;
    fn insert_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError>;
    fn update_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError>;
    /// Removes every invite belonging to the group, returning the count.
    fn remove_group_invites(&mut self, group_id: Uuid) -> Result<usize, TimeflowError>;

    /// Newest first.
    fn list_notifications(&self) -> Vec<Notification>;
    /// Prepends the notification, dropping the oldest beyond the feed cap.
    fn push_notification(
        &mut self,
        notification: Notification,
    ) -> Result<Notification, TimeflowError>;
    fn mark_notification_read(&mut self, id: Uuid) -> Result<bool, TimeflowError>;

    /// Newest first. Entries survive deletion of their group.
    fn list_group_logs(&self, group_id: Uuid) -> Vec<GroupActivityLog>;
    /// Prepends the entry, dropping the oldest beyond the log cap.
    fn push_group_log(&mut self, entry: GroupActivityLog) -> Result<(), TimeflowError>;
}

pub mod in_memory;
pub mod json_file;
