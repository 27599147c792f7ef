use std::collections::HashMap;

use uuid::Uuid;

use crate::constants::{MAX_GROUP_LOGS, MAX_NOTIFICATIONS};
use crate::error::TimeflowError;
use crate::models::*;
use crate::storage::Storage;

/// Indexed in-memory store. The default backend for tests and ephemeral use.
#[derive(Default)]
pub struct InMemoryStorage {
    current_user: Option<User>,
    activities: HashMap<Uuid, Activity>,
    groups: HashMap<Uuid, Group>,
    invites: HashMap<Uuid, Invite>,
    notifications: Vec<Notification>,
    group_logs: Vec<GroupActivityLog>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

impl Storage for InMemoryStorage {
    fn current_user(&self) -> Option<User> {
        self.current_user.clone()
    }

    fn save_current_user(&mut self, user: User) -> Result<User, TimeflowError> {
        self.current_user = Some(user.clone());
        Ok(user)
    }

    fn list_activities(&self) -> Vec<Activity> {
        let mut activities: Vec<Activity> = self.activities.values().cloned().collect();
        activities.sort_by_key(|a| a.created_at);
        activities
    }

    fn get_activity(&self, id: Uuid) -> Option<Activity> {
        self.activities.get(&id).cloned()
    }

    fn insert_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError> {
        self.activities.insert(activity.id, activity.clone());
        Ok(activity)
    }

    fn update_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError> {
        if !self.activities.contains_key(&activity.id) {
            return Err(TimeflowError::ActivityNotFound(activity.id));
        }
        self.activities.insert(activity.id, activity.clone());
        Ok(activity)
    }

    fn remove_activity(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        Ok(self.activities.remove(&id).is_some())
    }

    fn remove_group_activities(&mut self, group_id: Uuid) -> Result<usize, TimeflowError> {
        let before = self.activities.len();
        self.activities.retain(|_, a| a.group_id != Some(group_id));
        Ok(before - self.activities.len())
    }

    fn list_groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = self.groups.values().cloned().collect();
        groups.sort_by_key(|g| g.created_at);
        groups
    }

    fn get_group(&self, id: Uuid) -> Option<Group> {
        self.groups.get(&id).cloned()
    }

    fn find_group_by_invite_code(&self, code: &str) -> Option<Group> {
        self.groups.values().find(|g| g.invite_code == code).cloned()
    }

    fn insert_group(&mut self, group: Group) -> Result<Group, TimeflowError> {
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    fn update_group(&mut self, group: Group) -> Result<Group, TimeflowError> {
        if !self.groups.contains_key(&group.id) {
            return Err(TimeflowError::GroupNotFound(group.id));
        }
        self.groups.insert(group.id, group.clone());
        Ok(group)
    }

    fn remove_group(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        Ok(self.groups.remove(&id).is_some())
    }

    fn list_invites(&self) -> Vec<Invite> {
        let mut invites: Vec<Invite> = self.invites.values().cloned().collect();
        invites.sort_by_key(|i| i.created_at);
        invites
    }

    fn find_invite_by_code(&self, code: &str) -> Option<Invite> {
        self.invites.values().find(|i| i.code == code).cloned()
    }

    fn insert_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError> {
        self.invites.insert(invite.id, invite.clone());
        Ok(invite)
    }

    fn update_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError> {
        if !self.invites.contains_key(&invite.id) {
            return Err(TimeflowError::InviteNotFound);
        }
        self.invites.insert(invite.id, invite.clone());
        Ok(invite)
    }

    fn remove_group_invites(&mut self, group_id: Uuid) -> Result<usize, TimeflowError> {
        let before = self.invites.len();
        self.invites.retain(|_, i| i.group_id != group_id);
        Ok(before - self.invites.len())
    }

    fn list_notifications(&self) -> Vec<Notification> {
        self.notifications.clone()
    }

    fn push_notification(
        &mut self,
        notification: Notification,
    ) -> Result<Notification, TimeflowError> {
        self.notifications.insert(0, notification.clone());
        self.notifications.truncate(MAX_NOTIFICATIONS);
        Ok(notification)
    }

    fn mark_notification_read(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_group_logs(&self, group_id: Uuid) -> Vec<GroupActivityLog> {
        self.group_logs
            .iter()
            .filter(|l| l.group_id == group_id)
            .cloned()
            .collect()
    }

    fn push_group_log(&mut self, entry: GroupActivityLog) -> Result<(), TimeflowError> {
        self.group_logs.insert(0, entry);
        self.group_logs.truncate(MAX_GROUP_LOGS);
        Ok(())
    }
}
