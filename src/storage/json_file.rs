//! Whole-collection JSON persistence.
//!
//! Each collection lives in its own file under the data directory:
//!
//! ```text
//! <data_dir>/
//!   activities.json
//!   groups.json
//!   user.json
//!   notifications.json
//!   invites.json
//!   activity_logs.json
//! ```
//!
//! Reads parse the whole file or default to an empty collection. Writes
//! serialize the whole collection to a temp file and rename it into place,
//! so readers never observe a partial write. Two processes writing the same
//! collection are last-write-wins at whole-collection granularity. There is
//! no schema versioning; a file that fails to parse is treated as empty.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::constants::{MAX_GROUP_LOGS, MAX_NOTIFICATIONS};
use crate::error::TimeflowError;
use crate::models::*;
use crate::storage::Storage;

const ACTIVITIES_FILE: &str = "activities.json";
const GROUPS_FILE: &str = "groups.json";
const USER_FILE: &str = "user.json";
const NOTIFICATIONS_FILE: &str = "notifications.json";
const INVITES_FILE: &str = "invites.json";
const ACTIVITY_LOGS_FILE: &str = "activity_logs.json";

pub struct JsonFileStorage {
    data_dir: PathBuf,
}

impl JsonFileStorage {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, TimeflowError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir).map_err(io_err)?;
        Ok(JsonFileStorage { data_dir })
    }

    /// Opens the directory configured through `TIMEFLOW_DATA_DIR`.
    pub fn open_default() -> Result<Self, TimeflowError> {
        Self::open(CONFIG.data_dir.clone())
    }

    fn path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Vec<T> {
        let path = self.path(file);
        match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("Unreadable collection {}: {}", file, e);
                Vec::new()
            }),
            Err(_) => Vec::new(),
        }
    }

    fn write_collection<T: Serialize>(
        &self,
        file: &str,
        items: &[T],
    ) -> Result<(), TimeflowError> {
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| TimeflowError::Storage(e.to_string()))?;
        write_atomic(&self.path(file), json.as_bytes())
    }
}

/// Write to a temp file in the same directory, then rename into place.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), TimeflowError> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path).map_err(io_err)?;
    file.write_all(data).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    fs::rename(&temp_path, path).map_err(io_err)?;
    Ok(())
}

fn io_err(err: std::io::Error) -> TimeflowError {
    TimeflowError::Storage(err.to_string())
}

impl Storage for JsonFileStorage {
    fn current_user(&self) -> Option<User> {
        let raw = fs::read_to_string(self.path(USER_FILE)).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save_current_user(&mut self, user: User) -> Result<User, TimeflowError> {
        let json =
            serde_json::to_string_pretty(&user).map_err(|e| TimeflowError::Storage(e.to_string()))?;
        write_atomic(&self.path(USER_FILE), json.as_bytes())?;
        Ok(user)
    }

    fn list_activities(&self) -> Vec<Activity> {
        self.read_collection(ACTIVITIES_FILE)
    }

    fn get_activity(&self, id: Uuid) -> Option<Activity> {
        self.list_activities().into_iter().find(|a| a.id == id)
    }

    fn insert_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError> {
        let mut activities = self.list_activities();
        activities.push(activity.clone());
        self.write_collection(ACTIVITIES_FILE, &activities)?;
        Ok(activity)
    }

    fn update_activity(&mut self, activity: Activity) -> Result<Activity, TimeflowError> {
        let mut activities = self.list_activities();
        let slot = activities
            .iter_mut()
            .find(|a| a.id == activity.id)
            .ok_or(TimeflowError::ActivityNotFound(activity.id))?;
        *slot = activity.clone();
        self.write_collection(ACTIVITIES_FILE, &activities)?;
        Ok(activity)
    }

    fn remove_activity(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        let mut activities = self.list_activities();
        let before = activities.len();
        activities.retain(|a| a.id != id);
        if activities.len() == before {
            return Ok(false);
        }
        self.write_collection(ACTIVITIES_FILE, &activities)?;
        Ok(true)
    }

    fn remove_group_activities(&mut self, group_id: Uuid) -> Result<usize, TimeflowError> {
        let mut activities = self.list_activities();
        let before = activities.len();
        activities.retain(|a| a.group_id != Some(group_id));
        let removed = before - activities.len();
        if removed > 0 {
            self.write_collection(ACTIVITIES_FILE, &activities)?;
        }
        Ok(removed)
    }

    fn list_groups(&self) -> Vec<Group> {
        self.read_collection(GROUPS_FILE)
    }

    fn get_group(&self, id: Uuid) -> Option<Group> {
        self.list_groups().into_iter().find(|g| g.id == id)
    }

    fn find_group_by_invite_code(&self, code: &str) -> Option<Group> {
        self.list_groups().into_iter().find(|g| g.invite_code == code)
    }

    fn insert_group(&mut self, group: Group) -> Result<Group, TimeflowError> {
        let mut groups = self.list_groups();
        groups.push(group.clone());
        self.write_collection(GROUPS_FILE, &groups)?;
        Ok(group)
    }

    fn update_group(&mut self, group: Group) -> Result<Group, TimeflowError> {
        let mut groups = self.list_groups();
        let slot = groups
            .iter_mut()
            .find(|g| g.id == group.id)
            .ok_or(TimeflowError::GroupNotFound(group.id))?;
        *slot = group.clone();
        self.write_collection(GROUPS_FILE, &groups)?;
        Ok(group)
    }

    fn remove_group(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        let mut groups = self.list_groups();
        let before = groups.len();
        groups.retain(|g| g.id != id);
        if groups.len() == before {
            return Ok(false);
        }
        self.write_collection(GROUPS_FILE, &groups)?;
        Ok(true)
    }

    fn list_invites(&self) -> Vec<Invite> {
        self.read_collection(INVITES_FILE)
    }

    fn find_invite_by_code(&self, code: &str) -> Option<Invite> {
        self.list_invites().into_iter().find(|i| i.code == code)
    }

    fn insert_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError> {
        let mut invites = self.list_invites();
        invites.push(invite.clone());
        self.write_collection(INVITES_FILE, &invites)?;
        Ok(invite)
    }

    fn update_invite(&mut self, invite: Invite) -> Result<Invite, TimeflowError> {
        let mut invites = self.list_invites();
        let slot = invites
            .iter_mut()
            .find(|i| i.id == invite.id)
            .ok_or(TimeflowError::InviteNotFound)?;
        *slot = invite.clone();
        self.write_collection(INVITES_FILE, &invites)?;
        Ok(invite)
    }

    fn remove_group_invites(&mut self, group_id: Uuid) -> Result<usize, TimeflowError> {
        let mut invites = self.list_invites();
        let before = invites.len();
        invites.retain(|i| i.group_id != group_id);
        let removed = before - invites.len();
        if removed > 0 {
            self.write_collection(INVITES_FILE, &invites)?;
        }
        Ok(removed)
    }

    fn list_notifications(&self) -> Vec<Notification> {
        self.read_collection(NOTIFICATIONS_FILE)
    }

    fn push_notification(
        &mut self,
        notification: Notification,
    ) -> Result<Notification, TimeflowError> {
        let mut notifications = self.list_notifications();
        notifications.insert(0, notification.clone());
        notifications.truncate(MAX_NOTIFICATIONS);
        self.write_collection(NOTIFICATIONS_FILE, &notifications)?;
        Ok(notification)
    }

    fn mark_notification_read(&mut self, id: Uuid) -> Result<bool, TimeflowError> {
        let mut notifications = self.list_notifications();
        match notifications.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                self.write_collection(NOTIFICATIONS_FILE, &notifications)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn list_group_logs(&self, group_id: Uuid) -> Vec<GroupActivityLog> {
        self.read_collection::<GroupActivityLog>(ACTIVITY_LOGS_FILE)
            .into_iter()
            .filter(|l| l.group_id == group_id)
            .collect()
    }

    fn push_group_log(&mut self, entry: GroupActivityLog) -> Result<(), TimeflowError> {
        let mut logs: Vec<GroupActivityLog> = self.read_collection(ACTIVITY_LOGS_FILE);
        logs.insert(0, entry);
        logs.truncate(MAX_GROUP_LOGS);
        self.write_collection(ACTIVITY_LOGS_FILE, &logs)
    }
}
