mod dashboard_tests;
mod permission_tests;

use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::models::{ActivityDraft, Category, Notification, NotificationKind, Priority, User};

pub fn test_user(name: &str) -> User {
    User::new(name, format!("{}@example.com", name.to_lowercase()))
}

pub fn draft(title: &str, group_id: Option<Uuid>) -> ActivityDraft {
    ActivityDraft {
        title: title.to_string(),
        description: String::new(),
        date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        priority: Priority::Media,
        category: Category::Trabalho,
        duration_minutes: 30,
        group_id,
        assignees: Vec::new(),
        tags: Vec::new(),
    }
}

pub fn test_notification(label: &str) -> Notification {
    Notification {
        id: Uuid::new_v4(),
        kind: NotificationKind::TaskCreated,
        title: label.to_string(),
        message: String::new(),
        group_id: None,
        activity_id: None,
        user_id: Uuid::new_v4(),
        read: false,
        created_at: Utc::now(),
        metadata: None,
    }
}
