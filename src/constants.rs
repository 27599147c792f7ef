/// Notification feed cap; the oldest entries beyond it are dropped.
pub const MAX_NOTIFICATIONS: usize = 50;

/// Group activity log cap, same drop-oldest policy as the notification feed.
pub const MAX_GROUP_LOGS: usize = 100;

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 8;

/// Attempts at finding an unused invite code before giving up.
pub const INVITE_CODE_ATTEMPTS: usize = 32;

/// Default member limit applied to new groups.
pub const DEFAULT_MAX_MEMBERS: usize = 50;

/// Lifetime of a group's primary invite. Long enough to never expire in practice.
pub const PRIMARY_INVITE_TTL_DAYS: i64 = 36_500;
