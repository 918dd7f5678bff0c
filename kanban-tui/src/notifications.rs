//! Footer notifications.

use chrono::{DateTime, Duration, Utc};

/// How long a notification stays in the footer.
pub const NOTIFICATION_TTL_SECS: i64 = 6;

/// Most notifications kept at once; older ones are dropped first.
pub const MAX_NOTIFICATIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl NotificationLevel {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "INFO",
            NotificationLevel::Warning => "WARN",
            NotificationLevel::Error => "ERROR",
            NotificationLevel::Success => "OK",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // Errors only leave when a newer notification is pushed.
        self.level != NotificationLevel::Error
            && now - self.created_at > Duration::seconds(NOTIFICATION_TTL_SECS)
    }
}

/// Push `notification`, dropping earlier errors so an expired notice never
/// uncovers a stale one.
pub fn push(queue: &mut Vec<Notification>, notification: Notification) {
    queue.retain(|n| n.level != NotificationLevel::Error);
    queue.push(notification);
    if queue.len() > MAX_NOTIFICATIONS {
        let excess = queue.len() - MAX_NOTIFICATIONS;
        queue.drain(..excess);
    }
}
