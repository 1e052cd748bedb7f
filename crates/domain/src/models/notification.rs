//! Notification event models.
//!
//! A notification event is the durable record handed to the messaging
//! transport collaborator. Creating the event is this backend's obligation;
//! delivery, retries and chat UI are not.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Notification kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BadgeUpdate,
    PaymentReminder,
    Homework,
    General,
    BulkMessage,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::BadgeUpdate => "badge_update",
            NotificationKind::PaymentReminder => "payment_reminder",
            NotificationKind::Homework => "homework",
            NotificationKind::General => "general",
            NotificationKind::BulkMessage => "bulk_message",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "badge_update" => Ok(NotificationKind::BadgeUpdate),
            "payment_reminder" => Ok(NotificationKind::PaymentReminder),
            "homework" => Ok(NotificationKind::Homework),
            "general" => Ok(NotificationKind::General),
            "bulk_message" => Ok(NotificationKind::BulkMessage),
            other => Err(format!("Unknown notification kind: {}", other)),
        }
    }
}

/// A stored notification event.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationEvent {
    pub id: i64,
    pub notification_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub parent_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub kind: NotificationKind,
    pub title: Option<String>,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            NotificationKind::BadgeUpdate,
            NotificationKind::PaymentReminder,
            NotificationKind::Homework,
            NotificationKind::General,
            NotificationKind::BulkMessage,
        ] {
            let parsed: NotificationKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_kind_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&NotificationKind::BadgeUpdate).unwrap(),
            "\"badge_update\""
        );
    }
}
