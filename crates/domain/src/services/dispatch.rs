//! Badge notification composition and transport boundary.
//!
//! Composition is pure: given a freshly written record and the student's
//! resolved profile, build the parent-facing notification. Students without a
//! linked parent produce no notification; that is an expected branch, not an
//! error. Delivery is behind [`NotificationTransport`] so the Telegram
//! collaborator stays out of the core.

use serde_json::json;

use crate::models::daily_record::{BadgeOutcome, DailyBadgeRecord};
use crate::models::notification::{NewNotification, NotificationKind};
use crate::models::student::StudentProfile;
use crate::services::stats::success_percentage;
use crate::services::warning::BadgeWarning;

/// Title used for badge-update notifications.
const BADGE_UPDATE_TITLE: &str = "\u{1F3C6} Badge update";

/// Composes the parent-facing message body for a daily record.
///
/// One line per entry, in entry order, followed by warning lines for any
/// exceeded thresholds.
pub fn compose_badge_message(
    student_name: &str,
    record: &DailyBadgeRecord,
    warnings: &[BadgeWarning],
) -> String {
    let earned = record
        .entries
        .iter()
        .filter(|e| e.outcome == BadgeOutcome::Earned)
        .count() as u64;
    let total = record.entries.len() as u64;
    let percentage = success_percentage(earned, total);

    let mut message = format!(
        "{} earned {}/{} badges today ({}%)\n",
        student_name, earned, total, percentage
    );

    for entry in &record.entries {
        message.push_str(&format!(
            "\n{} {}: {}",
            entry.color.emoji(),
            entry.name,
            entry.outcome.symbol()
        ));
    }

    for warning in warnings.iter().filter(|w| w.exceeded) {
        if let Some(text) = &warning.message {
            message.push_str(&format!("\n\n\u{26A0} {}", text));
        }
    }

    message
}

/// Builds the badge-update notification for a just-written record.
///
/// Returns `None` when the student has no linked parent.
pub fn build_badge_notification(
    student: &StudentProfile,
    record: &DailyBadgeRecord,
    warnings: &[BadgeWarning],
) -> Option<NewNotification> {
    let parent_id = student.parent_id?;

    let earned = record
        .entries
        .iter()
        .filter(|e| e.outcome == BadgeOutcome::Earned)
        .count() as u64;
    let total = record.entries.len() as u64;
    let percentage = success_percentage(earned, total);

    let entries: Vec<serde_json::Value> = record
        .entries
        .iter()
        .map(|e| {
            json!({
                "badge_kind_id": e.badge_kind_id,
                "name": e.name,
                "outcome": e.outcome,
            })
        })
        .collect();

    Some(NewNotification {
        parent_id: Some(parent_id),
        student_id: Some(student.student_id),
        kind: NotificationKind::BadgeUpdate,
        title: Some(BADGE_UPDATE_TITLE.to_string()),
        message: compose_badge_message(&student.full_name, record, warnings),
        data: Some(json!({
            "entries": entries,
            "day": record.day,
            "percentage": percentage,
        })),
    })
}

/// Result of a delivery attempt by the transport collaborator.
#[derive(Debug, Clone)]
pub enum DeliveryResult {
    /// Message was handed to the channel.
    Sent,
    /// Recipient has no chat channel registered.
    NoChannel,
    /// Delivery failed (non-blocking).
    Failed(String),
}

/// Transport boundary for delivering notification events.
///
/// The production implementation talks to Telegram; this crate only defines
/// the seam and a logging mock.
#[async_trait::async_trait]
pub trait NotificationTransport: Send + Sync {
    /// Deliver a composed message to the given chat channel.
    async fn deliver(&self, chat_id: &str, message: &str) -> DeliveryResult;
}

/// Mock transport for development and testing. Logs instead of sending.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            simulate_failure: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
        }
    }
}

#[async_trait::async_trait]
impl NotificationTransport for MockTransport {
    async fn deliver(&self, chat_id: &str, message: &str) -> DeliveryResult {
        if self.simulate_failure {
            tracing::warn!(chat_id = %chat_id, "Mock transport simulating failure");
            return DeliveryResult::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            chat_id = %chat_id,
            message_len = %message.len(),
            "Mock: would deliver notification"
        );

        DeliveryResult::Sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::badge_kind::BadgeColor;
    use crate::models::daily_record::ResolvedBadgeEntry;
    use crate::models::student::StudentStatus;
    use chrono::{NaiveDate, Utc};
    use fake::faker::name::en::Name;
    use fake::Fake;
    use uuid::Uuid;

    fn profile(parent_id: Option<Uuid>) -> StudentProfile {
        StudentProfile {
            student_id: Uuid::new_v4(),
            student_code: "1001".to_string(),
            full_name: "Aziz Karimov".to_string(),
            group_name: Some("Group A".to_string()),
            status: StudentStatus::Active,
            parent_id,
            parent_name: parent_id.map(|_| Name().fake()),
            parent_chat_id: parent_id.map(|_| "123456789".to_string()),
        }
    }

    fn record_with(entries: Vec<(&str, BadgeOutcome)>) -> DailyBadgeRecord {
        DailyBadgeRecord {
            id: 1,
            record_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            day: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            entries: entries
                .into_iter()
                .map(|(name, outcome)| ResolvedBadgeEntry {
                    badge_kind_id: Uuid::new_v4(),
                    name: name.to_string(),
                    color: BadgeColor::Green,
                    outcome,
                })
                .collect(),
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_parent_returns_none() {
        let student = profile(None);
        let record = record_with(vec![("Homework", BadgeOutcome::Earned)]);

        assert!(build_badge_notification(&student, &record, &[]).is_none());
    }

    #[test]
    fn test_message_contains_ratio_and_breakdown() {
        let record = record_with(vec![
            ("Homework", BadgeOutcome::Earned),
            ("Discipline", BadgeOutcome::NotEarned),
            ("Attendance", BadgeOutcome::Absent),
        ]);

        let message = compose_badge_message("Aziz Karimov", &record, &[]);
        assert!(message.contains("Aziz Karimov earned 1/3 badges today (33%)"));
        assert!(message.contains("Homework: \u{2705}"));
        assert!(message.contains("Discipline: \u{274C}"));
        assert!(message.contains("Attendance: \u{26AA}"));
    }

    #[test]
    fn test_breakdown_preserves_entry_order() {
        let record = record_with(vec![
            ("Zeta", BadgeOutcome::Earned),
            ("Alpha", BadgeOutcome::Earned),
        ]);

        let message = compose_badge_message("Aziz", &record, &[]);
        let zeta = message.find("Zeta").unwrap();
        let alpha = message.find("Alpha").unwrap();
        assert!(zeta < alpha);
    }

    #[test]
    fn test_warning_lines_appended_only_when_exceeded() {
        let record = record_with(vec![("Homework", BadgeOutcome::NotEarned)]);
        let warnings = vec![
            BadgeWarning {
                badge_kind_name: "Homework".to_string(),
                exceeded: true,
                count: 3,
                limit: 2,
                message: Some("Homework missed too often".to_string()),
            },
            BadgeWarning {
                badge_kind_name: "Discipline".to_string(),
                exceeded: false,
                count: 1,
                limit: 2,
                message: None,
            },
        ];

        let message = compose_badge_message("Aziz", &record, &warnings);
        assert!(message.contains("Homework missed too often"));
        assert_eq!(message.matches('\u{26A0}').count(), 1);
    }

    #[test]
    fn test_notification_payload() {
        let parent_id = Uuid::new_v4();
        let student = profile(Some(parent_id));
        let record = record_with(vec![
            ("Homework", BadgeOutcome::Earned),
            ("Discipline", BadgeOutcome::Earned),
        ]);

        let notification = build_badge_notification(&student, &record, &[]).unwrap();
        assert_eq!(notification.parent_id, Some(parent_id));
        assert_eq!(notification.kind, NotificationKind::BadgeUpdate);

        let data = notification.data.unwrap();
        assert_eq!(data["percentage"], 100);
        assert_eq!(data["entries"].as_array().unwrap().len(), 2);
        assert_eq!(data["day"], "2024-03-11");
    }

    #[tokio::test]
    async fn test_mock_transport_sends() {
        let transport = MockTransport::new();
        let result = transport.deliver("12345", "hello").await;
        assert!(matches!(result, DeliveryResult::Sent));
    }

    #[tokio::test]
    async fn test_mock_transport_failure() {
        let transport = MockTransport::failing();
        let result = transport.deliver("12345", "hello").await;
        assert!(matches!(result, DeliveryResult::Failed(_)));
    }
}
