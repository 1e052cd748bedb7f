//! Repeated negative-outcome warning evaluation.
//!
//! The persistence layer supplies the historical not_earned count for a
//! (student, badge kind) pair; this module compares it to the kind's
//! configured limit. Read-only: the result feeds notification composition
//! and never blocks a write.

use serde::Serialize;

use crate::models::badge_kind::BadgeKind;

/// Result of a warning evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeWarning {
    pub badge_kind_name: String,
    pub exceeded: bool,
    pub count: i64,
    pub limit: i64,
    /// The kind's warning text, present only when the limit is reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Evaluates the negative-outcome count against the kind's limit.
///
/// `not_earned_count` must count `not_earned` outcomes only; absences never
/// count toward the limit.
pub fn evaluate_warning(kind: &BadgeKind, not_earned_count: i64) -> BadgeWarning {
    let limit = kind.negative_limit as i64;
    let exceeded = not_earned_count >= limit;

    BadgeWarning {
        badge_kind_name: kind.name.clone(),
        exceeded,
        count: not_earned_count,
        limit,
        message: exceeded.then(|| kind.warning_message.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::badge_kind::{BadgeCategory, BadgeColor};
    use chrono::Utc;
    use uuid::Uuid;

    fn kind(negative_limit: i32) -> BadgeKind {
        BadgeKind {
            id: 1,
            badge_kind_id: Uuid::new_v4(),
            name: "Homework".to_string(),
            description: "Completed homework".to_string(),
            color: BadgeColor::Red,
            category: BadgeCategory::Homework,
            priority: 5,
            negative_limit,
            warning_message: "Homework missed too often".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_below_limit() {
        let warning = evaluate_warning(&kind(2), 1);
        assert!(!warning.exceeded);
        assert_eq!(warning.count, 1);
        assert_eq!(warning.limit, 2);
        assert!(warning.message.is_none());
    }

    #[test]
    fn test_at_limit_exceeded() {
        // Entries [not_earned, not_earned, absent, earned] over 4 days count as 2.
        let warning = evaluate_warning(&kind(2), 2);
        assert!(warning.exceeded);
        assert_eq!(warning.count, 2);
        assert_eq!(
            warning.message.as_deref(),
            Some("Homework missed too often")
        );
    }

    #[test]
    fn test_over_limit() {
        let warning = evaluate_warning(&kind(2), 5);
        assert!(warning.exceeded);
    }

    #[test]
    fn test_zero_count_never_exceeds() {
        let warning = evaluate_warning(&kind(1), 0);
        assert!(!warning.exceeded);
        assert!(warning.message.is_none());
    }

    #[test]
    fn test_serializes_without_message_when_clear() {
        let warning = evaluate_warning(&kind(3), 1);
        let json = serde_json::to_value(&warning).unwrap();
        assert!(json.get("message").is_none());
        assert_eq!(json["exceeded"], false);
    }
}
