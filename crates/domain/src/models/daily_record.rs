//! Daily badge record models.
//!
//! One record exists per (student, calendar day). Writing a second time for the
//! same day replaces the entries list wholesale; records are never deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::badge_kind::BadgeColor;

/// Tri-state outcome of a single badge entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeOutcome {
    Earned,
    NotEarned,
    Absent,
}

impl BadgeOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeOutcome::Earned => "earned",
            BadgeOutcome::NotEarned => "not_earned",
            BadgeOutcome::Absent => "absent",
        }
    }

    /// Symbol used in parent-facing breakdown lines.
    pub fn symbol(&self) -> &'static str {
        match self {
            BadgeOutcome::Earned => "\u{2705}",
            BadgeOutcome::NotEarned => "\u{274C}",
            BadgeOutcome::Absent => "\u{26AA}",
        }
    }

    /// Whether this outcome counts toward the negative-outcome limit.
    /// Absences do not.
    pub fn is_negative(&self) -> bool {
        matches!(self, BadgeOutcome::NotEarned)
    }
}

impl std::fmt::Display for BadgeOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BadgeOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "earned" => Ok(BadgeOutcome::Earned),
            "not_earned" => Ok(BadgeOutcome::NotEarned),
            "absent" => Ok(BadgeOutcome::Absent),
            other => Err(format!("Unknown badge outcome: {}", other)),
        }
    }
}

/// Normalizes a submitted timestamp to its calendar day.
///
/// Days are kept in a fixed reference timezone (UTC) so two writes on the same
/// calendar day always collide into one record regardless of submitted time.
pub fn normalize_day(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// A single (badge kind, outcome) pair as submitted by a writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeEntryInput {
    pub badge_kind_id: Uuid,
    pub outcome: BadgeOutcome,
}

/// A badge entry resolved with catalog display data for formatting.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedBadgeEntry {
    pub badge_kind_id: Uuid,
    pub name: String,
    pub color: BadgeColor,
    pub outcome: BadgeOutcome,
}

/// A daily badge record with its entries resolved.
#[derive(Debug, Clone, Serialize)]
pub struct DailyBadgeRecord {
    pub id: i64,
    pub record_id: Uuid,
    pub student_id: Uuid,
    pub day: NaiveDate,
    /// Ordered entries; order is the writer's submission order.
    pub entries: Vec<ResolvedBadgeEntry>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for writing a single student's daily record.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpsertDailyRecordRequest {
    pub student_id: Uuid,

    /// Submission time; defaults to now. Time-of-day is stripped.
    pub date: Option<DateTime<Utc>>,

    /// Upper bound on entries is enforced against the configured limit.
    #[validate(length(min = 1, message = "Entries must not be empty"))]
    pub entries: Vec<BadgeEntryInput>,

    #[validate(custom(function = "validate_optional_notes"))]
    pub notes: Option<String>,
}

/// Request body for writing the same entries to many students.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BulkUpsertDailyRecordRequest {
    /// Upper bound on students is enforced against the configured limit.
    #[validate(length(min = 1, message = "Student list must not be empty"))]
    pub student_ids: Vec<Uuid>,

    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "Entries must not be empty"))]
    pub entries: Vec<BadgeEntryInput>,

    #[validate(custom(function = "validate_optional_notes"))]
    pub notes: Option<String>,
}

fn validate_optional_notes(notes: &str) -> Result<(), validator::ValidationError> {
    shared::validation::validate_notes(notes)
}

/// API response shape for a daily record.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecordResponse {
    pub record_id: Uuid,
    pub student_id: Uuid,
    pub day: NaiveDate,
    pub entries: Vec<ResolvedEntryResponse>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Entry shape inside [`DailyRecordResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntryResponse {
    pub badge_kind_id: Uuid,
    pub name: String,
    pub color: BadgeColor,
    pub emoji: &'static str,
    pub outcome: BadgeOutcome,
}

impl From<ResolvedBadgeEntry> for ResolvedEntryResponse {
    fn from(entry: ResolvedBadgeEntry) -> Self {
        Self {
            badge_kind_id: entry.badge_kind_id,
            name: entry.name,
            color: entry.color,
            emoji: entry.color.emoji(),
            outcome: entry.outcome,
        }
    }
}

impl From<DailyBadgeRecord> for DailyRecordResponse {
    fn from(record: DailyBadgeRecord) -> Self {
        Self {
            record_id: record.record_id,
            student_id: record.student_id,
            day: record.day,
            entries: record.entries.into_iter().map(Into::into).collect(),
            notes: record.notes,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Per-student outcome of a bulk write.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemResult {
    pub student_id: Uuid,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<DailyRecordResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<BulkItemError>,
}

/// Error detail for a failed bulk item.
#[derive(Debug, Clone, Serialize)]
pub struct BulkItemError {
    /// Machine-readable error code: not_found, validation_error, storage_error.
    pub code: String,
    pub message: String,
}

impl BulkItemResult {
    pub fn ok(student_id: Uuid, record: DailyRecordResponse) -> Self {
        Self {
            student_id,
            success: true,
            record: Some(record),
            error: None,
        }
    }

    pub fn failed(student_id: Uuid, code: &str, message: impl Into<String>) -> Self {
        Self {
            student_id,
            success: false,
            record: None,
            error: Some(BulkItemError {
                code: code.to_string(),
                message: message.into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_outcome_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&BadgeOutcome::NotEarned).unwrap(),
            "\"not_earned\""
        );
        let parsed: BadgeOutcome = serde_json::from_str("\"absent\"").unwrap();
        assert_eq!(parsed, BadgeOutcome::Absent);
    }

    #[test]
    fn test_outcome_unknown_rejected() {
        assert!(serde_json::from_str::<BadgeOutcome>("\"skipped\"").is_err());
        assert!("skipped".parse::<BadgeOutcome>().is_err());
    }

    #[test]
    fn test_only_not_earned_is_negative() {
        assert!(BadgeOutcome::NotEarned.is_negative());
        assert!(!BadgeOutcome::Earned.is_negative());
        assert!(!BadgeOutcome::Absent.is_negative());
    }

    #[test]
    fn test_normalize_day_strips_time() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 11, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 3, 11, 23, 0, 0).unwrap();

        assert_eq!(normalize_day(morning), normalize_day(evening));
        assert_eq!(
            normalize_day(morning),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn test_normalize_day_midnight_boundary() {
        let before = Utc.with_ymd_and_hms(2024, 3, 11, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        assert_ne!(normalize_day(before), normalize_day(after));
    }

    #[test]
    fn test_upsert_request_rejects_empty_entries() {
        let json = format!(
            r#"{{"student_id": "{}", "entries": []}}"#,
            Uuid::new_v4()
        );
        let request: UpsertDailyRecordRequest = serde_json::from_str(&json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_upsert_request_valid() {
        let json = format!(
            r#"{{"student_id": "{}", "entries": [{{"badge_kind_id": "{}", "outcome": "earned"}}]}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let request: UpsertDailyRecordRequest = serde_json::from_str(&json).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.date.is_none());
    }

    #[test]
    fn test_bulk_request_rejects_empty_students() {
        let json = format!(
            r#"{{"student_ids": [], "entries": [{{"badge_kind_id": "{}", "outcome": "earned"}}]}}"#,
            Uuid::new_v4()
        );
        let request: BulkUpsertDailyRecordRequest = serde_json::from_str(&json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_bulk_item_result_shapes() {
        let student_id = Uuid::new_v4();
        let failed = BulkItemResult::failed(student_id, "not_found", "Student not found");
        assert!(!failed.success);
        assert_eq!(failed.error.as_ref().unwrap().code, "not_found");

        let json = serde_json::to_value(&failed).unwrap();
        assert!(json.get("record").is_none());
    }
}
