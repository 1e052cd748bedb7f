//! Daily badge record database entities.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::EntityError;
use domain::models::daily_record::{DailyBadgeRecord, ResolvedBadgeEntry};

/// Database entity for the daily_badge_records table.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRecordEntity {
    pub id: i64,
    pub record_id: Uuid,
    pub student_id: Uuid,
    pub day: NaiveDate,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entry row joined with its badge kind's display data.
#[derive(Debug, Clone, FromRow)]
pub struct ResolvedEntryRow {
    pub record_id: Uuid,
    pub position: i32,
    pub badge_kind_id: Uuid,
    pub outcome: String,
    pub badge_name: String,
    pub badge_color: String,
}

impl TryFrom<ResolvedEntryRow> for ResolvedBadgeEntry {
    type Error = EntityError;

    fn try_from(row: ResolvedEntryRow) -> Result<Self, Self::Error> {
        let outcome = row
            .outcome
            .parse()
            .map_err(|_| EntityError::new("outcome", &row.outcome))?;
        let color = row
            .badge_color
            .parse()
            .map_err(|_| EntityError::new("badge_color", &row.badge_color))?;

        Ok(Self {
            badge_kind_id: row.badge_kind_id,
            name: row.badge_name,
            color,
            outcome,
        })
    }
}

impl DailyRecordEntity {
    /// Assembles the domain record from this row plus its resolved entries.
    ///
    /// `rows` must already be ordered by position.
    pub fn into_record(
        self,
        rows: Vec<ResolvedEntryRow>,
    ) -> Result<DailyBadgeRecord, EntityError> {
        let entries = rows
            .into_iter()
            .map(ResolvedBadgeEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DailyBadgeRecord {
            id: self.id,
            record_id: self.record_id,
            student_id: self.student_id,
            day: self.day,
            entries,
            notes: self.notes,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::daily_record::BadgeOutcome;
    use domain::models::BadgeColor;

    fn entry_row(position: i32, outcome: &str) -> ResolvedEntryRow {
        ResolvedEntryRow {
            record_id: Uuid::new_v4(),
            position,
            badge_kind_id: Uuid::new_v4(),
            outcome: outcome.to_string(),
            badge_name: "Homework".to_string(),
            badge_color: "green".to_string(),
        }
    }

    #[test]
    fn test_entry_conversion() {
        let entry: ResolvedBadgeEntry = entry_row(0, "not_earned").try_into().unwrap();
        assert_eq!(entry.outcome, BadgeOutcome::NotEarned);
        assert_eq!(entry.color, BadgeColor::Green);
    }

    #[test]
    fn test_invalid_outcome_rejected() {
        let err = ResolvedBadgeEntry::try_from(entry_row(0, "skipped")).unwrap_err();
        assert_eq!(err.column, "outcome");
    }

    #[test]
    fn test_into_record_keeps_entry_order() {
        let entity = DailyRecordEntity {
            id: 1,
            record_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            day: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            notes: None,
            created_by: Uuid::new_v4(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let mut first = entry_row(0, "earned");
        first.badge_name = "First".to_string();
        let mut second = entry_row(1, "absent");
        second.badge_name = "Second".to_string();

        let record = entity.into_record(vec![first, second]).unwrap();
        assert_eq!(record.entries[0].name, "First");
        assert_eq!(record.entries[1].name, "Second");
    }
}
