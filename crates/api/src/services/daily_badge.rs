//! Daily badge write-path orchestration.
//!
//! The write path is: validate the student and the referenced badge kinds,
//! normalize the submitted time to a calendar day, upsert the record, then
//! evaluate warnings and dispatch the parent notification. Everything after
//! the committed upsert is best-effort: a warning-evaluation or dispatch
//! failure is logged and never rolls back or fails the write.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use domain::models::daily_record::{
    normalize_day, BadgeEntryInput, BulkItemResult, DailyBadgeRecord, DailyRecordResponse,
};
use domain::models::{BadgeKind, StudentProfile};
use domain::services::dispatch::{
    build_badge_notification, DeliveryResult, NotificationTransport,
};
use domain::services::warning::{evaluate_warning, BadgeWarning};
use persistence::entities::DailyRecordEntity;
use persistence::repositories::{
    BadgeKindRepository, DailyRecordRepository, NotificationRepository, StudentRepository,
};

use crate::error::ApiError;
use crate::middleware::metrics::{record_daily_record_upserted, record_notification_dispatch};

/// Result of one daily record write.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UpsertOutcome {
    pub record: DailyRecordResponse,
    /// False when an existing record for (student, day) was replaced.
    pub created: bool,
    /// Warning evaluations for kinds marked not_earned in this write.
    pub warnings: Vec<BadgeWarning>,
    /// Whether a parent notification was composed and stored.
    pub notified: bool,
}

/// Service owning the daily badge write path.
#[derive(Clone)]
pub struct DailyBadgeService {
    records: DailyRecordRepository,
    badge_kinds: BadgeKindRepository,
    students: StudentRepository,
    notifications: NotificationRepository,
    transport: Arc<dyn NotificationTransport>,
}

impl DailyBadgeService {
    /// Creates the service with repositories over the given pool.
    pub fn new(pool: PgPool, transport: Arc<dyn NotificationTransport>) -> Self {
        Self {
            records: DailyRecordRepository::new(pool.clone()),
            badge_kinds: BadgeKindRepository::new(pool.clone()),
            students: StudentRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool),
            transport,
        }
    }

    /// Writes the daily record for one student, replacing any existing record
    /// for the same calendar day.
    pub async fn upsert_for_student(
        &self,
        created_by: Uuid,
        student_id: Uuid,
        date: Option<DateTime<Utc>>,
        entries: &[BadgeEntryInput],
        notes: Option<&str>,
    ) -> Result<UpsertOutcome, ApiError> {
        let profile: StudentProfile = self
            .students
            .find_profile(student_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Student not found".into()))?
            .try_into()?;

        let day = normalize_day(date.unwrap_or_else(Utc::now));
        shared::validation::validate_record_day(day).map_err(|e| {
            ApiError::Validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid record day".to_string()),
            )
        })?;

        let kinds = self.resolve_badge_kinds(entries).await?;

        let (entity, created) = self
            .records
            .upsert(student_id, day, entries, notes, created_by)
            .await?;
        record_daily_record_upserted(!created);

        tracing::info!(
            student_id = %student_id,
            day = %day,
            entries = entries.len(),
            created = created,
            "Daily badge record written"
        );

        let record = self.resolve_record(entity).await?;
        let warnings = warnings_or_empty(
            self.evaluate_warnings(student_id, entries, &kinds).await,
            student_id,
        );

        let notified = self.dispatch(&profile, &record, &warnings).await;

        Ok(UpsertOutcome {
            record: record.into(),
            created,
            warnings,
            notified,
        })
    }

    /// Writes the same entries for many students.
    ///
    /// Items are isolated: one student failing does not abort the rest, and
    /// every student gets a result entry in input order.
    pub async fn upsert_bulk(
        &self,
        created_by: Uuid,
        student_ids: &[Uuid],
        date: Option<DateTime<Utc>>,
        entries: &[BadgeEntryInput],
        notes: Option<&str>,
    ) -> Vec<BulkItemResult> {
        let mut results = Vec::with_capacity(student_ids.len());

        for &student_id in student_ids {
            match self
                .upsert_for_student(created_by, student_id, date, entries, notes)
                .await
            {
                Ok(outcome) => results.push(BulkItemResult::ok(student_id, outcome.record)),
                Err(e) => {
                    tracing::warn!(
                        student_id = %student_id,
                        error = %e,
                        "Bulk item failed"
                    );
                    results.push(BulkItemResult::failed(student_id, bulk_error_code(&e), e.to_string()));
                }
            }
        }

        results
    }

    /// Resolves record entities into domain records with their entries.
    pub async fn resolve_records(
        &self,
        entities: Vec<DailyRecordEntity>,
    ) -> Result<Vec<DailyBadgeRecord>, ApiError> {
        let record_ids: Vec<Uuid> = entities.iter().map(|e| e.record_id).collect();
        let rows = self.records.entries_for_records(&record_ids).await?;

        let mut by_record: HashMap<Uuid, Vec<_>> = HashMap::new();
        for row in rows {
            by_record.entry(row.record_id).or_default().push(row);
        }

        entities
            .into_iter()
            .map(|entity| {
                let rows = by_record.remove(&entity.record_id).unwrap_or_default();
                entity.into_record(rows).map_err(ApiError::from)
            })
            .collect()
    }

    async fn resolve_record(
        &self,
        entity: DailyRecordEntity,
    ) -> Result<DailyBadgeRecord, ApiError> {
        let rows = self.records.entries_for_records(&[entity.record_id]).await?;
        Ok(entity.into_record(rows)?)
    }

    /// Loads and validates the badge kinds referenced by the entries.
    ///
    /// Unknown kinds reject the write before anything is stored. Inactive
    /// kinds are accepted; historical records keep referencing them.
    async fn resolve_badge_kinds(
        &self,
        entries: &[BadgeEntryInput],
    ) -> Result<HashMap<Uuid, BadgeKind>, ApiError> {
        let ids: Vec<Uuid> = entries
            .iter()
            .map(|e| e.badge_kind_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let kinds: Vec<BadgeKind> = self
            .badge_kinds
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<_, _>>()?;

        let by_id: HashMap<Uuid, BadgeKind> =
            kinds.into_iter().map(|k| (k.badge_kind_id, k)).collect();

        for id in &ids {
            if !by_id.contains_key(id) {
                return Err(ApiError::Validation(format!("Unknown badge kind: {}", id)));
            }
        }

        Ok(by_id)
    }

    /// Evaluates warning thresholds for kinds marked not_earned in this write.
    ///
    /// Counts run after the upsert committed so the freshly written entries
    /// are included.
    async fn evaluate_warnings(
        &self,
        student_id: Uuid,
        entries: &[BadgeEntryInput],
        kinds: &HashMap<Uuid, BadgeKind>,
    ) -> Result<Vec<BadgeWarning>, ApiError> {
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();

        for entry in entries {
            if !entry.outcome.is_negative() || !seen.insert(entry.badge_kind_id) {
                continue;
            }
            let Some(kind) = kinds.get(&entry.badge_kind_id) else {
                continue;
            };

            let count = self
                .records
                .count_not_earned(student_id, entry.badge_kind_id)
                .await?;
            warnings.push(evaluate_warning(kind, count));
        }

        Ok(warnings)
    }

    /// Composes, stores and delivers the parent notification.
    ///
    /// Returns whether a notification was stored. Never fails the write:
    /// students without a parent are skipped silently, and storage or
    /// delivery errors are logged.
    async fn dispatch(
        &self,
        profile: &StudentProfile,
        record: &DailyBadgeRecord,
        warnings: &[BadgeWarning],
    ) -> bool {
        let Some(notification) = build_badge_notification(profile, record, warnings) else {
            tracing::debug!(
                student_id = %profile.student_id,
                "No linked parent, skipping notification"
            );
            record_notification_dispatch("no_parent");
            return false;
        };

        if let Err(e) = self.notifications.create(&notification).await {
            tracing::error!(
                student_id = %profile.student_id,
                error = %e,
                "Failed to store notification"
            );
            record_notification_dispatch("store_failed");
            return false;
        }

        match &profile.parent_chat_id {
            Some(chat_id) => match self.transport.deliver(chat_id, &notification.message).await {
                DeliveryResult::Sent => {
                    record_notification_dispatch("sent");
                }
                DeliveryResult::NoChannel => {
                    record_notification_dispatch("no_channel");
                }
                DeliveryResult::Failed(reason) => {
                    tracing::warn!(
                        student_id = %profile.student_id,
                        reason = %reason,
                        "Notification delivery failed"
                    );
                    record_notification_dispatch("failed");
                }
            },
            None => {
                record_notification_dispatch("no_channel");
            }
        }

        true
    }

    /// Read access to the record repository for query handlers.
    pub fn records(&self) -> &DailyRecordRepository {
        &self.records
    }
}

/// Collapses a failed warning evaluation into an empty warning list.
///
/// The warning counts run after the record committed, so a query failure
/// here must not turn an already-persisted write into an error response.
fn warnings_or_empty(
    result: Result<Vec<BadgeWarning>, ApiError>,
    student_id: Uuid,
) -> Vec<BadgeWarning> {
    match result {
        Ok(warnings) => warnings,
        Err(e) => {
            tracing::error!(
                student_id = %student_id,
                error = %e,
                "Warning evaluation failed after write, continuing without warnings"
            );
            Vec::new()
        }
    }
}

/// Maps an error to the bulk item machine-readable code.
fn bulk_error_code(error: &ApiError) -> &'static str {
    match error {
        ApiError::NotFound(_) => "not_found",
        ApiError::Validation(_) => "validation_error",
        _ => "storage_error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::badge_kind::{BadgeCategory, BadgeColor};

    fn sample_warning() -> BadgeWarning {
        let kind = BadgeKind {
            id: 1,
            badge_kind_id: Uuid::new_v4(),
            name: "Homework".to_string(),
            description: "Homework done".to_string(),
            color: BadgeColor::Green,
            category: BadgeCategory::Homework,
            priority: 1,
            negative_limit: 2,
            warning_message: "Homework was not earned 2 times - please talk with your child"
                .to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        evaluate_warning(&kind, 3)
    }

    #[test]
    fn test_warning_evaluation_error_does_not_surface() {
        let student_id = Uuid::new_v4();
        let failed: Result<Vec<BadgeWarning>, ApiError> =
            Err(ApiError::Internal("connection reset".into()));

        assert!(warnings_or_empty(failed, student_id).is_empty());
    }

    #[test]
    fn test_warning_evaluation_success_passes_through() {
        let student_id = Uuid::new_v4();
        let warnings = warnings_or_empty(Ok(vec![sample_warning()]), student_id);

        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].exceeded);
    }

    #[test]
    fn test_bulk_error_codes() {
        assert_eq!(bulk_error_code(&ApiError::NotFound("x".into())), "not_found");
        assert_eq!(
            bulk_error_code(&ApiError::Validation("x".into())),
            "validation_error"
        );
        assert_eq!(
            bulk_error_code(&ApiError::Internal("x".into())),
            "storage_error"
        );
        assert_eq!(
            bulk_error_code(&ApiError::Conflict("x".into())),
            "storage_error"
        );
    }
}
