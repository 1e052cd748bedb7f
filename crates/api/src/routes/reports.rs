//! Badge statistics and warning endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::BadgeKind;
use domain::services::stats::{aggregate_badge_stats, BadgeStatsReport};
use domain::services::warning::{evaluate_warning, BadgeWarning};
use persistence::repositories::{BadgeKindRepository, StudentRepository};

/// Query parameters for the badge report.
#[derive(Debug, Deserialize)]
pub struct BadgeReportParams {
    /// Restrict the report to the last N days. Unset means the most recent
    /// records up to the configured limit.
    pub days: Option<i64>,
}

/// Badge report response.
#[derive(Debug, Serialize)]
pub struct BadgeReportResponse {
    pub student_id: Uuid,
    /// Days of history the report covers, when a window was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_day: Option<NaiveDate>,
    pub records: usize,
    #[serde(flatten)]
    pub stats: BadgeStatsReport,
}

/// Aggregates a student's badge statistics over their recent records.
///
/// GET /api/v1/students/:student_id/badge-report
pub async fn student_badge_report(
    State(state): State<AppState>,
    Path(student_id): Path<Uuid>,
    Query(params): Query<BadgeReportParams>,
) -> Result<Json<BadgeReportResponse>, ApiError> {
    let students = StudentRepository::new(state.pool.clone());
    if students.find_by_student_id(student_id).await?.is_none() {
        return Err(ApiError::NotFound("Student not found".into()));
    }

    let since_day = match params.days {
        Some(days) if days <= 0 => {
            return Err(ApiError::Validation("days must be positive".into()));
        }
        Some(days) => Some(Utc::now().date_naive() - Duration::days(days)),
        None => None,
    };

    let entities = state
        .badges
        .records()
        .find_recent_by_student(student_id, since_day, state.config.limits.report_record_limit)
        .await?;
    let records = state.badges.resolve_records(entities).await?;

    let stats = aggregate_badge_stats(&records);

    Ok(Json(BadgeReportResponse {
        student_id,
        since_day,
        records: records.len(),
        stats,
    }))
}

/// Evaluates one badge kind's negative-outcome warning for a student.
///
/// GET /api/v1/students/:student_id/badges/:badge_kind_id/warning
pub async fn badge_warning_status(
    State(state): State<AppState>,
    Path((student_id, badge_kind_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BadgeWarning>, ApiError> {
    let students = StudentRepository::new(state.pool.clone());
    if students.find_by_student_id(student_id).await?.is_none() {
        return Err(ApiError::NotFound("Student not found".into()));
    }

    let kinds = BadgeKindRepository::new(state.pool.clone());
    let kind: BadgeKind = kinds
        .find_by_badge_kind_id(badge_kind_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge kind not found".into()))?
        .try_into()?;

    let count = state
        .badges
        .records()
        .count_not_earned(student_id, badge_kind_id)
        .await?;

    Ok(Json(evaluate_warning(&kind, count)))
}
