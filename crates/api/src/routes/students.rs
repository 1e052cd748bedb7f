//! Student endpoint handlers.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::daily_record::DailyRecordResponse;
use domain::models::{StudentProfile, UserRole};
use domain::models::student::ClaimParentRequest;
use persistence::repositories::{AuditLogRepository, StudentRepository, UserRepository};

/// A student profile with their most recent daily records.
#[derive(Debug, Serialize)]
pub struct StudentWithRecordsResponse {
    #[serde(flatten)]
    pub profile: StudentProfile,
    pub recent_records: Vec<DailyRecordResponse>,
}

/// How many recent records accompany a code lookup.
const RECENT_RECORDS_LIMIT: i64 = 7;

/// Looks up an active student by their 3-4 digit code.
///
/// GET /api/v1/students/code/:student_code
pub async fn get_student_by_code(
    State(state): State<AppState>,
    Path(student_code): Path<String>,
) -> Result<Json<StudentWithRecordsResponse>, ApiError> {
    shared::validation::validate_student_code(&student_code).map_err(|e| {
        ApiError::Validation(
            e.message
                .map(|m| m.to_string())
                .unwrap_or_else(|| "Invalid student code".to_string()),
        )
    })?;

    let students = StudentRepository::new(state.pool.clone());
    let student = students
        .find_by_code(&student_code)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;

    let profile: StudentProfile = students
        .find_profile(student.student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?
        .try_into()?;

    let entities = state
        .badges
        .records()
        .find_recent_by_student(student.student_id, None, RECENT_RECORDS_LIMIT)
        .await?;
    let recent_records = state
        .badges
        .resolve_records(entities)
        .await?
        .into_iter()
        .map(DailyRecordResponse::from)
        .collect();

    Ok(Json(StudentWithRecordsResponse {
        profile,
        recent_records,
    }))
}

/// Links a parent to a student that has none yet.
///
/// First-writer-wins: once a parent is linked the link is permanent, and a
/// second claim gets 409. Every successful link leaves an audit entry.
///
/// POST /api/v1/students/:student_id/claim-parent
pub async fn claim_parent(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(student_id): Path<Uuid>,
    Json(request): Json<ClaimParentRequest>,
) -> Result<Json<StudentProfile>, ApiError> {
    let users = UserRepository::new(state.pool.clone());
    let parent = users
        .find_by_user_id(request.parent_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Parent user not found".into()))?;

    if parent.role != UserRole::Parent.as_str() || !parent.is_active {
        return Err(ApiError::Validation(
            "User is not an active parent account".into(),
        ));
    }

    let students = StudentRepository::new(state.pool.clone());
    let assigned = students
        .assign_parent_if_unset(student_id, request.parent_id)
        .await?;

    if !assigned {
        // Distinguish a missing student from an already-linked one.
        let existing = students
            .find_by_student_id(student_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;

        return Err(ApiError::Conflict(format!(
            "Student already has a linked parent: {}",
            existing
                .parent_id
                .map(|id| id.to_string())
                .unwrap_or_default()
        )));
    }

    let audit = AuditLogRepository::new(state.pool.clone());
    audit
        .create(
            Some(auth.user_id),
            "parent_linked",
            Some(student_id),
            Some(json!({ "parent_id": request.parent_id })),
        )
        .await?;

    tracing::info!(
        student_id = %student_id,
        parent_id = %request.parent_id,
        actor_id = %auth.user_id,
        "Parent linked to student"
    );

    let profile: StudentProfile = students
        .find_profile(student_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?
        .try_into()?;

    Ok(Json(profile))
}

/// Lists the calling parent's active students.
///
/// GET /api/v1/parents/me/students
pub async fn my_students(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<StudentProfile>>, ApiError> {
    let students = StudentRepository::new(state.pool.clone());
    let profiles = students
        .find_profiles_by_parent(auth.user_id)
        .await?
        .into_iter()
        .map(StudentProfile::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(profiles))
}
