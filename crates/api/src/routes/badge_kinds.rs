//! Badge catalog endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use domain::models::badge_kind::{
    default_warning_message, BadgeKind, BadgeKindResponse, CreateBadgeKindRequest,
    UpdateBadgeKindRequest,
};
use persistence::repositories::BadgeKindRepository;

/// Query parameters for listing badge kinds.
#[derive(Debug, Deserialize)]
pub struct ListBadgeKindsParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Creates a badge kind.
///
/// POST /api/v1/badge-kinds
pub async fn create_badge_kind(
    State(state): State<AppState>,
    Json(request): Json<CreateBadgeKindRequest>,
) -> Result<(StatusCode, Json<BadgeKindResponse>), ApiError> {
    request.validate()?;

    let repo = BadgeKindRepository::new(state.pool.clone());

    // Names are unique among active kinds only; deactivated kinds free theirs.
    if repo.active_name_exists(&request.name, None).await? {
        return Err(ApiError::Conflict(format!(
            "An active badge kind named '{}' already exists",
            request.name
        )));
    }

    let warning_message = request
        .warning_message
        .unwrap_or_else(|| default_warning_message(&request.name, request.negative_limit));

    let entity = repo
        .create(
            &request.name,
            &request.description,
            request.color.as_str(),
            request.category.as_str(),
            request.priority,
            request.negative_limit,
            &warning_message,
        )
        .await?;

    let kind: BadgeKind = entity.try_into()?;

    tracing::info!(
        badge_kind_id = %kind.badge_kind_id,
        name = %kind.name,
        "Badge kind created"
    );

    Ok((StatusCode::CREATED, Json(kind.into())))
}

/// Lists badge kinds, priority first then name.
///
/// GET /api/v1/badge-kinds
pub async fn list_badge_kinds(
    State(state): State<AppState>,
    Query(params): Query<ListBadgeKindsParams>,
) -> Result<Json<Vec<BadgeKindResponse>>, ApiError> {
    let repo = BadgeKindRepository::new(state.pool.clone());
    let kinds = repo
        .list(params.include_inactive)
        .await?
        .into_iter()
        .map(|entity| BadgeKind::try_from(entity).map(BadgeKindResponse::from))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(kinds))
}

/// Fetches one badge kind, active or not.
///
/// GET /api/v1/badge-kinds/:badge_kind_id
pub async fn get_badge_kind(
    State(state): State<AppState>,
    Path(badge_kind_id): Path<Uuid>,
) -> Result<Json<BadgeKindResponse>, ApiError> {
    let repo = BadgeKindRepository::new(state.pool.clone());
    let entity = repo
        .find_by_badge_kind_id(badge_kind_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge kind not found".into()))?;

    let kind: BadgeKind = entity.try_into()?;
    Ok(Json(kind.into()))
}

/// Partially updates a badge kind.
///
/// PATCH /api/v1/badge-kinds/:badge_kind_id
pub async fn update_badge_kind(
    State(state): State<AppState>,
    Path(badge_kind_id): Path<Uuid>,
    Json(request): Json<UpdateBadgeKindRequest>,
) -> Result<Json<BadgeKindResponse>, ApiError> {
    request.validate()?;

    let repo = BadgeKindRepository::new(state.pool.clone());

    if let Some(ref name) = request.name {
        if repo.active_name_exists(name, Some(badge_kind_id)).await? {
            return Err(ApiError::Conflict(format!(
                "An active badge kind named '{}' already exists",
                name
            )));
        }
    }

    let entity = repo
        .update(
            badge_kind_id,
            request.name.as_deref(),
            request.description.as_deref(),
            request.color.map(|c| c.as_str()),
            request.category.map(|c| c.as_str()),
            request.priority,
            request.negative_limit,
            request.warning_message.as_deref(),
            request.is_active,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge kind not found".into()))?;

    let kind: BadgeKind = entity.try_into()?;

    tracing::info!(
        badge_kind_id = %kind.badge_kind_id,
        "Badge kind updated"
    );

    Ok(Json(kind.into()))
}

/// Deactivates a badge kind. Historical records keep resolving it.
///
/// DELETE /api/v1/badge-kinds/:badge_kind_id
pub async fn deactivate_badge_kind(
    State(state): State<AppState>,
    Path(badge_kind_id): Path<Uuid>,
) -> Result<Json<BadgeKindResponse>, ApiError> {
    let repo = BadgeKindRepository::new(state.pool.clone());
    let entity = repo
        .deactivate(badge_kind_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Badge kind not found".into()))?;

    let kind: BadgeKind = entity.try_into()?;

    tracing::info!(
        badge_kind_id = %kind.badge_kind_id,
        name = %kind.name,
        "Badge kind deactivated"
    );

    Ok(Json(kind.into()))
}
