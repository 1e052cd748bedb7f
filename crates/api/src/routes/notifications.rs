//! Notification endpoint handlers.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use domain::models::NotificationEvent;
use persistence::repositories::NotificationRepository;
use shared::pagination::{PageParams, Paginated};

/// Query parameters for listing notifications.
#[derive(Debug, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub unread_only: bool,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Lists the caller's notifications, newest first.
///
/// GET /api/v1/notifications
pub async fn list_my_notifications(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(params): Query<ListNotificationsParams>,
) -> Result<Json<Paginated<NotificationEvent>>, ApiError> {
    let page = PageParams {
        page: params.page.unwrap_or(1),
        limit: params.limit.unwrap_or(shared::pagination::DEFAULT_PAGE_SIZE),
    };

    let repo = NotificationRepository::new(state.pool.clone());
    let items = repo
        .list_by_parent(auth.user_id, params.unread_only, page.limit(), page.offset())
        .await?
        .into_iter()
        .map(NotificationEvent::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    let total = repo.count_by_parent(auth.user_id, params.unread_only).await?;

    Ok(Json(Paginated::new(items, &page, total)))
}

/// Marks one of the caller's notifications as read.
///
/// Staff can mark any notification; parents only their own.
///
/// POST /api/v1/notifications/:notification_id/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(notification_id): Path<Uuid>,
) -> Result<Json<NotificationEvent>, ApiError> {
    let owner_filter = if auth.role.is_staff() {
        None
    } else {
        Some(auth.user_id)
    };

    let repo = NotificationRepository::new(state.pool.clone());
    let entity = repo
        .mark_read(notification_id, owner_filter)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".into()))?;

    Ok(Json(entity.try_into()?))
}
