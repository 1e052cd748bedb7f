//! Notification repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::NotificationEntity;
use domain::models::NewNotification;

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persists a notification event.
    pub async fn create(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationEntity, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            INSERT INTO notifications (parent_id, student_id, kind, title, message, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(notification.parent_id)
        .bind(notification.student_id)
        .bind(notification.kind.as_str())
        .bind(notification.title.as_deref())
        .bind(&notification.message)
        .bind(notification.data.clone())
        .fetch_one(&self.pool)
        .await
    }

    /// Lists a parent's notifications, newest first.
    pub async fn list_by_parent(
        &self,
        parent_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<NotificationEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            SELECT * FROM notifications
            WHERE parent_id = $1
              AND ($2 = FALSE OR read = FALSE)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(parent_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts a parent's notifications.
    pub async fn count_by_parent(
        &self,
        parent_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM notifications
            WHERE parent_id = $1
              AND ($2 = FALSE OR read = FALSE)
            "#,
        )
        .bind(parent_id)
        .bind(unread_only)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Marks a notification as read.
    ///
    /// When `parent_id` is given, only that parent's notification matches;
    /// callers use it to scope the update to the authenticated owner.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Option<NotificationEntity>, sqlx::Error> {
        sqlx::query_as::<_, NotificationEntity>(
            r#"
            UPDATE notifications
            SET read = TRUE
            WHERE notification_id = $1
              AND ($2::uuid IS NULL OR parent_id = $2)
            RETURNING *
            "#,
        )
        .bind(notification_id)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
    }
}
