//! Badge kind repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::BadgeKindEntity;

/// Repository for badge catalog database operations.
#[derive(Clone)]
pub struct BadgeKindRepository {
    pool: PgPool,
}

impl BadgeKindRepository {
    /// Creates a new badge kind repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a new badge kind.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        name: &str,
        description: &str,
        color: &str,
        category: &str,
        priority: i32,
        negative_limit: i32,
        warning_message: &str,
    ) -> Result<BadgeKindEntity, sqlx::Error> {
        sqlx::query_as::<_, BadgeKindEntity>(
            r#"
            INSERT INTO badge_kinds (
                name,
                description,
                color,
                category,
                priority,
                negative_limit,
                warning_message
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(category)
        .bind(priority)
        .bind(negative_limit)
        .bind(warning_message)
        .fetch_one(&self.pool)
        .await
    }

    /// Finds a badge kind by its badge_kind_id, active or not.
    ///
    /// Inactive kinds must still resolve for historical records.
    pub async fn find_by_badge_kind_id(
        &self,
        badge_kind_id: Uuid,
    ) -> Result<Option<BadgeKindEntity>, sqlx::Error> {
        sqlx::query_as::<_, BadgeKindEntity>(
            r#"
            SELECT * FROM badge_kinds
            WHERE badge_kind_id = $1
            "#,
        )
        .bind(badge_kind_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds all badge kinds in the given id set.
    pub async fn find_by_ids(
        &self,
        badge_kind_ids: &[Uuid],
    ) -> Result<Vec<BadgeKindEntity>, sqlx::Error> {
        if badge_kind_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, BadgeKindEntity>(
            r#"
            SELECT * FROM badge_kinds
            WHERE badge_kind_id = ANY($1)
            "#,
        )
        .bind(badge_kind_ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Lists badge kinds, priority first then name.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<BadgeKindEntity>, sqlx::Error> {
        if include_inactive {
            sqlx::query_as::<_, BadgeKindEntity>(
                r#"
                SELECT * FROM badge_kinds
                ORDER BY priority DESC, name ASC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, BadgeKindEntity>(
                r#"
                SELECT * FROM badge_kinds
                WHERE is_active = TRUE
                ORDER BY priority DESC, name ASC
                "#,
            )
            .fetch_all(&self.pool)
            .await
        }
    }

    /// Checks if an active kind with the given name already exists.
    pub async fn active_name_exists(
        &self,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, sqlx::Error> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM badge_kinds
                WHERE name = $1
                  AND is_active = TRUE
                  AND ($2::uuid IS NULL OR badge_kind_id <> $2)
            )
            "#,
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Partially updates a badge kind.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        badge_kind_id: Uuid,
        name: Option<&str>,
        description: Option<&str>,
        color: Option<&str>,
        category: Option<&str>,
        priority: Option<i32>,
        negative_limit: Option<i32>,
        warning_message: Option<&str>,
        is_active: Option<bool>,
    ) -> Result<Option<BadgeKindEntity>, sqlx::Error> {
        sqlx::query_as::<_, BadgeKindEntity>(
            r#"
            UPDATE badge_kinds
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                color = COALESCE($4, color),
                category = COALESCE($5, category),
                priority = COALESCE($6, priority),
                negative_limit = COALESCE($7, negative_limit),
                warning_message = COALESCE($8, warning_message),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
            WHERE badge_kind_id = $1
            RETURNING *
            "#,
        )
        .bind(badge_kind_id)
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(category)
        .bind(priority)
        .bind(negative_limit)
        .bind(warning_message)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await
    }

    /// Soft-deactivates a badge kind. Kinds are never hard-deleted.
    pub async fn deactivate(
        &self,
        badge_kind_id: Uuid,
    ) -> Result<Option<BadgeKindEntity>, sqlx::Error> {
        sqlx::query_as::<_, BadgeKindEntity>(
            r#"
            UPDATE badge_kinds
            SET is_active = FALSE, updated_at = NOW()
            WHERE badge_kind_id = $1
            RETURNING *
            "#,
        )
        .bind(badge_kind_id)
        .fetch_optional(&self.pool)
        .await
    }
}
