//! User repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a user by its user_id.
    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT * FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }
}
