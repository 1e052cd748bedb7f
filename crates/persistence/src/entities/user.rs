//! User database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::EntityError;
use domain::models::User;

/// Database entity for the users table.
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserEntity> for User {
    type Error = EntityError;

    fn try_from(entity: UserEntity) -> Result<Self, Self::Error> {
        let role = entity
            .role
            .parse()
            .map_err(|_| EntityError::new("role", &entity.role))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            full_name: entity.full_name,
            phone: entity.phone,
            telegram_chat_id: entity.telegram_chat_id,
            role,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
