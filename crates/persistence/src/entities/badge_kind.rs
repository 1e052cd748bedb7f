//! Badge kind database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::EntityError;
use domain::models::BadgeKind;

/// Database entity for the badge_kinds table.
#[derive(Debug, Clone, FromRow)]
pub struct BadgeKindEntity {
    pub id: i64,
    pub badge_kind_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
    pub category: String,
    pub priority: i32,
    pub negative_limit: i32,
    pub warning_message: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BadgeKindEntity> for BadgeKind {
    type Error = EntityError;

    fn try_from(entity: BadgeKindEntity) -> Result<Self, Self::Error> {
        let color = entity
            .color
            .parse()
            .map_err(|_| EntityError::new("color", &entity.color))?;
        let category = entity
            .category
            .parse()
            .map_err(|_| EntityError::new("category", &entity.category))?;

        Ok(Self {
            id: entity.id,
            badge_kind_id: entity.badge_kind_id,
            name: entity.name,
            description: entity.description,
            color,
            category,
            priority: entity.priority,
            negative_limit: entity.negative_limit,
            warning_message: entity.warning_message,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
