//! Notification database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::EntityError;
use domain::models::NotificationEvent;

/// Database entity for the notifications table.
#[derive(Debug, Clone, FromRow)]
pub struct NotificationEntity {
    pub id: i64,
    pub notification_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub kind: String,
    pub title: Option<String>,
    pub message: String,
    pub data: Option<serde_json::Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationEntity> for NotificationEvent {
    type Error = EntityError;

    fn try_from(entity: NotificationEntity) -> Result<Self, Self::Error> {
        let kind = entity
            .kind
            .parse()
            .map_err(|_| EntityError::new("kind", &entity.kind))?;

        Ok(Self {
            id: entity.id,
            notification_id: entity.notification_id,
            parent_id: entity.parent_id,
            student_id: entity.student_id,
            kind,
            title: entity.title,
            message: entity.message,
            data: entity.data,
            read: entity.read,
            created_at: entity.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::NotificationKind;

    #[test]
    fn test_conversion() {
        let entity = NotificationEntity {
            id: 1,
            notification_id: Uuid::new_v4(),
            parent_id: Some(Uuid::new_v4()),
            student_id: Some(Uuid::new_v4()),
            kind: "badge_update".to_string(),
            title: Some("Badge update".to_string()),
            message: "Aziz earned 2/3 badges today (67%)".to_string(),
            data: None,
            read: false,
            created_at: Utc::now(),
        };

        let event: NotificationEvent = entity.try_into().unwrap();
        assert_eq!(event.kind, NotificationKind::BadgeUpdate);
        assert!(!event.read);
    }
}
