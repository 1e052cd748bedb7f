//! Student database entities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::EntityError;
use domain::models::{Student, StudentProfile};

/// Database entity for the students table.
#[derive(Debug, Clone, FromRow)]
pub struct StudentEntity {
    pub id: i64,
    pub student_id: Uuid,
    pub user_id: Uuid,
    pub student_code: String,
    pub group_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
    pub status: String,
    pub monthly_fee: i64,
    pub total_debt: i64,
    pub notes: Option<String>,
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<StudentEntity> for Student {
    type Error = EntityError;

    fn try_from(entity: StudentEntity) -> Result<Self, Self::Error> {
        let status = entity
            .status
            .parse()
            .map_err(|_| EntityError::new("status", &entity.status))?;

        Ok(Self {
            id: entity.id,
            student_id: entity.student_id,
            user_id: entity.user_id,
            student_code: entity.student_code,
            group_id: entity.group_id,
            parent_id: entity.parent_id,
            status,
            monthly_fee: entity.monthly_fee,
            total_debt: entity.total_debt,
            notes: entity.notes,
            is_active: entity.is_active,
            enrolled_at: entity.enrolled_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Read-side join row resolving a student's display data.
#[derive(Debug, Clone, FromRow)]
pub struct StudentProfileRow {
    pub student_id: Uuid,
    pub student_code: String,
    pub full_name: String,
    pub group_name: Option<String>,
    pub status: String,
    pub parent_id: Option<Uuid>,
    pub parent_name: Option<String>,
    pub parent_chat_id: Option<String>,
}

impl TryFrom<StudentProfileRow> for StudentProfile {
    type Error = EntityError;

    fn try_from(row: StudentProfileRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|_| EntityError::new("status", &row.status))?;

        Ok(Self {
            student_id: row.student_id,
            student_code: row.student_code,
            full_name: row.full_name,
            group_name: row.group_name,
            status,
            parent_id: row.parent_id,
            parent_name: row.parent_name,
            parent_chat_id: row.parent_chat_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::StudentStatus;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_profile_conversion() {
        let row = StudentProfileRow {
            student_id: Uuid::new_v4(),
            student_code: "1001".to_string(),
            full_name: Name().fake(),
            group_name: Some("Group A".to_string()),
            status: "active".to_string(),
            parent_id: None,
            parent_name: None,
            parent_chat_id: None,
        };

        let profile: StudentProfile = row.try_into().unwrap();
        assert_eq!(profile.status, StudentStatus::Active);
        assert!(profile.parent_id.is_none());
    }

    #[test]
    fn test_invalid_status_rejected() {
        let row = StudentProfileRow {
            student_id: Uuid::new_v4(),
            student_code: "1001".to_string(),
            full_name: "Aziz Karimov".to_string(),
            group_name: None,
            status: "expelled".to_string(),
            parent_id: None,
            parent_name: None,
            parent_chat_id: None,
        };

        assert!(StudentProfile::try_from(row).is_err());
    }
}
