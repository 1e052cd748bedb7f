//! Student models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Enrollment status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Active,
    Inactive,
    Graduated,
    Dropped,
}

impl StudentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudentStatus::Active => "active",
            StudentStatus::Inactive => "inactive",
            StudentStatus::Graduated => "graduated",
            StudentStatus::Dropped => "dropped",
        }
    }
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StudentStatus::Active),
            "inactive" => Ok(StudentStatus::Inactive),
            "graduated" => Ok(StudentStatus::Graduated),
            "dropped" => Ok(StudentStatus::Dropped),
            other => Err(format!("Unknown student status: {}", other)),
        }
    }
}

/// Debt classification relative to the monthly fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    Clear,
    Low,
    Medium,
    High,
}

/// A student.
#[derive(Debug, Clone, Serialize)]
pub struct Student {
    pub id: i64,
    pub student_id: Uuid,
    /// Linked user profile.
    pub user_id: Uuid,
    /// Unique 3-4 digit code used by the bot front-end.
    pub student_code: String,
    pub group_id: Option<Uuid>,
    /// Linked parent; assigned lazily, first-writer-wins.
    pub parent_id: Option<Uuid>,
    pub status: StudentStatus,
    pub monthly_fee: i64,
    pub total_debt: i64,
    pub notes: Option<String>,
    pub is_active: bool,
    pub enrolled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    /// Classifies the current debt against the monthly fee.
    pub fn debt_status(&self) -> DebtStatus {
        if self.total_debt == 0 {
            DebtStatus::Clear
        } else if self.total_debt <= self.monthly_fee {
            DebtStatus::Low
        } else if self.total_debt <= self.monthly_fee * 2 {
            DebtStatus::Medium
        } else {
            DebtStatus::High
        }
    }
}

/// A student with display data resolved from related rows.
///
/// Produced by a read-side join in the persistence layer; the pure services
/// never perform lookups of their own.
#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub student_id: Uuid,
    pub student_code: String,
    pub full_name: String,
    pub group_name: Option<String>,
    pub status: StudentStatus,
    pub parent_id: Option<Uuid>,
    pub parent_name: Option<String>,
    pub parent_chat_id: Option<String>,
}

/// Request body for linking a parent to a student.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClaimParentRequest {
    pub parent_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(monthly_fee: i64, total_debt: i64) -> Student {
        Student {
            id: 1,
            student_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            student_code: "1001".to_string(),
            group_id: None,
            parent_id: None,
            status: StudentStatus::Active,
            monthly_fee,
            total_debt,
            notes: None,
            is_active: true,
            enrolled_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [
            StudentStatus::Active,
            StudentStatus::Inactive,
            StudentStatus::Graduated,
            StudentStatus::Dropped,
        ] {
            let parsed: StudentStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_debt_status_clear() {
        assert_eq!(student(500_000, 0).debt_status(), DebtStatus::Clear);
    }

    #[test]
    fn test_debt_status_low() {
        assert_eq!(student(500_000, 400_000).debt_status(), DebtStatus::Low);
        assert_eq!(student(500_000, 500_000).debt_status(), DebtStatus::Low);
    }

    #[test]
    fn test_debt_status_medium() {
        assert_eq!(student(500_000, 900_000).debt_status(), DebtStatus::Medium);
    }

    #[test]
    fn test_debt_status_high() {
        assert_eq!(
            student(500_000, 1_500_000).debt_status(),
            DebtStatus::High
        );
    }
}
