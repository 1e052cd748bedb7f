//! User account models.
//!
//! Credential handling lives in the external identity service; this backend
//! only consumes profiles and role facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Teacher,
    Parent,
    Student,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Teacher => "teacher",
            UserRole::Parent => "parent",
            UserRole::Student => "student",
        }
    }

    /// Staff roles are allowed to write daily records.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Teacher)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "teacher" => Ok(UserRole::Teacher),
            "parent" => Ok(UserRole::Parent),
            "student" => Ok(UserRole::Student),
            other => Err(format!("Unknown user role: {}", other)),
        }
    }
}

/// A user profile.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: Option<String>,
    /// Chat identity used by the Telegram transport collaborator.
    pub telegram_chat_id: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Parent,
            UserRole::Student,
        ] {
            let parsed: UserRole = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_staff_roles() {
        assert!(UserRole::Admin.is_staff());
        assert!(UserRole::Teacher.is_staff());
        assert!(!UserRole::Parent.is_staff());
        assert!(!UserRole::Student.is_staff());
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("director".parse::<UserRole>().is_err());
    }
}
