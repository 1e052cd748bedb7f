//! Badge catalog models.
//!
//! A badge kind is the catalog definition of a per-day marker: display data,
//! category, priority and the negative-outcome limit that drives warnings.
//! Kinds are soft-deactivated, never deleted, so historical records always
//! resolve.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Badge display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Green,
    Blue,
    Yellow,
    Purple,
    Orange,
    Red,
}

impl BadgeColor {
    /// Emoji used in parent-facing messages.
    pub fn emoji(&self) -> &'static str {
        match self {
            BadgeColor::Green => "\u{1F7E2}",
            BadgeColor::Blue => "\u{1F535}",
            BadgeColor::Yellow => "\u{1F7E1}",
            BadgeColor::Purple => "\u{1F7E3}",
            BadgeColor::Orange => "\u{1F7E0}",
            BadgeColor::Red => "\u{1F534}",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeColor::Green => "green",
            BadgeColor::Blue => "blue",
            BadgeColor::Yellow => "yellow",
            BadgeColor::Purple => "purple",
            BadgeColor::Orange => "orange",
            BadgeColor::Red => "red",
        }
    }
}

impl std::fmt::Display for BadgeColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BadgeColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(BadgeColor::Green),
            "blue" => Ok(BadgeColor::Blue),
            "yellow" => Ok(BadgeColor::Yellow),
            "purple" => Ok(BadgeColor::Purple),
            "orange" => Ok(BadgeColor::Orange),
            "red" => Ok(BadgeColor::Red),
            other => Err(format!("Unknown badge color: {}", other)),
        }
    }
}

/// Badge category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Academic,
    Behavior,
    Attendance,
    Participation,
    Homework,
}

impl BadgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCategory::Academic => "academic",
            BadgeCategory::Behavior => "behavior",
            BadgeCategory::Attendance => "attendance",
            BadgeCategory::Participation => "participation",
            BadgeCategory::Homework => "homework",
        }
    }
}

impl std::fmt::Display for BadgeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BadgeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "academic" => Ok(BadgeCategory::Academic),
            "behavior" => Ok(BadgeCategory::Behavior),
            "attendance" => Ok(BadgeCategory::Attendance),
            "participation" => Ok(BadgeCategory::Participation),
            "homework" => Ok(BadgeCategory::Homework),
            other => Err(format!("Unknown badge category: {}", other)),
        }
    }
}

/// A badge kind from the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeKind {
    pub id: i64,
    pub badge_kind_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: BadgeColor,
    pub category: BadgeCategory,
    pub priority: i32,
    /// Number of not_earned outcomes that triggers a warning.
    pub negative_limit: i32,
    pub warning_message: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default warning text when a kind is created without one.
pub fn default_warning_message(name: &str, negative_limit: i32) -> String {
    format!(
        "{} was not earned {} times - please talk with your child",
        name, negative_limit
    )
}

/// Request body for creating a badge kind.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBadgeKindRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: String,

    #[serde(default = "default_color")]
    pub color: BadgeColor,

    #[serde(default = "default_category")]
    pub category: BadgeCategory,

    #[serde(default = "default_priority")]
    #[validate(custom(function = "validate_priority_value"))]
    pub priority: i32,

    #[serde(default = "default_negative_limit")]
    #[validate(custom(function = "validate_negative_limit_value"))]
    pub negative_limit: i32,

    /// Warning text shown to parents when the limit is reached.
    /// Generated from name and limit when omitted.
    pub warning_message: Option<String>,
}

fn default_color() -> BadgeColor {
    BadgeColor::Green
}

fn default_category() -> BadgeCategory {
    BadgeCategory::Academic
}

fn default_priority() -> i32 {
    1
}

fn default_negative_limit() -> i32 {
    2
}

/// Request body for partially updating a badge kind.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateBadgeKindRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Description must be 1-200 characters"))]
    pub description: Option<String>,

    pub color: Option<BadgeColor>,
    pub category: Option<BadgeCategory>,

    #[validate(custom(function = "validate_priority_value"))]
    pub priority: Option<i32>,

    #[validate(custom(function = "validate_negative_limit_value"))]
    pub negative_limit: Option<i32>,

    pub warning_message: Option<String>,
    pub is_active: Option<bool>,
}

fn validate_priority_value(priority: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_priority(&priority)
}

fn validate_negative_limit_value(limit: i32) -> Result<(), validator::ValidationError> {
    shared::validation::validate_negative_limit(&limit)
}

/// API response shape for a badge kind.
#[derive(Debug, Clone, Serialize)]
pub struct BadgeKindResponse {
    pub badge_kind_id: Uuid,
    pub name: String,
    pub description: String,
    pub color: BadgeColor,
    pub emoji: &'static str,
    pub category: BadgeCategory,
    pub priority: i32,
    pub negative_limit: i32,
    pub warning_message: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<BadgeKind> for BadgeKindResponse {
    fn from(kind: BadgeKind) -> Self {
        Self {
            badge_kind_id: kind.badge_kind_id,
            name: kind.name,
            description: kind.description,
            color: kind.color,
            emoji: kind.color.emoji(),
            category: kind.category,
            priority: kind.priority,
            negative_limit: kind.negative_limit,
            warning_message: kind.warning_message,
            is_active: kind.is_active,
            created_at: kind.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_roundtrip() {
        for color in [
            BadgeColor::Green,
            BadgeColor::Blue,
            BadgeColor::Yellow,
            BadgeColor::Purple,
            BadgeColor::Orange,
            BadgeColor::Red,
        ] {
            let parsed: BadgeColor = color.as_str().parse().unwrap();
            assert_eq!(parsed, color);
        }
    }

    #[test]
    fn test_unknown_color_rejected() {
        assert!("gray".parse::<BadgeColor>().is_err());
    }

    #[test]
    fn test_category_roundtrip() {
        for category in [
            BadgeCategory::Academic,
            BadgeCategory::Behavior,
            BadgeCategory::Attendance,
            BadgeCategory::Participation,
            BadgeCategory::Homework,
        ] {
            let parsed: BadgeCategory = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_color_serde_lowercase() {
        let json = serde_json::to_string(&BadgeColor::Red).unwrap();
        assert_eq!(json, "\"red\"");
        let parsed: BadgeColor = serde_json::from_str("\"purple\"").unwrap();
        assert_eq!(parsed, BadgeColor::Purple);
    }

    #[test]
    fn test_default_warning_message() {
        let msg = default_warning_message("Homework", 2);
        assert!(msg.contains("Homework"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_create_request_defaults() {
        let json = r#"{"name": "Homework", "description": "Completed homework"}"#;
        let request: CreateBadgeKindRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.color, BadgeColor::Green);
        assert_eq!(request.category, BadgeCategory::Academic);
        assert_eq!(request.priority, 1);
        assert_eq!(request.negative_limit, 2);
        assert!(request.warning_message.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_request_rejects_bad_limit() {
        let json = r#"{"name": "Homework", "description": "d", "negative_limit": 0}"#;
        let request: CreateBadgeKindRequest = serde_json::from_str(json).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_request_partial() {
        let json = r#"{"priority": 5}"#;
        let request: UpdateBadgeKindRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.priority, Some(5));
        assert!(request.name.is_none());
        assert!(request.validate().is_ok());
    }
}
