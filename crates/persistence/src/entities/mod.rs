//! Database entity definitions (row mappings).

mod audit_log;
mod badge_kind;
mod daily_record;
mod notification;
mod student;
mod user;

pub use audit_log::AuditLogEntity;
pub use badge_kind::BadgeKindEntity;
pub use daily_record::{DailyRecordEntity, ResolvedEntryRow};
pub use notification::NotificationEntity;
pub use student::{StudentEntity, StudentProfileRow};
pub use user::UserEntity;

use thiserror::Error;

/// Error mapping a stored value into its domain representation.
///
/// Stored enum columns carry CHECK constraints, so this only fires on schema
/// drift.
#[derive(Debug, Error)]
#[error("Invalid stored value for {column}: {value}")]
pub struct EntityError {
    pub column: &'static str,
    pub value: String,
}

impl EntityError {
    pub fn new(column: &'static str, value: impl Into<String>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}
