//! Domain model definitions.

pub mod badge_kind;
pub mod daily_record;
pub mod notification;
pub mod student;
pub mod user;

pub use badge_kind::{BadgeCategory, BadgeColor, BadgeKind};
pub use daily_record::{BadgeEntryInput, BadgeOutcome, DailyBadgeRecord, ResolvedBadgeEntry};
pub use notification::{NewNotification, NotificationEvent, NotificationKind};
pub use student::{Student, StudentProfile, StudentStatus};
pub use user::{User, UserRole};
