//! Repository implementations.

mod audit_log;
mod badge_kind;
mod daily_record;
mod notification;
mod student;
mod user;

pub use audit_log::AuditLogRepository;
pub use badge_kind::BadgeKindRepository;
pub use daily_record::DailyRecordRepository;
pub use notification::NotificationRepository;
pub use student::StudentRepository;
pub use user::UserRepository;
