//! HTTP route handlers.

pub mod badge_kinds;
pub mod daily_records;
pub mod health;
pub mod notifications;
pub mod reports;
pub mod students;
