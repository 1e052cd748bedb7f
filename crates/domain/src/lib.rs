//! Domain layer for the Edu Center backend.
//!
//! This crate contains:
//! - Domain models (BadgeKind, DailyBadgeRecord, Student, NotificationEvent)
//! - Pure business services (aggregation, warning evaluation, dispatch)

pub mod models;
pub mod services;
