//! Application services orchestrating repositories and domain logic.

pub mod daily_badge;

pub use daily_badge::{DailyBadgeService, UpsertOutcome};
