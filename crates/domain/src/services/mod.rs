//! Pure business services.

pub mod dispatch;
pub mod stats;
pub mod warning;
