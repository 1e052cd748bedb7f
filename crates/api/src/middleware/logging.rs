//! Tracing subscriber setup.
//!
//! Level and format come from the `[logging]` config section. A `RUST_LOG`
//! value, when present, overrides the configured level entirely.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Filter directives derived from the configured base level.
///
/// sqlx logs every statement at info, which drowns out the request log, so
/// query logging is capped at warn unless RUST_LOG asks for it.
fn default_directives(level: &str) -> String {
    format!("{},sqlx::query=warn,tower_http=info", level)
}

/// Installs the global tracing subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "pretty" {
        registry
            .with(fmt::layer().pretty().with_target(true))
            .init();
    } else {
        // json is the deployment default; unknown formats fall back to it
        registry
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .with_target(true),
            )
            .init();
    }
}
