use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, require_admin, require_auth, require_staff, trace_id,
};
use crate::routes::{badge_kinds, daily_records, health, notifications, reports, students};
use crate::services::DailyBadgeService;
use domain::services::dispatch::{MockTransport, NotificationTransport};
use shared::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: JwtConfig,
    pub badges: DailyBadgeService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    // The real Telegram transport is an external collaborator; the backend
    // ships with the logging transport.
    create_app_with_transport(config, pool, Arc::new(MockTransport::new()))
}

pub fn create_app_with_transport(
    config: Config,
    pool: PgPool,
    transport: Arc<dyn NotificationTransport>,
) -> Router {
    let config = Arc::new(config);

    let jwt = JwtConfig::with_leeway(
        &config.jwt.secret,
        config.jwt.access_token_expiry_secs,
        config.jwt.leeway_secs,
    );

    let state = AppState {
        pool: pool.clone(),
        config: config.clone(),
        jwt,
        badges: DailyBadgeService::new(pool, transport),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Staff routes (admin or teacher): daily record writes and read surfaces
    let staff_routes = Router::new()
        .route(
            "/api/v1/daily-records",
            post(daily_records::upsert_daily_record).get(daily_records::list_daily_records),
        )
        .route(
            "/api/v1/daily-records/bulk",
            post(daily_records::upsert_daily_records_bulk),
        )
        .route("/api/v1/badge-kinds", get(badge_kinds::list_badge_kinds))
        .route(
            "/api/v1/badge-kinds/:badge_kind_id",
            get(badge_kinds::get_badge_kind),
        )
        .route(
            "/api/v1/students/code/:student_code",
            get(students::get_student_by_code),
        )
        .route(
            "/api/v1/students/:student_id/badge-report",
            get(reports::student_badge_report),
        )
        .route(
            "/api/v1/students/:student_id/badges/:badge_kind_id/warning",
            get(reports::badge_warning_status),
        )
        .route_layer(middleware::from_fn(require_staff))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Admin routes: badge catalog management and parent linking
    let admin_routes = Router::new()
        .route("/api/v1/badge-kinds", post(badge_kinds::create_badge_kind))
        .route(
            "/api/v1/badge-kinds/:badge_kind_id",
            patch(badge_kinds::update_badge_kind)
                .delete(badge_kinds::deactivate_badge_kind),
        )
        .route(
            "/api/v1/students/:student_id/claim-parent",
            post(students::claim_parent),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Authenticated routes open to any role (parents use these)
    let user_routes = Router::new()
        .route("/api/v1/parents/me/students", get(students::my_students))
        .route(
            "/api/v1/notifications",
            get(notifications::list_my_notifications),
        )
        .route(
            "/api/v1/notifications/:notification_id/read",
            post(notifications::mark_notification_read),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(staff_routes)
        .merge(admin_routes)
        .merge(user_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware)) // Prometheus metrics
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
