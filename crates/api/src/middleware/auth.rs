//! JWT authentication middleware.
//!
//! Validates Bearer tokens issued by the identity service and attaches the
//! caller's identity to request extensions. Role gates build on top of it.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::str::FromStr;
use uuid::Uuid;

use crate::app::AppState;
use domain::models::UserRole;
use shared::jwt::JwtConfig;

/// Authenticated caller information extracted from a validated JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// Role claim issued by the identity service.
    pub role: UserRole,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl AuthUser {
    /// Validates an access token and returns caller identity.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        let role = UserRole::from_str(&claims.role)
            .map_err(|_| format!("Unknown role in token: {}", claims.role))?;

        Ok(AuthUser {
            user_id,
            role,
            jti: claims.jti,
        })
    }
}

/// Middleware that requires a valid JWT on the request.
///
/// Validates the Bearer token in the Authorization header and rejects
/// requests without one. Caller identity is stored in request extensions
/// for downstream handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    match AuthUser::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("JWT validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

/// Middleware that requires a staff caller (admin or teacher).
///
/// Must run after `require_auth` so the `AuthUser` extension is present.
pub async fn require_staff(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthUser>() {
        Some(auth) if auth.role.is_staff() => next.run(req).await,
        Some(_) => forbidden_response("Staff role required"),
        None => unauthorized_response("Authentication required"),
    }
}

/// Middleware that requires an admin caller.
///
/// Must run after `require_auth` so the `AuthUser` extension is present.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    match req.extensions().get::<AuthUser>() {
        Some(auth) if auth.role == UserRole::Admin => next.run(req).await,
        Some(_) => forbidden_response("Admin role required"),
        None => unauthorized_response("Authentication required"),
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt() -> JwtConfig {
        JwtConfig::new("test-secret-do-not-use-in-production", 3600)
    }

    #[test]
    fn test_validate_accepts_valid_token() {
        let jwt = test_jwt();
        let user_id = Uuid::new_v4();
        let token = jwt.issue_access_token(user_id, "teacher").unwrap();

        let auth = AuthUser::validate(&jwt, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.role, UserRole::Teacher);
        assert!(!auth.jti.is_empty());
    }

    #[test]
    fn test_validate_rejects_unknown_role() {
        let jwt = test_jwt();
        let token = jwt
            .issue_access_token(Uuid::new_v4(), "superuser")
            .unwrap();

        let err = AuthUser::validate(&jwt, &token).unwrap_err();
        assert!(err.contains("Unknown role"));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let jwt = test_jwt();
        assert!(AuthUser::validate(&jwt, "not.a.token").is_err());
    }
}
