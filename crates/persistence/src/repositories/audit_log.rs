//! Audit log repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AuditLogEntity;

/// Repository for audit log database operations.
#[derive(Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Creates a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Records an audit entry.
    pub async fn create(
        &self,
        actor_id: Option<Uuid>,
        action: &str,
        student_id: Option<Uuid>,
        details: Option<serde_json::Value>,
    ) -> Result<AuditLogEntity, sqlx::Error> {
        sqlx::query_as::<_, AuditLogEntity>(
            r#"
            INSERT INTO audit_logs (actor_id, action, student_id, details)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(actor_id)
        .bind(action)
        .bind(student_id)
        .bind(details)
        .fetch_one(&self.pool)
        .await
    }
}
