//! Audit log database entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database entity for the audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct AuditLogEntity {
    pub id: i64,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub student_id: Option<Uuid>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
