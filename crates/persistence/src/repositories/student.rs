//! Student repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{StudentEntity, StudentProfileRow};

const PROFILE_SELECT: &str = r#"
    SELECT
        s.student_id,
        s.student_code,
        u.full_name,
        g.name AS group_name,
        s.status,
        s.parent_id,
        p.full_name AS parent_name,
        p.telegram_chat_id AS parent_chat_id
    FROM students s
    JOIN users u ON u.user_id = s.user_id
    LEFT JOIN groups g ON g.group_id = s.group_id
    LEFT JOIN users p ON p.user_id = s.parent_id
"#;

/// Repository for student database operations.
#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    /// Creates a new student repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds a student by its student_id.
    pub async fn find_by_student_id(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(
            r#"
            SELECT * FROM students
            WHERE student_id = $1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Finds an active student by its 3-4 digit code.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<StudentEntity>, sqlx::Error> {
        sqlx::query_as::<_, StudentEntity>(
            r#"
            SELECT * FROM students
            WHERE student_code = $1 AND is_active = TRUE
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
    }

    /// Loads a student's resolved profile (user, group, parent display data).
    pub async fn find_profile(
        &self,
        student_id: Uuid,
    ) -> Result<Option<StudentProfileRow>, sqlx::Error> {
        let query = format!("{} WHERE s.student_id = $1", PROFILE_SELECT);
        sqlx::query_as::<_, StudentProfileRow>(&query)
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Lists profiles of a parent's active students, newest first.
    pub async fn find_profiles_by_parent(
        &self,
        parent_id: Uuid,
    ) -> Result<Vec<StudentProfileRow>, sqlx::Error> {
        let query = format!(
            "{} WHERE s.parent_id = $1 AND s.is_active = TRUE ORDER BY s.created_at DESC",
            PROFILE_SELECT
        );
        sqlx::query_as::<_, StudentProfileRow>(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
    }

    /// Returns student ids of a group's active students.
    pub async fn ids_by_group(&self, group_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT student_id FROM students
            WHERE group_id = $1 AND is_active = TRUE
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Assigns a parent to a student that has none yet.
    ///
    /// First-writer-wins: the guard on `parent_id IS NULL` makes the
    /// assignment atomic; returns false when a parent was already linked.
    pub async fn assign_parent_if_unset(
        &self,
        student_id: Uuid,
        parent_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE students
            SET parent_id = $2, updated_at = NOW()
            WHERE student_id = $1 AND parent_id IS NULL
            "#,
        )
        .bind(student_id)
        .bind(parent_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
