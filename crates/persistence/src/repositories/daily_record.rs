//! Daily badge record repository implementation.
//!
//! Owns the upsert-by-(student, day) contract: at most one record per pair,
//! and a second write replaces the entries list wholesale. The replacement
//! runs inside one transaction so no reader observes a half-written list.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{DailyRecordEntity, ResolvedEntryRow};
use crate::metrics::QueryTimer;
use domain::models::daily_record::BadgeEntryInput;

/// Repository for daily badge record database operations.
#[derive(Clone)]
pub struct DailyRecordRepository {
    pool: PgPool,
}

impl DailyRecordRepository {
    /// Creates a new daily record repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Upserts the record for (student, day), replacing entries wholesale.
    ///
    /// Returns the resulting record row and whether it was newly created.
    /// The row lock on the existing record serializes concurrent writers for
    /// the same key; the last committed writer wins.
    pub async fn upsert(
        &self,
        student_id: Uuid,
        day: NaiveDate,
        entries: &[BadgeEntryInput],
        notes: Option<&str>,
        created_by: Uuid,
    ) -> Result<(DailyRecordEntity, bool), sqlx::Error> {
        let timer = QueryTimer::new("daily_record_upsert");
        let mut tx = self.pool.begin().await?;

        let existing: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT record_id FROM daily_badge_records
            WHERE student_id = $1 AND day = $2
            FOR UPDATE
            "#,
        )
        .bind(student_id)
        .bind(day)
        .fetch_optional(&mut *tx)
        .await?;

        let (record, created) = match existing {
            Some((record_id,)) => {
                let record = sqlx::query_as::<_, DailyRecordEntity>(
                    r#"
                    UPDATE daily_badge_records
                    SET notes = $2, created_by = $3, updated_at = NOW()
                    WHERE record_id = $1
                    RETURNING *
                    "#,
                )
                .bind(record_id)
                .bind(notes)
                .bind(created_by)
                .fetch_one(&mut *tx)
                .await?;

                sqlx::query("DELETE FROM daily_badge_entries WHERE record_id = $1")
                    .bind(record_id)
                    .execute(&mut *tx)
                    .await?;

                (record, false)
            }
            None => {
                let record = sqlx::query_as::<_, DailyRecordEntity>(
                    r#"
                    INSERT INTO daily_badge_records (student_id, day, notes, created_by)
                    VALUES ($1, $2, $3, $4)
                    RETURNING *
                    "#,
                )
                .bind(student_id)
                .bind(day)
                .bind(notes)
                .bind(created_by)
                .fetch_one(&mut *tx)
                .await?;

                (record, true)
            }
        };

        for (position, entry) in entries.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO daily_badge_entries (record_id, position, badge_kind_id, outcome)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(record.record_id)
            .bind(position as i32)
            .bind(entry.badge_kind_id)
            .bind(entry.outcome.as_str())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        timer.record();

        Ok((record, created))
    }

    /// Finds a student's records, most recent day first.
    pub async fn find_recent_by_student(
        &self,
        student_id: Uuid,
        since_day: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<DailyRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, DailyRecordEntity>(
            r#"
            SELECT * FROM daily_badge_records
            WHERE student_id = $1
              AND ($2::date IS NULL OR day >= $2)
            ORDER BY day DESC
            LIMIT $3
            "#,
        )
        .bind(student_id)
        .bind(since_day)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
    }

    /// Lists records with optional student-set and day filters.
    pub async fn list(
        &self,
        student_ids: Option<&[Uuid]>,
        day: Option<NaiveDate>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DailyRecordEntity>, sqlx::Error> {
        sqlx::query_as::<_, DailyRecordEntity>(
            r#"
            SELECT * FROM daily_badge_records
            WHERE ($1::uuid[] IS NULL OR student_id = ANY($1))
              AND ($2::date IS NULL OR day = $2)
            ORDER BY day DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(student_ids)
        .bind(day)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts records matching the list filters.
    pub async fn count(
        &self,
        student_ids: Option<&[Uuid]>,
        day: Option<NaiveDate>,
    ) -> Result<i64, sqlx::Error> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM daily_badge_records
            WHERE ($1::uuid[] IS NULL OR student_id = ANY($1))
              AND ($2::date IS NULL OR day = $2)
            "#,
        )
        .bind(student_ids)
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(result.0)
    }

    /// Loads resolved entries for a set of records, ordered by position.
    pub async fn entries_for_records(
        &self,
        record_ids: &[Uuid],
    ) -> Result<Vec<ResolvedEntryRow>, sqlx::Error> {
        if record_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ResolvedEntryRow>(
            r#"
            SELECT
                e.record_id,
                e.position,
                e.badge_kind_id,
                e.outcome,
                k.name AS badge_name,
                k.color AS badge_color
            FROM daily_badge_entries e
            JOIN badge_kinds k ON k.badge_kind_id = e.badge_kind_id
            WHERE e.record_id = ANY($1)
            ORDER BY e.record_id, e.position
            "#,
        )
        .bind(record_ids)
        .fetch_all(&self.pool)
        .await
    }

    /// Counts historical not_earned entries for (student, badge kind).
    ///
    /// Absences are excluded; only not_earned counts toward the warning limit.
    pub async fn count_not_earned(
        &self,
        student_id: Uuid,
        badge_kind_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("daily_record_count_not_earned");
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM daily_badge_entries e
            JOIN daily_badge_records r ON r.record_id = e.record_id
            WHERE r.student_id = $1
              AND e.badge_kind_id = $2
              AND e.outcome = 'not_earned'
            "#,
        )
        .bind(student_id)
        .bind(badge_kind_id)
        .fetch_one(&self.pool)
        .await?;
        timer.record();
        Ok(result.0)
    }
}
