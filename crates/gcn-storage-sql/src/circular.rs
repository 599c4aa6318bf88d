//! `PostgreSQL` implementation of the circular provider.

use async_trait::async_trait;
use chrono::Utc;
use gcn_model::{Circular, CircularSubmission};
use gcn_storage::{
    CircularPage, CircularProvider, CircularSearchCriteria, StorageResult,
};
use sqlx::PgPool;

use crate::entities::CircularRow;
use crate::error::from_sqlx_error;

/// Counter name backing circular identifier assignment.
pub const CIRCULAR_COUNTER: &str = "circulars";

/// `PostgreSQL` circular provider.
///
/// Identifier assignment increments the counter row and inserts the
/// circular inside one transaction, so ids are unique and monotonically
/// increasing even under concurrent inserts.
pub struct PgCircularProvider {
    pool: PgPool,
}

impl PgCircularProvider {
    /// Creates a new `PostgreSQL` circular provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CircularProvider for PgCircularProvider {
    async fn put(&self, submission: CircularSubmission) -> StorageResult<Circular> {
        let mut tx = self.pool.begin().await.map_err(from_sqlx_error)?;

        let (circular_id,): (i64,) =
            sqlx::query_as("UPDATE counters SET value = value + 1 WHERE name = $1 RETURNING value")
                .bind(CIRCULAR_COUNTER)
                .fetch_one(&mut *tx)
                .await
                .map_err(from_sqlx_error)?;

        let created_on = Utc::now();
        sqlx::query(
            r"INSERT INTO circulars (circular_id, subject, body, submitter, created_on, event_id)
            VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(circular_id)
        .bind(&submission.subject)
        .bind(&submission.body)
        .bind(&submission.submitter)
        .bind(created_on)
        .bind(&submission.event_id)
        .execute(&mut *tx)
        .await
        .map_err(from_sqlx_error)?;

        tx.commit().await.map_err(from_sqlx_error)?;

        #[allow(clippy::cast_sign_loss)]
        let circular_id = circular_id as u64;
        Ok(Circular {
            circular_id,
            subject: submission.subject,
            body: submission.body,
            submitter: submission.submitter,
            created_on,
            event_id: submission.event_id,
        })
    }

    async fn get(&self, circular_id: u64) -> StorageResult<Option<Circular>> {
        #[allow(clippy::cast_possible_wrap)]
        let row: Option<CircularRow> =
            sqlx::query_as("SELECT * FROM circulars WHERE circular_id = $1")
                .bind(circular_id as i64)
                .fetch_optional(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        Ok(row.map(CircularRow::into_circular))
    }

    async fn search(&self, criteria: &CircularSearchCriteria) -> StorageResult<CircularPage> {
        let pattern = criteria.query.as_ref().map(|q| format!("%{q}%"));
        // LIMIT/OFFSET are i64 on the wire; clamp rather than wrap negative.
        let limit = i64::try_from(criteria.limit).unwrap_or(i64::MAX);
        let offset = i64::try_from(criteria.offset()).unwrap_or(i64::MAX);

        const MATCH: &str = r"($1::text IS NULL
                OR subject ILIKE $1 OR body ILIKE $1 OR submitter ILIKE $1)
            AND ($2::timestamptz IS NULL OR created_on >= $2)
            AND ($3::timestamptz IS NULL OR created_on <= $3)";

        let rows: Vec<CircularRow> = sqlx::query_as(&format!(
            "SELECT * FROM circulars WHERE {MATCH}
            ORDER BY circular_id DESC LIMIT $4 OFFSET $5"
        ))
        .bind(&pattern)
        .bind(criteria.start)
        .bind(criteria.end)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        let (total_items,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM circulars WHERE {MATCH}"))
                .bind(&pattern)
                .bind(criteria.start)
                .bind(criteria.end)
                .fetch_one(&self.pool)
                .await
                .map_err(from_sqlx_error)?;

        #[allow(clippy::cast_sign_loss)]
        let total_items = total_items as u64;
        Ok(CircularPage {
            items: rows.into_iter().map(CircularRow::into_circular).collect(),
            total_items,
            page: criteria.page,
            limit: criteria.limit,
        })
    }
}
