//! Schema bootstrap.
//!
//! Executed at server start; every statement is idempotent.

use sqlx::PgPool;

use gcn_storage::StorageResult;

use crate::circular::CIRCULAR_COUNTER;
use crate::error::from_sqlx_error;

const STATEMENTS: &[&str] = &[
    r"CREATE TABLE IF NOT EXISTS acl_entries (
        id UUID PRIMARY KEY,
        resource_name TEXT NOT NULL,
        resource_type TEXT NOT NULL,
        pattern_type TEXT NOT NULL,
        principal TEXT NOT NULL,
        host TEXT NOT NULL,
        operation TEXT NOT NULL,
        permission TEXT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS circulars (
        circular_id BIGINT PRIMARY KEY,
        subject TEXT NOT NULL,
        body TEXT NOT NULL,
        submitter TEXT NOT NULL,
        created_on TIMESTAMPTZ NOT NULL,
        event_id TEXT
    )",
    r"CREATE TABLE IF NOT EXISTS counters (
        name TEXT PRIMARY KEY,
        value BIGINT NOT NULL
    )",
    r"CREATE TABLE IF NOT EXISTS sync_log (
        id BIGSERIAL PRIMARY KEY,
        synced_on TIMESTAMPTZ NOT NULL,
        synced_by TEXT NOT NULL
    )",
];

/// Creates the service's tables and seeds the circular counter.
///
/// # Errors
///
/// Returns a storage error if any statement fails.
pub async fn init_schema(pool: &PgPool) -> StorageResult<()> {
    for statement in STATEMENTS {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(from_sqlx_error)?;
    }

    sqlx::query("INSERT INTO counters (name, value) VALUES ($1, 0) ON CONFLICT (name) DO NOTHING")
        .bind(CIRCULAR_COUNTER)
        .execute(pool)
        .await
        .map_err(from_sqlx_error)?;

    Ok(())
}
