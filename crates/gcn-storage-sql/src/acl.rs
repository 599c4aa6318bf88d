//! `PostgreSQL` implementation of the ACL mirror provider.

use async_trait::async_trait;
use gcn_model::AclEntry;
use gcn_storage::{AclMirrorProvider, StorageError, StorageResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::AclRow;
use crate::error::from_sqlx_error;

/// `PostgreSQL` ACL mirror provider.
pub struct PgAclMirrorProvider {
    pool: PgPool,
}

impl PgAclMirrorProvider {
    /// Creates a new `PostgreSQL` ACL mirror provider.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AclMirrorProvider for PgAclMirrorProvider {
    async fn put(&self, entry: &AclEntry) -> StorageResult<()> {
        sqlx::query(
            r"INSERT INTO acl_entries (
                id, resource_name, resource_type, pattern_type,
                principal, host, operation, permission
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                resource_name = EXCLUDED.resource_name,
                resource_type = EXCLUDED.resource_type,
                pattern_type = EXCLUDED.pattern_type,
                principal = EXCLUDED.principal,
                host = EXCLUDED.host,
                operation = EXCLUDED.operation,
                permission = EXCLUDED.permission",
        )
        .bind(entry.id)
        .bind(&entry.binding.resource_name)
        .bind(entry.binding.resource_type.as_str())
        .bind(entry.binding.pattern_type.as_str())
        .bind(&entry.binding.principal)
        .bind(&entry.binding.host)
        .bind(entry.binding.operation.as_str())
        .bind(entry.binding.permission.as_str())
        .execute(&self.pool)
        .await
        .map_err(from_sqlx_error)?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> StorageResult<Option<AclEntry>> {
        let row: Option<AclRow> = sqlx::query_as("SELECT * FROM acl_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        row.map(AclRow::into_entry).transpose()
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM acl_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::not_found("AclEntry", id));
        }
        Ok(())
    }

    async fn list(&self, filter: Option<&str>) -> StorageResult<Vec<AclEntry>> {
        // LIKE (not ILIKE): the admin filter is case-sensitive containment.
        let rows: Vec<AclRow> = if let Some(needle) = filter {
            let pattern = format!("%{needle}%");
            sqlx::query_as(
                r"SELECT * FROM acl_entries
                WHERE resource_name LIKE $1 OR principal LIKE $1
                ORDER BY resource_name, id",
            )
            .bind(&pattern)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as("SELECT * FROM acl_entries ORDER BY resource_name, id")
                .fetch_all(&self.pool)
                .await
        }
        .map_err(from_sqlx_error)?;

        rows.into_iter().map(AclRow::into_entry).collect()
    }
}
