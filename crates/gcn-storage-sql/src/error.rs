//! SQL storage error types.

use gcn_storage::StorageError;
use sqlx::Error as SqlxError;

/// Converts a `SQLx` error to a storage error.
///
/// Unique violations (`23505`) become [`StorageError::Duplicate`] so callers
/// can answer with a conflict; decode failures become
/// [`StorageError::InvalidData`] since they indicate a corrupt stored value.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::RowNotFound => StorageError::Internal("row not found".to_string()),
        SqlxError::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => StorageError::duplicate(
                "row",
                "unique constraint",
                db_err.constraint().unwrap_or("unknown").to_string(),
            ),
            Some("23503") => {
                StorageError::Query(format!("reference violation: {}", db_err.message()))
            }
            _ => StorageError::Query(db_err.to_string()),
        },
        SqlxError::ColumnDecode { .. } | SqlxError::Decode(_) => {
            StorageError::InvalidData(err.to_string())
        }
        SqlxError::PoolTimedOut => StorageError::Connection("connection pool timeout".to_string()),
        SqlxError::PoolClosed => StorageError::Connection("connection pool closed".to_string()),
        _ => StorageError::Internal(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    use sqlx::error::{DatabaseError, ErrorKind};

    #[derive(Debug)]
    struct FakePgError {
        code: &'static str,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakePgError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "database error {}", self.code)
        }
    }

    impl StdError for FakePgError {}

    impl DatabaseError for FakePgError {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn kind(&self) -> ErrorKind {
            match self.code {
                "23505" => ErrorKind::UniqueViolation,
                "23503" => ErrorKind::ForeignKeyViolation,
                _ => ErrorKind::Other,
            }
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed(self.code))
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }
    }

    fn database_error(code: &'static str, constraint: Option<&'static str>) -> SqlxError {
        SqlxError::Database(Box::new(FakePgError { code, constraint }))
    }

    #[test]
    fn unique_violation_maps_to_duplicate() {
        let err = from_sqlx_error(database_error("23505", Some("circulars_pkey")));
        assert!(err.is_duplicate());
        assert!(err.to_string().contains("circulars_pkey"));
    }

    #[test]
    fn other_database_errors_map_to_query() {
        let err = from_sqlx_error(database_error("42P01", None));
        assert!(matches!(err, StorageError::Query(_)));
    }

    #[test]
    fn pool_timeout_maps_to_connection() {
        let err = from_sqlx_error(SqlxError::PoolTimedOut);
        assert!(matches!(err, StorageError::Connection(_)));
    }
}
