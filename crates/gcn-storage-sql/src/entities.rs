//! Database entity types for `SQLx`.
//!
//! These types map directly to database rows and are converted to domain
//! models. ACL dimension enums are stored as their kebab-case wire names.

use chrono::{DateTime, Utc};
use gcn_model::{AclBinding, AclEntry, Circular, SyncRecord};
use gcn_storage::StorageError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for ACL mirror entries.
#[derive(Debug, Clone, FromRow)]
pub struct AclRow {
    pub id: Uuid,
    pub resource_name: String,
    pub resource_type: String,
    pub pattern_type: String,
    pub principal: String,
    pub host: String,
    pub operation: String,
    pub permission: String,
}

impl AclRow {
    /// Converts the row into a domain entry.
    pub fn into_entry(self) -> Result<AclEntry, StorageError> {
        let parse_err = |e: gcn_model::ParseAclFieldError| StorageError::InvalidData(e.to_string());
        Ok(AclEntry {
            id: self.id,
            binding: AclBinding {
                resource_name: self.resource_name,
                resource_type: self.resource_type.parse().map_err(parse_err)?,
                pattern_type: self.pattern_type.parse().map_err(parse_err)?,
                principal: self.principal,
                host: self.host,
                operation: self.operation.parse().map_err(parse_err)?,
                permission: self.permission.parse().map_err(parse_err)?,
            },
        })
    }
}

/// Database row for circulars.
#[derive(Debug, Clone, FromRow)]
pub struct CircularRow {
    pub circular_id: i64,
    pub subject: String,
    pub body: String,
    pub submitter: String,
    pub created_on: DateTime<Utc>,
    pub event_id: Option<String>,
}

impl CircularRow {
    /// Converts the row into a domain circular.
    #[allow(clippy::cast_sign_loss)]
    pub fn into_circular(self) -> Circular {
        Circular {
            circular_id: self.circular_id as u64,
            subject: self.subject,
            body: self.body,
            submitter: self.submitter,
            created_on: self.created_on,
            event_id: self.event_id,
        }
    }
}

/// Database row for sync log records.
#[derive(Debug, Clone, FromRow)]
pub struct SyncRow {
    pub synced_on: DateTime<Utc>,
    pub synced_by: String,
}

impl SyncRow {
    /// Converts the row into a domain record.
    pub fn into_record(self) -> SyncRecord {
        SyncRecord {
            synced_on: self.synced_on,
            synced_by: self.synced_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcn_model::{AclOperation, AclPatternType, AclPermission, AclResourceType};

    #[test]
    fn acl_row_round_trips_enum_strings() {
        let row = AclRow {
            id: Uuid::now_v7(),
            resource_name: "gcn.notices.swift".to_string(),
            resource_type: "topic".to_string(),
            pattern_type: "prefixed".to_string(),
            principal: "User:gcn.clients".to_string(),
            host: "*".to_string(),
            operation: "idempotent-write".to_string(),
            permission: "allow".to_string(),
        };

        let entry = row.into_entry().unwrap();
        assert_eq!(entry.binding.resource_type, AclResourceType::Topic);
        assert_eq!(entry.binding.pattern_type, AclPatternType::Prefixed);
        assert_eq!(entry.binding.operation, AclOperation::IdempotentWrite);
        assert_eq!(entry.binding.permission, AclPermission::Allow);
    }

    #[test]
    fn unknown_enum_string_is_invalid_data() {
        let row = AclRow {
            id: Uuid::now_v7(),
            resource_name: String::new(),
            resource_type: "galaxy".to_string(),
            pattern_type: "literal".to_string(),
            principal: String::new(),
            host: "*".to_string(),
            operation: "read".to_string(),
            permission: "allow".to_string(),
        };

        assert!(matches!(
            row.into_entry(),
            Err(StorageError::InvalidData(_))
        ));
    }
}
