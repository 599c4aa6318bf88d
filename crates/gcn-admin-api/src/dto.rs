//! Data transfer objects for the admin API.
//!
//! The ACL admin page posts a form-encoded body whose `intent` field
//! selects the operation; every field is optional at the wire level and
//! validated per intent, so a missing field surfaces as a 400 rather
//! than a framework rejection.

use chrono::{DateTime, Utc};
use gcn_model::{AclPermission, AclResourceType, Circular, CircularSubmission, ClientType};
use gcn_storage::{CircularPage, CircularSearchCriteria, DEFAULT_PAGE_LIMIT};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AdminError, AdminResult};

/// Form body posted to the ACL admin action route.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclActionForm {
    /// Operation selector: `migrateFromBroker`, `migrateFromDB`,
    /// `create`, or `delete`.
    pub intent: Option<String>,
    /// Target resource name for `create`.
    pub resource_name: Option<String>,
    /// Client profile for `create`: `producer` or `consumer`.
    pub user_client_type: Option<String>,
    /// Principal group for `create`.
    pub group: Option<String>,
    /// Permission for `create`; defaults to allow.
    pub permission_type: Option<String>,
    /// Resource type for `create`; defaults to topic.
    pub resource_type: Option<String>,
    /// Whether `create` doubles the entry set with prefixed patterns.
    pub include_prefixed: Option<bool>,
    /// Comma-separated mirror ids for `delete`.
    pub acl_ids: Option<String>,
}

/// Validated parameters of an ACL creation.
#[derive(Debug, Clone)]
pub struct CreateAclRequest {
    /// Target resource name.
    pub resource_name: String,
    /// Resource type.
    pub resource_type: AclResourceType,
    /// Client profile whose operation set is granted.
    pub client_type: ClientType,
    /// Principal group.
    pub group: String,
    /// Allow or deny.
    pub permission: AclPermission,
    /// Whether to double the set with prefixed patterns.
    pub include_prefixed: bool,
}

impl TryFrom<&AclActionForm> for CreateAclRequest {
    type Error = AdminError;

    fn try_from(form: &AclActionForm) -> AdminResult<Self> {
        let resource_name = form
            .resource_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AdminError::BadRequest("resourceName is required".to_string()))?
            .to_string();
        let client_type = form
            .user_client_type
            .as_deref()
            .ok_or_else(|| AdminError::BadRequest("userClientType is required".to_string()))?
            .parse::<ClientType>()?;
        let group = form
            .group
            .as_deref()
            .filter(|group| !group.trim().is_empty())
            .ok_or_else(|| AdminError::BadRequest("group is required".to_string()))?
            .to_string();
        let permission = match form.permission_type.as_deref() {
            Some(value) => value.parse::<AclPermission>()?,
            None => AclPermission::Allow,
        };
        let resource_type = match form.resource_type.as_deref() {
            Some(value) => value.parse::<AclResourceType>()?,
            None => AclResourceType::Topic,
        };

        Ok(Self {
            resource_name,
            resource_type,
            client_type,
            group,
            permission,
            include_prefixed: form.include_prefixed.unwrap_or(false),
        })
    }
}

impl AclActionForm {
    /// Parses the comma-separated `aclIds` field for a delete intent.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::BadRequest`] when the field is missing,
    /// empty, or contains a malformed id.
    pub fn delete_ids(&self) -> AdminResult<Vec<Uuid>> {
        let raw = self
            .acl_ids
            .as_deref()
            .filter(|ids| !ids.trim().is_empty())
            .ok_or_else(|| AdminError::BadRequest("aclIds is required".to_string()))?;
        raw.split(',')
            .map(str::trim)
            .map(|id| {
                id.parse::<Uuid>()
                    .map_err(|_| AdminError::BadRequest(format!("malformed acl id: '{id}'")))
            })
            .collect()
    }
}

/// Query parameters for the mirror listing route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AclListParams {
    /// Substring filter on resource name or principal group.
    pub filter: Option<String>,
}

/// Result of a broker-to-mirror import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    /// Number of entries written to the mirror.
    pub imported: usize,
}

/// Result of a mirror-to-broker push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushSummary {
    /// Number of bindings created on the broker.
    pub pushed: usize,
}

/// Result of an ACL deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSummary {
    /// Number of entries removed.
    pub deleted: usize,
}

/// JSON body posted to the circular submission route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularSubmitRequest {
    /// Subject line.
    pub subject: String,
    /// Bulletin body.
    pub body: String,
    /// Optional associated astronomical event.
    pub event_id: Option<String>,
}

impl CircularSubmitRequest {
    /// Attaches the authenticated submitter identity.
    #[must_use]
    pub fn into_submission(self, submitter: impl Into<String>) -> CircularSubmission {
        CircularSubmission {
            subject: self.subject,
            body: self.body,
            submitter: submitter.into(),
            event_id: self.event_id,
        }
    }
}

/// Query parameters for the circular search route.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularSearchParams {
    /// Free-text query.
    pub query: Option<String>,
    /// Named relative date preset; takes precedence over explicit bounds.
    pub fuzzy_time: Option<String>,
    /// Inclusive lower bound, RFC 3339.
    pub start_date: Option<String>,
    /// Inclusive upper bound, RFC 3339.
    pub end_date: Option<String>,
    /// Zero-based page number.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
}

fn parse_bound(raw: Option<&str>) -> Option<DateTime<Utc>> {
    // An invalid or missing date is an open bound, not an error.
    raw.and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|value| value.with_timezone(&Utc))
}

impl CircularSearchParams {
    /// Converts the wire parameters into search criteria, resolving fuzzy
    /// presets against `now`.
    #[must_use]
    pub fn into_criteria(self, now: DateTime<Utc>) -> CircularSearchCriteria {
        let mut criteria = CircularSearchCriteria::new()
            .page(self.page.unwrap_or(0))
            .limit(self.limit.unwrap_or(DEFAULT_PAGE_LIMIT));
        if let Some(query) = self.query.filter(|query| !query.trim().is_empty()) {
            criteria = criteria.query(query);
        }
        criteria = match self.fuzzy_time {
            Some(preset) => criteria.fuzzy_time(&preset, now),
            None => criteria.between(
                parse_bound(self.start_date.as_deref()),
                parse_bound(self.end_date.as_deref()),
            ),
        };
        criteria
    }
}

/// One page of circular search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircularSearchResponse {
    /// Matching circulars, sorted by id descending.
    pub items: Vec<Circular>,
    /// Total matches across all pages.
    pub total_items: u64,
    /// Number of pages needed to cover every match.
    pub total_pages: u64,
    /// Zero-based page number that was requested.
    pub page: u64,
    /// Page size that was requested.
    pub limit: u64,
}

impl From<CircularPage> for CircularSearchResponse {
    fn from(page: CircularPage) -> Self {
        Self {
            total_pages: page.total_pages(),
            items: page.items,
            total_items: page.total_items,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_form() -> AclActionForm {
        AclActionForm {
            intent: Some("create".to_string()),
            resource_name: Some("gcn.notices.test".to_string()),
            user_client_type: Some("producer".to_string()),
            group: Some("gcn.clients".to_string()),
            ..AclActionForm::default()
        }
    }

    #[test]
    fn create_request_defaults() {
        let request = CreateAclRequest::try_from(&create_form()).unwrap();
        assert_eq!(request.resource_type, AclResourceType::Topic);
        assert_eq!(request.permission, AclPermission::Allow);
        assert!(!request.include_prefixed);
    }

    #[test]
    fn create_request_missing_group_is_bad_request() {
        let mut form = create_form();
        form.group = None;
        let err = CreateAclRequest::try_from(&form).unwrap_err();
        assert!(matches!(err, AdminError::BadRequest(_)));
    }

    #[test]
    fn create_request_rejects_unknown_client_type() {
        let mut form = create_form();
        form.user_client_type = Some("admin".to_string());
        let err = CreateAclRequest::try_from(&form).unwrap_err();
        assert!(matches!(err, AdminError::BadRequest(_)));
    }

    #[test]
    fn delete_ids_parse_comma_separated() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let form = AclActionForm {
            acl_ids: Some(format!("{a}, {b}")),
            ..AclActionForm::default()
        };
        assert_eq!(form.delete_ids().unwrap(), vec![a, b]);
    }

    #[test]
    fn delete_ids_reject_garbage() {
        let form = AclActionForm {
            acl_ids: Some("not-a-uuid".to_string()),
            ..AclActionForm::default()
        };
        assert!(matches!(
            form.delete_ids(),
            Err(AdminError::BadRequest(_))
        ));
    }

    #[test]
    fn search_params_fuzzy_takes_precedence() {
        let now = Utc::now();
        let params = CircularSearchParams {
            fuzzy_time: Some("week".to_string()),
            start_date: Some("2020-01-01T00:00:00Z".to_string()),
            ..CircularSearchParams::default()
        };
        let criteria = params.into_criteria(now);
        assert_eq!(criteria.start, Some(now - Duration::days(7)));
        assert_eq!(criteria.end, Some(now));
    }

    #[test]
    fn search_params_invalid_date_is_open_bound() {
        let params = CircularSearchParams {
            start_date: Some("yesterday-ish".to_string()),
            end_date: Some("2024-06-01T00:00:00Z".to_string()),
            ..CircularSearchParams::default()
        };
        let criteria = params.into_criteria(Utc::now());
        assert_eq!(criteria.start, None);
        assert!(criteria.end.is_some());
    }
}
