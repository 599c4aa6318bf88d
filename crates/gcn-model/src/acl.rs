//! Access control domain model.
//!
//! An ACL rule grants or denies a principal an operation on a broker
//! resource pattern. The broker has no identifier concept and addresses
//! rules by their full [`AclBinding`] tuple; the mirror store assigns each
//! rule a synthetic [`AclEntry::id`] used for deletion through the UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Host field used by every ACL this system creates.
pub const WILDCARD_HOST: &str = "*";

/// Error returned when parsing an ACL dimension from its string form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {field}: '{value}'")]
pub struct ParseAclFieldError {
    /// Which dimension failed to parse.
    pub field: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseAclFieldError {
    fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }
}

macro_rules! acl_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, $display:literal ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Returns the kebab-case wire name.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )+
                }
            }

            /// Returns the human-readable name shown in the admin UI.
            #[must_use]
            pub const fn display_name(&self) -> &'static str {
                match self {
                    $( Self::$variant => $display, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseAclFieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(ParseAclFieldError::new($field, s)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

acl_enum! {
    /// Type of broker resource an ACL applies to.
    AclResourceType, "resource type" {
        /// Value this client cannot understand.
        Unknown => "unknown", "Unknown";
        /// In a filter, matches any resource type.
        Any => "any", "Any";
        /// A topic.
        Topic => "topic", "Topic";
        /// A consumer group.
        Group => "group", "Group";
        /// The cluster as a whole.
        Cluster => "cluster", "Cluster";
        /// A transactional id.
        TransactionalId => "transactional-id", "Transactional Id";
        /// A delegation token.
        DelegationToken => "delegation-token", "Delegation Token";
    }
}

acl_enum! {
    /// How a resource name is matched against a binding.
    AclPatternType, "pattern type" {
        /// Value this client cannot understand.
        Unknown => "unknown", "Unknown";
        /// In a filter, matches any pattern type.
        Any => "any", "Any";
        /// In a filter, matches literal bindings and prefixes of the name.
        Match => "match", "Match";
        /// The resource name is matched exactly.
        Literal => "literal", "Literal";
        /// The resource name is matched as a prefix.
        Prefixed => "prefixed", "Prefixed";
    }
}

acl_enum! {
    /// Operation an ACL grants or denies permission to perform.
    AclOperation, "operation" {
        /// Value this client cannot understand.
        Unknown => "unknown", "Unknown";
        /// In a filter, matches any operation.
        Any => "any", "Any";
        /// All operations.
        All => "all", "All";
        /// Read a resource.
        Read => "read", "Read";
        /// Write to a resource.
        Write => "write", "Write";
        /// Create a resource.
        Create => "create", "Create";
        /// Delete a resource.
        Delete => "delete", "Delete";
        /// Alter a resource.
        Alter => "alter", "Alter";
        /// Describe a resource.
        Describe => "describe", "Describe";
        /// Cluster administrative action.
        ClusterAction => "cluster-action", "Cluster Action";
        /// Describe resource configuration.
        DescribeConfigs => "describe-configs", "Describe Configs";
        /// Alter resource configuration.
        AlterConfigs => "alter-configs", "Alter Configs";
        /// Idempotent write.
        IdempotentWrite => "idempotent-write", "Idempotent Write";
    }
}

acl_enum! {
    /// Whether a binding grants or denies access.
    AclPermission, "permission type" {
        /// Value this client cannot understand.
        Unknown => "unknown", "Unknown";
        /// In a filter, matches any permission type.
        Any => "any", "Any";
        /// Grants access.
        Allow => "allow", "Allow";
        /// Denies access.
        Deny => "deny", "Deny";
    }
}

/// Broker-side identity of an ACL rule.
///
/// The broker identifies rules by this full tuple; two bindings are the
/// same rule iff every field matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclBinding {
    /// Target resource (topic or group name).
    pub resource_name: String,
    /// What kind of resource the name addresses.
    pub resource_type: AclResourceType,
    /// Exact vs. prefix matching of the resource name.
    pub pattern_type: AclPatternType,
    /// Principal the rule applies to, of the form `User:<group>`.
    pub principal: String,
    /// Source host; always `*` in this system.
    pub host: String,
    /// Operation granted or denied.
    pub operation: AclOperation,
    /// Allow or deny.
    pub permission: AclPermission,
}

impl AclBinding {
    /// Creates a binding for the given group with wildcard host.
    #[must_use]
    pub fn new(
        resource_name: impl Into<String>,
        resource_type: AclResourceType,
        pattern_type: AclPatternType,
        group: &str,
        operation: AclOperation,
        permission: AclPermission,
    ) -> Self {
        Self {
            resource_name: resource_name.into(),
            resource_type,
            pattern_type,
            principal: format!("User:{group}"),
            host: WILDCARD_HOST.to_string(),
            operation,
            permission,
        }
    }

    /// Returns the group identifier embedded in the principal, if the
    /// principal carries the `User:` prefix.
    #[must_use]
    pub fn principal_group(&self) -> Option<&str> {
        self.principal.strip_prefix("User:")
    }

    /// Whether the binding targets a topic-typed resource.
    #[must_use]
    pub const fn is_topic(&self) -> bool {
        matches!(self.resource_type, AclResourceType::Topic)
    }
}

/// A mirror-store row: the broker tuple plus the mirror-assigned id.
///
/// The id exists only in the mirror; deletion through the admin UI
/// addresses the mirror by id and the broker by the binding tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    /// Mirror-assigned unique identifier.
    pub id: Uuid,
    /// The broker-side rule.
    #[serde(flatten)]
    pub binding: AclBinding,
}

impl AclEntry {
    /// Wraps a broker binding with a freshly assigned mirror id.
    #[must_use]
    pub fn from_binding(binding: AclBinding) -> Self {
        Self {
            id: Uuid::now_v7(),
            binding,
        }
    }
}

/// Kafka client profile selected on the admin create form.
///
/// Each profile maps to the fixed operation set the client needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    /// Producers need create, write, and describe.
    Producer,
    /// Consumers need read and describe.
    Consumer,
}

impl ClientType {
    /// Returns the operation set this client type requires.
    #[must_use]
    pub const fn operations(&self) -> &'static [AclOperation] {
        match self {
            Self::Producer => &[
                AclOperation::Create,
                AclOperation::Write,
                AclOperation::Describe,
            ],
            Self::Consumer => &[AclOperation::Read, AclOperation::Describe],
        }
    }

    /// Returns the form value for this client type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Producer => "producer",
            Self::Consumer => "consumer",
        }
    }
}

impl FromStr for ClientType {
    type Err = ParseAclFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "producer" => Ok(Self::Producer),
            "consumer" => Ok(Self::Consumer),
            _ => Err(ParseAclFieldError::new("client type", s)),
        }
    }
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
