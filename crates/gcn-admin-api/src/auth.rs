//! Authentication and authorization for the admin API.
//!
//! Bearer tokens are resolved to a user identity plus group memberships
//! through the [`GroupResolver`] seam; the identity provider behind it is
//! deployment-specific. Group checks gate the Kafka admin routes and
//! circular submission.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};

use crate::error::{AdminError, AdminResult};

/// Authenticated user context: identity plus group memberships.
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Identity of the caller (email or subject claim).
    pub user: String,
    /// Groups the caller belongs to.
    pub groups: Vec<String>,
}

impl UserContext {
    /// Creates a context for the given user and groups.
    #[must_use]
    pub fn new(user: impl Into<String>, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            user: user.into(),
            groups: groups.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the caller belongs to the given group.
    #[must_use]
    pub fn is_member(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }

    /// Ensures the caller belongs to the given group.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Forbidden`] otherwise. The check runs before
    /// any store or broker side effect.
    pub fn require_group(&self, group: &str) -> AdminResult<()> {
        if self.is_member(group) {
            Ok(())
        } else {
            Err(AdminError::Forbidden)
        }
    }
}

/// Resolves a bearer token to a user context.
#[async_trait]
pub trait GroupResolver: Send + Sync {
    /// Resolves the token.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] for an unknown or expired
    /// token.
    async fn resolve(&self, token: &str) -> AdminResult<UserContext>;
}

/// Static token-to-context resolver for tests and sandbox deployments.
///
/// Production deployments plug a real identity provider in behind
/// [`GroupResolver`].
#[derive(Debug, Clone, Default)]
pub struct StaticGroupResolver {
    tokens: HashMap<String, UserContext>,
}

impl StaticGroupResolver {
    /// Creates an empty resolver that rejects every token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for the given user context.
    pub fn add_token(&mut self, token: impl Into<String>, context: UserContext) {
        self.tokens.insert(token.into(), context);
    }
}

#[async_trait]
impl GroupResolver for StaticGroupResolver {
    async fn resolve(&self, token: &str) -> AdminResult<UserContext> {
        self.tokens
            .get(token)
            .cloned()
            .ok_or(AdminError::Unauthorized)
    }
}

/// Extracts the bearer token from the Authorization header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authenticates a request against the given resolver.
///
/// # Errors
///
/// Returns [`AdminError::Unauthorized`] when the Authorization header is
/// missing, malformed, or names an unknown token.
pub async fn authenticate<G: GroupResolver + ?Sized>(
    resolver: &Arc<G>,
    headers: &HeaderMap,
) -> AdminResult<UserContext> {
    let token = bearer_token(headers).ok_or(AdminError::Unauthorized)?;
    resolver.resolve(token).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn resolver() -> Arc<StaticGroupResolver> {
        let mut resolver = StaticGroupResolver::new();
        resolver.add_token(
            "ops-token",
            UserContext::new("ops@example.gov", ["gcn.nasa.gov/kafka-admin"]),
        );
        Arc::new(resolver)
    }

    #[test]
    fn group_membership_checks() {
        let context = UserContext::new("a@example.gov", ["one", "two"]);
        assert!(context.is_member("two"));
        assert!(!context.is_member("three"));
        assert!(context.require_group("one").is_ok());
        assert!(matches!(
            context.require_group("three"),
            Err(AdminError::Forbidden)
        ));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn known_token_resolves() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer ops-token"));

        let context = authenticate(&resolver(), &headers).await.unwrap();
        assert_eq!(context.user, "ops@example.gov");
        assert!(context.is_member("gcn.nasa.gov/kafka-admin"));
    }

    #[tokio::test]
    async fn unknown_token_is_unauthorized() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer other"));

        let err = authenticate(&resolver(), &headers).await.unwrap_err();
        assert!(matches!(err, AdminError::Unauthorized));
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let err = authenticate(&resolver(), &HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Unauthorized));
    }
}
