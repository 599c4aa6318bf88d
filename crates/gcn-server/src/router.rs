//! Router configuration.
//!
//! Combines the admin API, circulars, and health endpoints into the
//! application router.

use axum::{http::HeaderValue, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use gcn_admin_api::{api_router, AdminState, GroupResolver};
use gcn_broker::BrokerAdmin;
use gcn_storage::{AclMirrorProvider, CircularProvider, SyncLogProvider};

/// Creates the main application router.
pub fn create_router<M, L, C, B, G>(
    state: AdminState<M, L, C, B, G>,
    cors_origins: &[String],
) -> Router
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let api = api_router().with_state(state);

    let health = Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness_check))
        .route("/health/ready", get(readiness_check));

    Router::new()
        .merge(api)
        .merge(health)
        .route("/", get(root))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|origin| origin == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Server information response.
#[derive(Serialize)]
pub struct ServerInfo {
    name: String,
    version: String,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

/// Root endpoint handler.
async fn root() -> Json<ServerInfo> {
    Json(ServerInfo {
        name: "GCN Portal".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Basic health check.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    })
}

/// Kubernetes liveness probe.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe.
async fn readiness_check() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let response = health_check().await;
        assert_eq!(response.0.status, "healthy");
    }
}
