//! Admin API router configuration.
//!
//! Handlers authenticate before touching any provider, so a rejected
//! request produces zero store or broker calls.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use chrono::Utc;
use gcn_broker::BrokerAdmin;
use gcn_model::{AclEntry, Circular, SyncRecord};
use gcn_storage::{AclMirrorProvider, CircularProvider, SyncLogProvider};

use crate::auth::{authenticate, GroupResolver};
use crate::dto::{
    AclActionForm, AclListParams, CircularSearchParams, CircularSearchResponse,
    CircularSubmitRequest, CreateAclRequest,
};
use crate::error::{AdminError, AdminResult};
use crate::state::AdminState;
use crate::{acl, circulars};

// ============================================================================
// Kafka ACL Handlers
// ============================================================================

/// POST /admin/kafka/acls - Form-encoded intent dispatch
async fn acl_action<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    headers: HeaderMap,
    Form(form): Form<AclActionForm>,
) -> AdminResult<Response>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let user = authenticate(&state.groups, &headers).await?;
    user.require_group(&state.settings.admin_group)?;

    match form.intent.as_deref() {
        Some("migrateFromBroker") => {
            let summary = acl::sync_mirror_from_broker(
                state.broker.as_ref(),
                state.mirror.as_ref(),
                state.sync_log.as_ref(),
                &user.user,
            )
            .await?;
            Ok(Json(summary).into_response())
        }
        Some("migrateFromDB") => {
            let summary = acl::sync_broker_from_mirror(
                state.broker.as_ref(),
                state.mirror.as_ref(),
                state.sync_log.as_ref(),
                &user.user,
            )
            .await?;
            Ok(Json(summary).into_response())
        }
        Some("create") => {
            let request = CreateAclRequest::try_from(&form)?;
            let entries =
                acl::create_acl(state.broker.as_ref(), state.mirror.as_ref(), &request).await?;
            Ok((StatusCode::CREATED, Json(entries)).into_response())
        }
        Some("delete") => {
            let ids = form.delete_ids()?;
            let summary =
                acl::delete_acls(state.broker.as_ref(), state.mirror.as_ref(), &ids).await?;
            Ok(Json(summary).into_response())
        }
        other => Err(AdminError::BadRequest(format!(
            "unrecognized intent: '{}'",
            other.unwrap_or_default()
        ))),
    }
}

/// GET /admin/kafka/acls - List mirror entries, optionally filtered
async fn list_acls<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    headers: HeaderMap,
    Query(params): Query<AclListParams>,
) -> AdminResult<Json<Vec<AclEntry>>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let user = authenticate(&state.groups, &headers).await?;
    user.require_group(&state.settings.admin_group)?;

    let entries = state.mirror.list(params.filter.as_deref()).await?;
    Ok(Json(entries))
}

/// GET /admin/kafka/acls/sync - Most recent bulk-sync record
async fn sync_status<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    headers: HeaderMap,
) -> AdminResult<Json<Option<SyncRecord>>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let user = authenticate(&state.groups, &headers).await?;
    user.require_group(&state.settings.admin_group)?;

    Ok(Json(state.sync_log.latest().await?))
}

// ============================================================================
// Circular Handlers
// ============================================================================

/// POST /circulars - Submit a circular
async fn submit_circular<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    headers: HeaderMap,
    Json(request): Json<CircularSubmitRequest>,
) -> AdminResult<(StatusCode, Json<Circular>)>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let user = authenticate(&state.groups, &headers).await?;
    user.require_group(&state.settings.submitter_group)?;

    let circular = circulars::submit(
        state.circulars.as_ref(),
        &state.publisher,
        &state.settings.circulars_topic,
        request.into_submission(user.user),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(circular)))
}

/// GET /circulars/{id} - Get a circular by id
async fn get_circular<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    Path(circular_id): Path<u64>,
) -> AdminResult<Json<Circular>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let circular = circulars::get(state.circulars.as_ref(), circular_id).await?;
    Ok(Json(circular))
}

/// GET /circulars - Search circulars
async fn search_circulars<M, L, C, B, G>(
    State(state): State<AdminState<M, L, C, B, G>>,
    Query(params): Query<CircularSearchParams>,
) -> AdminResult<Json<CircularSearchResponse>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    let criteria = params.into_criteria(Utc::now());
    let page = circulars::search(state.circulars.as_ref(), &criteria).await?;
    Ok(Json(CircularSearchResponse::from(page)))
}

// ============================================================================
// Routers
// ============================================================================

/// Creates the Kafka ACL admin router.
pub fn kafka_admin_router<M, L, C, B, G>() -> Router<AdminState<M, L, C, B, G>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    Router::new()
        .route("/admin/kafka/acls", post(acl_action).get(list_acls))
        .route("/admin/kafka/acls/sync", get(sync_status))
}

/// Creates the circulars router.
pub fn circulars_router<M, L, C, B, G>() -> Router<AdminState<M, L, C, B, G>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    Router::new()
        .route("/circulars", post(submit_circular).get(search_circulars))
        .route("/circulars/{id}", get(get_circular))
}

/// Creates the complete API router.
pub fn api_router<M, L, C, B, G>() -> Router<AdminState<M, L, C, B, G>>
where
    M: AclMirrorProvider + 'static,
    L: SyncLogProvider + 'static,
    C: CircularProvider + 'static,
    B: BrokerAdmin + 'static,
    G: GroupResolver + 'static,
{
    kafka_admin_router().merge(circulars_router())
}
