//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        AdminLoginRequest, AdminResponse, CompareRequest, CompareResponse, FacetsResponse,
        HealthResponse, LeadResponse, NotificationsResponse, QueryRequest, QueryResponse,
        RefreshResponse, StatusResponse,
    },
};
use crate::leads::LeadSubmission;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uniscout_core::{Directory, DirectoryError, Normalizer, UniversityId};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// STATUS HANDLER
// =============================================================================

/// Get directory snapshot status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let directory = state.directory.read().await;
    let facets = directory.facets();
    let refreshed_secs_ago = state
        .last_refresh
        .read()
        .await
        .map(|at| at.elapsed().as_secs());
    let degraded = state.degraded.read().await.clone();

    let response = StatusResponse {
        university_count: directory.len(),
        location_count: facets.locations.len(),
        program_count: facets.programs.len(),
        upstream: state.client.base_url().to_string(),
        refreshed_secs_ago,
        degraded,
    };

    (StatusCode::OK, Json(response))
}

// =============================================================================
// REFRESH HANDLER
// =============================================================================

/// Re-fetch the upstream snapshot.
///
/// A failed fetch keeps the previous snapshot in place; the response
/// reports the failure and the (stale) record count.
pub async fn refresh_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.client.fetch_universities().await {
        Ok(batch) => {
            let records = Normalizer::normalize(&batch);
            let count = records.len();

            *state.directory.write().await = Directory::from_records(records);

            *state.last_refresh.write().await = Some(std::time::Instant::now());
            *state.degraded.write().await = None;

            tracing::info!(count, "Directory snapshot refreshed");
            (StatusCode::OK, Json(RefreshResponse::success(count)))
        }
        Err(e) => {
            let count = state.directory.read().await.len();
            *state.degraded.write().await = Some(e.to_string());

            tracing::warn!("Refresh failed, keeping previous snapshot: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(RefreshResponse::degraded(count, e.to_string())),
            )
        }
    }
}

// =============================================================================
// QUERY HANDLER
// =============================================================================

/// Execute a directory query.
pub async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> impl IntoResponse {
    let query = match request.to_query() {
        Ok(q) => q,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(QueryResponse::error(format!("Invalid query: {}", e))),
            );
        }
    };

    let directory = state.directory.read().await;
    let page = directory.query(&query);
    (StatusCode::OK, Json(QueryResponse::from_page(page)))
}

// =============================================================================
// FACETS HANDLER
// =============================================================================

/// Get the facet catalogue for the current snapshot.
pub async fn facets_handler(State(state): State<AppState>) -> impl IntoResponse {
    let directory = state.directory.read().await;
    let facets = directory.facets();
    (StatusCode::OK, Json(FacetsResponse::from_facets(&facets)))
}

// =============================================================================
// UNIVERSITY HANDLER
// =============================================================================

/// Get a single university by id.
pub async fn university_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let directory = state.directory.read().await;
    match directory.find(&UniversityId::new(id.clone())) {
        Some(record) => (StatusCode::OK, Json(record.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": format!("No university with id '{}'", id),
            })),
        )
            .into_response(),
    }
}

// =============================================================================
// COMPARE HANDLERS
// =============================================================================

/// Get the current comparison set with resolved records.
pub async fn compare_get_handler(State(state): State<AppState>) -> impl IntoResponse {
    let compare = state.compare.read().await;
    let directory = state.directory.read().await;

    let ids: Vec<String> = compare.ids().iter().map(|id| id.to_string()).collect();
    let items = directory
        .resolve(&compare)
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(CompareResponse::state(ids, items)))
}

/// Add a university to the comparison set.
pub async fn compare_add_handler(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> impl IntoResponse {
    let id = UniversityId::new(request.id);

    // Unknown ids are rejected before touching the set.
    {
        let directory = state.directory.read().await;
        if directory.find(&id).is_none() {
            return (
                StatusCode::NOT_FOUND,
                Json(CompareResponse::error(format!(
                    "No university with id '{}'",
                    id
                ))),
            );
        }
    }

    let mut compare = state.compare.write().await;
    let outcome = compare.add(id);

    let directory = state.directory.read().await;
    let ids: Vec<String> = compare.ids().iter().map(|i| i.to_string()).collect();
    let items = directory.resolve(&compare).into_iter().cloned().collect();

    (
        StatusCode::OK,
        Json(CompareResponse::state(ids, items).with_outcome(outcome)),
    )
}

/// Remove a university from the comparison set.
pub async fn compare_remove_handler(
    State(state): State<AppState>,
    Json(request): Json<CompareRequest>,
) -> impl IntoResponse {
    let mut compare = state.compare.write().await;
    compare.remove(&UniversityId::new(request.id));

    let directory = state.directory.read().await;
    let ids: Vec<String> = compare.ids().iter().map(|i| i.to_string()).collect();
    let items = directory.resolve(&compare).into_iter().cloned().collect();

    (StatusCode::OK, Json(CompareResponse::state(ids, items)))
}

/// Clear the comparison set.
pub async fn compare_clear_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.compare.write().await.clear();
    (StatusCode::OK, Json(CompareResponse::state(vec![], vec![])))
}

// =============================================================================
// LEADS HANDLER
// =============================================================================

/// Accept a prospective-student enquiry.
pub async fn leads_handler(
    State(state): State<AppState>,
    Json(form): Json<LeadSubmission>,
) -> impl IntoResponse {
    match state.leads.dispatch(&form).await {
        Ok(()) => (StatusCode::OK, Json(LeadResponse::accepted())),
        // Validation failures are the caller's fault; anything else means
        // the mail service let us down.
        Err(DirectoryError::InvalidInput(msg)) => {
            (StatusCode::BAD_REQUEST, Json(LeadResponse::error(msg)))
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(LeadResponse::error(e.to_string())),
        ),
    }
}

// =============================================================================
// NOTIFICATIONS HANDLER
// =============================================================================

/// Latest notification snapshot from the background poller.
pub async fn notifications_handler(State(state): State<AppState>) -> impl IntoResponse {
    let data = state.notifications.borrow().clone();
    (
        StatusCode::OK,
        Json(NotificationsResponse {
            success: true,
            data,
        }),
    )
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// Unlock the admin gate.
pub async fn admin_login_handler(
    State(state): State<AppState>,
    Json(request): Json<AdminLoginRequest>,
) -> impl IntoResponse {
    let mut gate = state.admin.write().await;
    if gate.login(&request.password) {
        (StatusCode::OK, Json(AdminResponse::authenticated(true)))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(AdminResponse::rejected("Invalid password")),
        )
    }
}

/// Lock the admin gate.
pub async fn admin_logout_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.admin.write().await.logout();
    (StatusCode::OK, Json(AdminResponse::authenticated(false)))
}

/// Current admin gate state.
pub async fn admin_status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let authenticated = state.admin.read().await.is_authenticated();
    (
        StatusCode::OK,
        Json(AdminResponse::authenticated(authenticated)),
    )
}
