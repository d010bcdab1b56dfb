//! # Uniscout HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET  /health` - Health check
//! - `GET  /status` - Snapshot status
//! - `POST /refresh` - Re-fetch the upstream snapshot
//! - `POST /query` - Search, filter and paginate the directory
//! - `GET  /facets` - Facet catalogue for the current snapshot
//! - `GET  /universities/{id}` - Single record lookup
//! - `GET  /compare` - Current comparison set
//! - `POST /compare/add` - Add to the comparison set (max 3)
//! - `POST /compare/remove` - Remove from the comparison set
//! - `POST /compare/clear` - Empty the comparison set
//! - `POST /leads` - Submit a prospective-student enquiry
//! - `GET  /notifications` - Latest notification snapshot
//! - `POST /admin/login` - Unlock the admin gate
//! - `POST /admin/logout` - Lock the admin gate
//! - `GET  /admin/status` - Admin gate state
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `UNISCOUT_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `UNISCOUT_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `UNISCOUT_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

// Re-exports for external use
pub use auth::{AdminGate, get_api_key_from_env, secrets_match};
pub use middleware::{create_rate_limiter, get_rate_limit_from_env};
// Re-export handlers and types for integration tests (via `uniscout::api::*`)
#[allow(unused_imports)]
pub use handlers::{
    admin_login_handler, admin_logout_handler, admin_status_handler, compare_add_handler,
    compare_clear_handler, compare_get_handler, compare_remove_handler, facets_handler,
    health_handler, leads_handler, notifications_handler, query_handler, refresh_handler,
    status_handler, university_handler,
};
#[allow(unused_imports)]
pub use types::{
    AdminLoginRequest, AdminResponse, CompareRequest, CompareResponse, FacetsResponse,
    HealthResponse, LeadResponse, NotificationsResponse, QueryRequest, QueryResponse,
    RefreshResponse, StatusResponse,
};

use crate::config::AppConfig;
use crate::leads::LeadSink;
use crate::notify::{self, NotificationPoller};
use crate::upstream::DirectoryClient;
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{RwLock, watch};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uniscout_core::{ComparisonSet, Directory, DirectoryError};

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
#[derive(Clone)]
pub struct AppState {
    /// The current directory snapshot.
    pub directory: Arc<RwLock<Directory>>,
    /// The session comparison set.
    pub compare: Arc<RwLock<ComparisonSet>>,
    /// The admin console gate.
    pub admin: Arc<RwLock<AdminGate>>,
    /// Upstream directory client.
    pub client: DirectoryClient,
    /// Lead delivery client.
    pub leads: LeadSink,
    /// Latest notification snapshot from the poller.
    pub notifications: watch::Receiver<Vec<Value>>,
    /// When the snapshot was last refreshed successfully.
    pub last_refresh: Arc<RwLock<Option<Instant>>>,
    /// Last refresh failure, if the snapshot is stale.
    pub degraded: Arc<RwLock<Option<String>>>,
}

impl AppState {
    /// Create app state from configuration plus a notification receiver.
    #[must_use]
    pub fn new(config: &AppConfig, notifications: watch::Receiver<Vec<Value>>) -> Self {
        Self {
            directory: Arc::new(RwLock::new(Directory::new())),
            compare: Arc::new(RwLock::new(ComparisonSet::new())),
            admin: Arc::new(RwLock::new(AdminGate::new(config.admin.password.clone()))),
            client: DirectoryClient::new(&config.upstream),
            leads: LeadSink::new(config.leads.clone()),
            notifications,
            last_refresh: Arc::new(RwLock::new(None)),
            degraded: Arc::new(RwLock::new(None)),
        }
    }

    /// State with no live poller behind the notification channel.
    ///
    /// The receiver keeps serving the initial (empty) snapshot after the
    /// sender drops, which suits tests and one-shot CLI commands.
    #[must_use]
    pub fn detached(config: &AppConfig) -> Self {
        let (_, receiver) = watch::channel(Vec::new());
        Self::new(config, receiver)
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build CORS layer from environment configuration.
///
/// Reads `UNISCOUT_CORS_ORIGINS` environment variable:
/// - If "*": allows all origins (development mode - use with caution!)
/// - If not set: defaults to localhost only (restrictive default)
/// - Otherwise: parses comma-separated list of allowed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var("UNISCOUT_CORS_ORIGINS").ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins (UNISCOUT_CORS_ORIGINS=*). This is insecure for production!"
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in UNISCOUT_CORS_ORIGINS, defaulting to localhost only"
                );
                build_localhost_cors()
            } else {
                CorsLayer::new()
                    .allow_origin(allowed_origins)
                    .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                    .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            }
        }
        None => {
            tracing::info!("CORS: No UNISCOUT_CORS_ORIGINS set, defaulting to localhost only");
            build_localhost_cors()
        }
    }
}

/// Build a restrictive CORS layer that only allows localhost origins.
fn build_localhost_cors() -> CorsLayer {
    let localhost_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().ok(),
        "http://localhost:8080".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:3000".parse::<HeaderValue>().ok(),
        "http://127.0.0.1:8080".parse::<HeaderValue>().ok(),
    ];
    let origins: Vec<HeaderValue> = localhost_origins.into_iter().flatten().collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. CORS - handles preflight requests
/// 2. Tracing - logs all requests
/// 3. Rate Limiting - protects against DoS (if enabled)
/// 4. Authentication - validates API key (if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "⚠️  API key authentication DISABLED - all endpoints are publicly accessible! \
             Set UNISCOUT_API_KEY environment variable to enable authentication."
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/refresh", post(handlers::refresh_handler))
        .route("/query", post(handlers::query_handler))
        .route("/facets", get(handlers::facets_handler))
        .route("/universities/{id}", get(handlers::university_handler))
        .route("/compare", get(handlers::compare_get_handler))
        .route("/compare/add", post(handlers::compare_add_handler))
        .route("/compare/remove", post(handlers::compare_remove_handler))
        .route("/compare/clear", post(handlers::compare_clear_handler))
        .route("/leads", post(handlers::leads_handler))
        .route("/notifications", get(handlers::notifications_handler))
        .route("/admin/login", post(handlers::admin_login_handler))
        .route("/admin/logout", post(handlers::admin_logout_handler))
        .route("/admin/status", get(handlers::admin_status_handler));

    // Apply authentication middleware (innermost - runs last on request)
    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    // Apply rate limiting middleware
    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    // Apply CORS, body limit, and tracing (outermost layers)
    router
        .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
///
/// Performs an initial upstream fetch (degrading to an empty snapshot on
/// failure), spawns the notification poller, and serves until shutdown.
pub async fn run_server(addr: &str, config: &AppConfig) -> Result<(), DirectoryError> {
    let client = DirectoryClient::new(&config.upstream);
    let poller = NotificationPoller::spawn(client.clone(), notify::POLL_INTERVAL);

    let state = AppState::new(config, poller.subscribe());

    // Initial snapshot. A dead upstream means an empty directory, not a
    // failed startup.
    let (batch, failure) = state.client.fetch_or_empty().await;
    let records = uniscout_core::Normalizer::normalize(&batch);
    tracing::info!(count = records.len(), "Initial directory snapshot loaded");
    *state.directory.write().await = Directory::from_records(records);
    if failure.is_none() {
        *state.last_refresh.write().await = Some(Instant::now());
    }
    *state.degraded.write().await = failure;

    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DirectoryError::Io(format!("Bind failed: {}", e)))?;

    tracing::info!("Uniscout HTTP server listening on {}", addr);

    let result = axum::serve(listener, router)
        .await
        .map_err(|e| DirectoryError::Io(format!("Server error: {}", e)));

    poller.stop();
    result
}
