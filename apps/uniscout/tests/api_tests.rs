//! Integration tests for the Uniscout HTTP API.
//!
//! Uses axum-test to test the API handlers without starting a real server.

// Allow unwrap and panic in tests - these are standard for test code
// Allow holding MutexGuard across await in auth tests - tests are serialized
// intentionally to avoid env var conflicts
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::HeaderValue;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Mutex;
use uniscout::api::{
    AdminResponse, AppState, CompareResponse, HealthResponse, QueryResponse, RefreshResponse,
    StatusResponse, create_router,
};
use uniscout::config::AppConfig;
use uniscout_core::{
    Directory, RatingTenths, TuitionFees, UniversityId, UniversityRecord,
};

/// Mutex to serialize tests since router creation reads env vars.
static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Guard wrapper that holds the mutex and ensures cleanup on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
        unsafe { std::env::remove_var("UNISCOUT_API_KEY") };
    }
}

/// Test configuration: unreachable upstream, known admin password.
fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    // Port 9 (discard) refuses connections immediately on loopback.
    config.upstream.base_url = "http://127.0.0.1:9".to_string();
    config.upstream.timeout_secs = 1;
    config.admin.password = "letmein".to_string();
    config
}

fn record(id: &str, name: &str, location: &str, tenths: u16, programs: &[&str]) -> UniversityRecord {
    UniversityRecord {
        id: UniversityId::new(id),
        name: name.to_string(),
        location: location.to_string(),
        rating: RatingTenths::new(tenths),
        tuition_fees: TuitionFees {
            undergraduate: Some("$3,500/year".to_string()),
            postgraduate: None,
        },
        programs: programs.iter().map(|p| (*p).to_string()).collect(),
        ..UniversityRecord::default()
    }
}

fn sample_records() -> Vec<UniversityRecord> {
    vec![
        record("u1", "Aalto University", "Helsinki", 42, &["Engineering", "Design"]),
        record("u2", "Harbor College", "Boston", 35, &["Law", "Business"]),
        record("u3", "Boston Tech", "Boston", 28, &["Engineering"]),
        record("u4", "Zenith Institute", "Oslo", 47, &["Medicine"]),
    ]
}

/// Create a test server over an empty directory.
/// Returns the app state and a guard that must be kept alive during the test.
fn create_test_server() -> (TestServer, AppState, TestGuard) {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::remove_var("UNISCOUT_API_KEY") };

    let state = AppState::detached(&test_config());
    let router = create_router(state.clone());
    (
        TestServer::new(router).unwrap(),
        state,
        TestGuard { _guard: guard },
    )
}

/// Create a test server with the sample snapshot loaded.
async fn create_populated_test_server() -> (TestServer, AppState, TestGuard) {
    let (server, state, guard) = create_test_server();
    *state.directory.write().await = Directory::from_records(sample_records());
    (server, state, guard)
}

// =============================================================================
// HEALTH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _state, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

// =============================================================================
// STATUS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_status_empty_directory() {
    let (server, _state, _guard) = create_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.university_count, 0);
    assert!(status.refreshed_secs_ago.is_none());
}

#[tokio::test]
async fn test_status_reports_snapshot_size() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.university_count, 4);
}

// =============================================================================
// QUERY ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_query_empty_body_returns_everything() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let response = server.post("/query").json(&json!({})).await;

    response.assert_status_ok();
    let result: QueryResponse = response.json();
    assert!(result.success);
    assert_eq!(result.total_count, 4);
    assert_eq!(result.page, 1);
    // Name-ascending default ordering
    assert_eq!(result.items[0].name, "Aalto University");
}

#[tokio::test]
async fn test_query_free_text_matches_programs() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let result: QueryResponse = server
        .post("/query")
        .json(&json!({ "free_text": "engineering" }))
        .await
        .json();

    assert_eq!(result.total_count, 2);
    assert!(result.items.iter().all(|r| r
        .programs
        .iter()
        .any(|p| p.to_lowercase().contains("engineering"))));
}

#[tokio::test]
async fn test_query_location_filter_is_exact() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let result: QueryResponse = server
        .post("/query")
        .json(&json!({ "filters": { "location": "boston" } }))
        .await
        .json();

    assert_eq!(result.total_count, 2);

    // A location prefix is not an exact match
    let result: QueryResponse = server
        .post("/query")
        .json(&json!({ "filters": { "location": "bos" } }))
        .await
        .json();
    assert_eq!(result.total_count, 0);
}

#[tokio::test]
async fn test_query_rating_floor() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let result: QueryResponse = server
        .post("/query")
        .json(&json!({ "filters": { "rating_floor": 40 } }))
        .await
        .json();

    assert_eq!(result.total_count, 2);
}

#[tokio::test]
async fn test_query_pagination_clamps_page() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let result: QueryResponse = server
        .post("/query")
        .json(&json!({ "page": 99, "page_size": 2 }))
        .await
        .json();

    assert_eq!(result.page_count, 2);
    assert!(result.items.is_empty());
}

#[tokio::test]
async fn test_query_oversized_text_rejected() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let response = server
        .post("/query")
        .json(&json!({ "free_text": "x".repeat(10_000) }))
        .await;

    response.assert_status_bad_request();
    let result: QueryResponse = response.json();
    assert!(!result.success);
}

// =============================================================================
// FACETS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_facets_catalogue() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let response = server.get("/facets").await;
    response.assert_status_ok();

    let facets: serde_json::Value = response.json();
    let locations: Vec<String> =
        serde_json::from_value(facets["locations"].clone()).unwrap();
    assert_eq!(locations, vec!["Boston", "Helsinki", "Oslo"]);

    // All undergrad fees parse to $3,500 so the ladder stops at its band
    let bands: Vec<String> =
        serde_json::from_value(facets["tuition_bands"].clone()).unwrap();
    assert_eq!(bands, vec!["$0 - $2,000", "$2,001 - $5,000"]);
}

// =============================================================================
// UNIVERSITY LOOKUP TESTS
// =============================================================================

#[tokio::test]
async fn test_university_lookup() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let response = server.get("/universities/u2").await;
    response.assert_status_ok();
    let record: UniversityRecord = response.json();
    assert_eq!(record.name, "Harbor College");

    let response = server.get("/universities/nope").await;
    response.assert_status_not_found();
}

// =============================================================================
// COMPARE ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_compare_flow() {
    let (server, _state, _guard) = create_populated_test_server().await;

    // Starts empty
    let state: CompareResponse = server.get("/compare").await.json();
    assert!(state.ids.is_empty());
    assert_eq!(state.remaining, 3);

    // Add three, then hit the cap
    for id in ["u1", "u2", "u3"] {
        let response = server.post("/compare/add").json(&json!({ "id": id })).await;
        response.assert_status_ok();
    }
    let rejected: CompareResponse = server
        .post("/compare/add")
        .json(&json!({ "id": "u4" }))
        .await
        .json();
    assert_eq!(rejected.ids, vec!["u1", "u2", "u3"]);
    assert_eq!(rejected.remaining, 0);

    // Duplicate add is a no-op
    let duplicate: CompareResponse = server
        .post("/compare/add")
        .json(&json!({ "id": "u1" }))
        .await
        .json();
    assert_eq!(duplicate.ids.len(), 3);

    // Resolved records come back in selection order
    let state: CompareResponse = server.get("/compare").await.json();
    let names: Vec<&str> = state.items.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Aalto University", "Harbor College", "Boston Tech"]);

    // Remove then clear
    server
        .post("/compare/remove")
        .json(&json!({ "id": "u2" }))
        .await
        .assert_status_ok();
    let state: CompareResponse = server.get("/compare").await.json();
    assert_eq!(state.ids, vec!["u1", "u3"]);

    server.post("/compare/clear").await.assert_status_ok();
    let state: CompareResponse = server.get("/compare").await.json();
    assert!(state.ids.is_empty());
}

#[tokio::test]
async fn test_compare_unknown_id_rejected() {
    let (server, _state, _guard) = create_populated_test_server().await;

    let response = server
        .post("/compare/add")
        .json(&json!({ "id": "ghost" }))
        .await;

    response.assert_status_not_found();
}

// =============================================================================
// LEADS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_lead_validation_failure() {
    let (server, _state, _guard) = create_test_server();

    let response = server
        .post("/leads")
        .json(&json!({ "name": "Ada", "email": "not-an-email", "message": "hi" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_lead_malformed_email_is_client_error() {
    let (server, _state, _guard) = create_test_server();

    // A doubled '@' is a validation failure, not an upstream one, whatever
    // words the address contains.
    let response = server
        .post("/leads")
        .json(&json!({ "name": "Ada", "email": "delivery@@x.com", "message": "hi" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_lead_accepted_when_delivery_unconfigured() {
    let (server, _state, _guard) = create_test_server();

    // No service/template/user ids configured: the lead is logged, not sent.
    let response = server
        .post("/leads")
        .json(&json!({
            "name": "Ada",
            "email": "ada@example.com",
            "message": "Tell me about admissions",
        }))
        .await;

    response.assert_status_ok();
}

// =============================================================================
// NOTIFICATIONS ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_notifications_default_empty() {
    let (server, _state, _guard) = create_test_server();

    let response = server.get("/notifications").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"], json!([]));
}

// =============================================================================
// ADMIN ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_admin_gate() {
    let (server, _state, _guard) = create_test_server();

    // Locked by default
    let status: AdminResponse = server.get("/admin/status").await.json();
    assert!(!status.authenticated);

    // Wrong password
    let response = server
        .post("/admin/login")
        .json(&json!({ "password": "wrong" }))
        .await;
    response.assert_status_unauthorized();

    // Right password
    let response = server
        .post("/admin/login")
        .json(&json!({ "password": "letmein" }))
        .await;
    response.assert_status_ok();
    let status: AdminResponse = server.get("/admin/status").await.json();
    assert!(status.authenticated);

    // Logout locks again
    server.post("/admin/logout").await.assert_status_ok();
    let status: AdminResponse = server.get("/admin/status").await.json();
    assert!(!status.authenticated);
}

// =============================================================================
// REFRESH ENDPOINT TESTS
// =============================================================================

#[tokio::test]
async fn test_refresh_degrades_keeping_snapshot() {
    let (server, _state, _guard) = create_populated_test_server().await;

    // The upstream is unreachable: refresh fails but the old snapshot stays.
    let response = server.post("/refresh").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
    let result: RefreshResponse = response.json();
    assert!(!result.success);
    assert_eq!(result.university_count, 4);

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.university_count, 4);
    assert!(status.degraded.is_some());
}

// =============================================================================
// AUTHENTICATION TESTS
// =============================================================================

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let guard = ENV_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under ENV_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("UNISCOUT_API_KEY", "secret-key") };
    let _guard = TestGuard { _guard: guard };

    let state = AppState::detached(&test_config());
    let server = TestServer::new(create_router(state)).unwrap();

    // Health stays open for load balancer checks
    server.get("/health").await.assert_status_ok();

    // Everything else requires the key
    server.get("/status").await.assert_status_unauthorized();

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer secret-key".parse::<HeaderValue>().unwrap(),
        )
        .await;
    response.assert_status_ok();

    let response = server
        .get("/status")
        .add_header(
            axum::http::header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;
    response.assert_status_unauthorized();
}
