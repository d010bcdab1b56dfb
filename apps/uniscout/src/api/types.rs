//! # API Request/Response Types
//!
//! JSON structures for the HTTP API. Responses follow the upstream
//! envelope convention: a `success` flag plus either payload or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uniscout_core::{
    CompareOutcome, DirectoryQuery, FacetSet, ResultPage, UniversityRecord,
    primitives::{MAX_COMPARE, MAX_FREE_TEXT_LENGTH, MAX_PAGE_SIZE},
};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Directory snapshot status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub university_count: usize,
    pub location_count: usize,
    pub program_count: usize,
    pub upstream: String,
    /// Seconds since the last successful refresh, if any.
    pub refreshed_secs_ago: Option<u64>,
    /// Set when the last refresh attempt failed and the snapshot is stale.
    pub degraded: Option<String>,
}

// =============================================================================
// REFRESH RESPONSE
// =============================================================================

/// Snapshot refresh response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub university_count: usize,
    pub error: Option<String>,
}

impl RefreshResponse {
    pub fn success(count: usize) -> Self {
        Self {
            success: true,
            university_count: count,
            error: None,
        }
    }

    pub fn degraded(count: usize, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            university_count: count,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// QUERY REQUEST/RESPONSE
// =============================================================================

/// Query request: free text, filters, ordering and pagination.
///
/// All fields optional; an empty body is "everything, page 1".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryRequest {
    #[serde(flatten)]
    pub query: DirectoryQuery,
}

impl QueryRequest {
    /// Validate and return the inner query.
    ///
    /// Oversized free text is rejected; oversized page sizes are clamped
    /// to [`MAX_PAGE_SIZE`] to bound response bodies.
    pub fn to_query(&self) -> Result<DirectoryQuery, String> {
        if self.query.free_text.len() > MAX_FREE_TEXT_LENGTH {
            return Err(format!(
                "Search text length {} exceeds maximum {} bytes",
                self.query.free_text.len(),
                MAX_FREE_TEXT_LENGTH
            ));
        }
        let mut query = self.query.clone();
        query.page_size = query.page_size.min(MAX_PAGE_SIZE);
        Ok(query)
    }
}

/// Query response: one page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub success: bool,
    pub items: Vec<UniversityRecord>,
    pub total_count: usize,
    pub page_count: usize,
    pub page: usize,
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn from_page(page: ResultPage) -> Self {
        Self {
            success: true,
            items: page.items,
            total_count: page.total_count,
            page_count: page.page_count,
            page: page.page,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            items: vec![],
            total_count: 0,
            page_count: 0,
            page: 0,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// FACETS RESPONSE
// =============================================================================

/// Facet catalogue response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacetsResponse {
    pub locations: Vec<String>,
    pub programs: Vec<String>,
    pub tuition_bands: Vec<String>,
    pub rating_bands: Vec<String>,
}

impl FacetsResponse {
    pub fn from_facets(facets: &FacetSet) -> Self {
        Self {
            locations: facets.locations.clone(),
            programs: facets.programs.clone(),
            tuition_bands: facets
                .tuition_bands
                .iter()
                .map(|b| b.label().to_string())
                .collect(),
            rating_bands: facets
                .rating_bands
                .iter()
                .map(|b| b.label().to_string())
                .collect(),
        }
    }
}

// =============================================================================
// COMPARE REQUEST/RESPONSE
// =============================================================================

/// Comparison set mutation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    pub id: String,
}

/// Comparison set state response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    pub success: bool,
    /// Result of an add: "added", "already_present" or "cap_reached".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CompareOutcome>,
    pub ids: Vec<String>,
    pub remaining: usize,
    pub items: Vec<UniversityRecord>,
    pub error: Option<String>,
}

impl CompareResponse {
    pub fn state(ids: Vec<String>, items: Vec<UniversityRecord>) -> Self {
        let remaining = MAX_COMPARE.saturating_sub(ids.len());
        Self {
            success: true,
            outcome: None,
            ids,
            remaining,
            items,
            error: None,
        }
    }

    pub fn with_outcome(mut self, outcome: CompareOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            outcome: None,
            ids: vec![],
            remaining: 0,
            items: vec![],
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// LEAD RESPONSE
// =============================================================================

/// Lead submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl LeadResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// NOTIFICATIONS RESPONSE
// =============================================================================

/// Notification snapshot response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub success: bool,
    pub data: Vec<Value>,
}

// =============================================================================
// ADMIN REQUEST/RESPONSE
// =============================================================================

/// Admin login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// Admin gate state response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminResponse {
    pub success: bool,
    pub authenticated: bool,
    pub error: Option<String>,
}

impl AdminResponse {
    pub fn authenticated(authenticated: bool) -> Self {
        Self {
            success: true,
            authenticated,
            error: None,
        }
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            authenticated: false,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
