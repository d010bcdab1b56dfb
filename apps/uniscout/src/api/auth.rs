//! # Authentication Module
//!
//! Two independent mechanisms:
//!
//! - **API key** (`UNISCOUT_API_KEY`): if set, every request except
//!   `/health` requires `Authorization: Bearer <key>`.
//! - **Admin gate**: a single shared password guarding the admin console
//!   endpoints. Session-scoped boolean, not a security boundary.
//!
//! Both comparisons are constant-time over padded buffers so neither the
//! key nor the password length leaks through timing.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

// =============================================================================
// CONSTANT-TIME COMPARISON
// =============================================================================

/// Compare two secrets in constant time.
///
/// Both inputs are padded to the longer length so `ct_eq` always runs over
/// the same number of bytes; the final length check is folded in after.
#[must_use]
pub fn secrets_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len()).max(1);
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

// =============================================================================
// API KEY AUTHENTICATION
// =============================================================================

/// Get API key from environment variable.
///
/// Returns `Some(key)` if `UNISCOUT_API_KEY` is set and non-empty,
/// `None` otherwise (disabling authentication).
pub fn get_api_key_from_env() -> Option<String> {
    std::env::var("UNISCOUT_API_KEY")
        .ok()
        .filter(|k| !k.is_empty())
}

/// API key authentication middleware.
///
/// `/health` is always allowed for load balancer checks. Both
/// `Bearer <key>` and raw `<key>` header formats are accepted.
pub async fn api_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_api_key_from_env() else {
        return Ok(next.run(request).await);
    };

    if request.uri().path() == "/health" {
        return Ok(next.run(request).await);
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if secrets_match(provided, &expected) {
                Ok(next.run(request).await)
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    "Authentication failed: invalid API key"
                );
                Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                "Missing Authorization header"
            );
            Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
        }
    }
}

// =============================================================================
// ADMIN GATE
// =============================================================================

/// Password gate for the admin console.
///
/// An empty configured password keeps the gate permanently locked: there
/// is no input that unlocks it.
#[derive(Debug)]
pub struct AdminGate {
    password: String,
    authenticated: bool,
}

impl AdminGate {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            authenticated: false,
        }
    }

    /// Attempt to unlock the gate. Returns the new authenticated state.
    pub fn login(&mut self, attempt: &str) -> bool {
        if self.password.is_empty() {
            tracing::warn!("Admin login attempted but no admin password is configured");
            return false;
        }
        if secrets_match(attempt, &self.password) {
            self.authenticated = true;
        } else {
            tracing::warn!(
                event = "auth_failure",
                reason = "invalid_admin_password",
                "Admin login failed"
            );
        }
        self.authenticated
    }

    /// Lock the gate.
    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

// =============================================================================
// TESTS
// =============================================================================
