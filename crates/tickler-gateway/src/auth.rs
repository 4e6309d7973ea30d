//! Access gate for the operator endpoints (`/admin`, `/notify`).
//!
//! Open by default so existing deployments keep working; `gateway.auth.mode =
//! "token"` requires `Authorization: Bearer <token>`.

use axum::{http::HeaderMap, http::StatusCode, Json};
use serde_json::{json, Value};
use tickler_core::config::{AuthConfig, AuthMode};
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any caller is allowed.
    Open,
    /// The bearer token must match exactly.
    BearerToken(String),
    /// Token mode without a configured token: deny everyone.
    Locked,
}

impl AccessPolicy {
    pub fn from_config(auth: &AuthConfig) -> Self {
        match auth.mode {
            AuthMode::None => AccessPolicy::Open,
            AuthMode::Token => match auth.token.as_deref() {
                Some(token) if !token.is_empty() => AccessPolicy::BearerToken(token.to_string()),
                _ => {
                    warn!("gateway.auth.mode is 'token' but no token is set; operator endpoints are locked");
                    AccessPolicy::Locked
                }
            },
        }
    }

    /// Returns true if the request is authorised.
    pub fn permits(&self, headers: &HeaderMap) -> bool {
        match self {
            AccessPolicy::Open => true,
            AccessPolicy::BearerToken(expected) => extract_bearer(headers)
                .map(|t| t == expected.as_str())
                .unwrap_or(false),
            AccessPolicy::Locked => false,
        }
    }

    /// `Ok(())` when permitted, otherwise the 401 response to return.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
        if self.permits(headers) {
            Ok(())
        } else {
            Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Unauthorized. Set 'Authorization: Bearer <your-token>' header."
                })),
            ))
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}
