//! Aggregate counts: GET /admin
//!
//! Response: `{"totalTodos": 3, "completedTodos": 1, "pendingTodos": 2}`

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tickler_core::TodoStats;
use tracing::error;

use crate::app::AppState;

/// GET /admin: gated by the configured access policy.
pub async fn admin_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TodoStats>, (StatusCode, Json<Value>)> {
    state.access.check(&headers)?;

    state.store.stats().map(Json).map_err(|e| {
        error!(error = %e, "GET /admin failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string(), "code": e.code() })),
        )
    })
}
