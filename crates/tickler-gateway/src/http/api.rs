//! JSON API: `GET /api/todos` and `GET /api/todos/{id}`.
//!
//! Error: `{"error": "..."}`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tickler_core::{Todo, TodoId};
use tickler_store::StoreError;
use tracing::error;

use crate::app::AppState;

type ApiError = (StatusCode, Json<Value>);

/// GET /api/todos: every todo in insertion order.
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, ApiError> {
    state.store.list_all().map(Json).map_err(|e| {
        error!(error = %e, "GET /api/todos failed");
        internal_error()
    })
}

/// GET /api/todos/{id}: a single todo.
pub async fn get_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    match state.store.find_by_id(&TodoId::from(id)) {
        Ok(todo) => Ok(Json(todo)),
        Err(StoreError::NotFound { .. }) => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Todo not found" })),
        )),
        Err(e) => {
            error!(error = %e, "GET /api/todos/:id failed");
            Err(internal_error())
        }
    }
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
}
