//! On-demand reminder: POST /notify
//!
//! Runs the reminder job synchronously. Apart from the access check the
//! status is always 200; the body says what happened:
//! `{"message": "...", "sent": true, "pending": 2}`.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::app::AppState;

pub async fn notify_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    state.access.check(&headers)?;

    info!("manual reminder requested");
    let body = match state.reminder.run().await {
        Ok(outcome) => json!({
            "message": outcome.summary(),
            "sent": outcome.sent(),
            "pending": outcome.pending,
        }),
        Err(e) => {
            error!(error = %e, "manual reminder could not read todos");
            json!({
                "message": format!("Reminder failed: {e}"),
                "sent": false,
                "pending": 0,
            })
        }
    };
    Ok(Json(body))
}
