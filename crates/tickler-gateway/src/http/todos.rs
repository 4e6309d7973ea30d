//! Browser-facing routes: the list page, the add form, and the toggle buttons.
//!
//! Failures answer with short plain-text bodies; successes redirect back to `/`
//! (303, so the browser follows with a GET).

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tickler_core::TodoId;
use tickler_store::StoreError;
use tracing::{debug, error};

use crate::app::AppState;
use crate::http::ui::render_index;

#[derive(Debug, Default, Deserialize)]
pub struct AddTodoForm {
    #[serde(default)]
    pub text: String,
}

/// Body of `POST /add`, read as JSON when the request says so and as a
/// urlencoded form otherwise.
///
/// A missing or unparseable body reads as empty text, so it ends
/// in the same 400 as a blank field.
pub struct AddTodoBody(pub AddTodoForm);

impl<S: Send + Sync> FromRequest<S> for AddTodoBody {
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        let parsed = if is_json {
            Json::<AddTodoForm>::from_request(req, state)
                .await
                .map(|Json(form)| form)
                .map_err(|e| e.body_text())
        } else {
            Form::<AddTodoForm>::from_request(req, state)
                .await
                .map(|Form(form)| form)
                .map_err(|e| e.body_text())
        };

        Ok(Self(parsed.unwrap_or_else(|reason| {
            debug!(%reason, "unreadable POST /add body");
            AddTodoForm::default()
        })))
    }
}

/// GET /: render every todo.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.store.list_all() {
        Ok(todos) => Html(render_index(&todos)).into_response(),
        Err(e) => {
            error!(error = %e, "GET / failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching todos").into_response()
        }
    }
}

/// POST /add: create a todo from the body's `text` field.
pub async fn add_handler(
    State(state): State<Arc<AppState>>,
    AddTodoBody(form): AddTodoBody,
) -> Response {
    match state.store.create(&form.text) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(StoreError::InvalidInput(_)) => {
            (StatusCode::BAD_REQUEST, "Todo text is required").into_response()
        }
        Err(e) => {
            error!(error = %e, "POST /add failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error adding todo").into_response()
        }
    }
}

/// POST /toggle/{id}: flip completion.
///
/// An unknown id redirects like a success unless `todos.strict_toggle` is set,
/// in which case it answers 404.
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    match state.store.toggle_completion(&TodoId::from(id)) {
        Ok(_) => Redirect::to("/").into_response(),
        Err(StoreError::NotFound { id }) if state.strict_toggle => {
            debug!(todo_id = %id, "toggle of unknown todo rejected");
            (StatusCode::NOT_FOUND, "Todo not found").into_response()
        }
        Err(StoreError::NotFound { id }) => {
            debug!(todo_id = %id, "toggle of unknown todo ignored");
            Redirect::to("/").into_response()
        }
        Err(e) => {
            error!(error = %e, "POST /toggle failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error updating todo").into_response()
        }
    }
}
