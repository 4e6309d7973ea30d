use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tickler_core::config::TicklerConfig;
use tickler_reminder::ReminderJob;
use tickler_store::TodoStore;

use crate::auth::AccessPolicy;

/// Central shared state: passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub store: Arc<TodoStore>,
    pub reminder: Arc<ReminderJob>,
    pub access: AccessPolicy,
    /// Unknown ids on `/toggle/{id}` answer 404 instead of redirecting.
    pub strict_toggle: bool,
}

impl AppState {
    pub fn new(config: &TicklerConfig, store: Arc<TodoStore>, reminder: Arc<ReminderJob>) -> Self {
        Self {
            store,
            reminder,
            access: AccessPolicy::from_config(&config.gateway.auth),
            strict_toggle: config.todos.strict_toggle,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(crate::http::todos::index_handler))
        .route("/add", post(crate::http::todos::add_handler))
        .route("/toggle/{id}", post(crate::http::todos::toggle_handler))
        .route("/api/todos", get(crate::http::api::list_handler))
        .route("/api/todos/{id}", get(crate::http::api::get_handler))
        .route("/admin", get(crate::http::admin::admin_handler))
        .route("/notify", post(crate::http::notify::notify_handler))
        .route("/health", get(crate::http::health::health_handler))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use std::sync::Mutex;
    use tickler_core::config::{AuthMode, DEFAULT_DATE_FORMAT};
    use tickler_notify::{NotificationSink, NotifyError};
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl NotificationSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }
        async fn send(&self, text: &str) -> Result<(), NotifyError> {
            self.sent.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Harness {
        router: Router,
        store: Arc<TodoStore>,
        sink: Arc<RecordingSink>,
    }

    fn harness_with(config: TicklerConfig) -> Harness {
        harness_on(rusqlite::Connection::open_in_memory().unwrap(), config)
    }

    fn harness_on(conn: rusqlite::Connection, config: TicklerConfig) -> Harness {
        let store = Arc::new(TodoStore::new(conn).unwrap());
        let sink = Arc::new(RecordingSink::default());
        let reminder = Arc::new(ReminderJob::new(
            store.clone(),
            sink.clone(),
            DEFAULT_DATE_FORMAT,
        ));
        let state = Arc::new(AppState::new(&config, store.clone(), reminder));
        Harness {
            router: build_router(state),
            store,
            sink,
        }
    }

    fn harness() -> Harness {
        harness_with(TicklerConfig::default())
    }

    async fn send(router: &Router, req: Request<Body>) -> Response {
        router.clone().oneshot(req).await.unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_string(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_str(&body_string(resp).await).unwrap()
    }

    fn assert_redirects_home(resp: &Response) {
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn add_then_list_page_and_api() {
        let h = harness();

        let resp = send(&h.router, post_form("/add", "text=++Buy+milk++")).await;
        assert_redirects_home(&resp);

        let page = body_string(send(&h.router, get("/")).await).await;
        assert!(page.contains("<span>Buy milk</span>"));

        let resp = send(&h.router, get("/api/todos")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let todos = body_json(resp).await;
        let todos = todos.as_array().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0]["text"], "Buy milk");
        assert_eq!(todos[0]["completed"], false);
        assert!(todos[0]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn blank_text_is_a_bad_request() {
        let h = harness();
        for body in ["text=", "text=+++", ""] {
            let resp = send(&h.router, post_form("/add", body)).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body:?}");
            assert_eq!(body_string(resp).await, "Todo text is required");
        }
        assert_eq!(h.store.count_all().unwrap(), 0);
    }

    #[tokio::test]
    async fn add_without_form_content_type_is_a_bad_request() {
        let h = harness();
        let resp = send(&h.router, post_empty("/add")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(resp).await, "Todo text is required");

        for body in ["{}", r#"{"text": "  "}"#, r#"{"text": 5}"#, "not json"] {
            let resp = send(&h.router, post_json("/add", body)).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        }
        assert_eq!(h.store.count_all().unwrap(), 0);
    }

    #[tokio::test]
    async fn add_accepts_json_body() {
        let h = harness();
        let resp = send(&h.router, post_json("/add", r#"{"text":"Buy milk"}"#)).await;
        assert_redirects_home(&resp);

        let todos = h.store.list_all().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].text, "Buy milk");
    }

    #[tokio::test]
    async fn unreadable_rows_answer_500() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        tickler_store::db::init_db(&conn).unwrap();
        conn.execute(
            "INSERT INTO todos (id, text, completed, created_at) VALUES ('bad', 'Broken', 0, 'garbage')",
            [],
        )
        .unwrap();
        let h = harness_on(conn, TicklerConfig::default());

        let resp = send(&h.router, get("/")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Error fetching todos");

        let resp = send(&h.router, get("/api/todos")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error"], "Internal server error");

        let resp = send(&h.router, get("/api/todos/bad")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        // The reminder cannot read its pending list either; /notify still answers 200.
        let resp = send(&h.router, post_empty("/notify")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["sent"], false);
        assert!(h.sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_table_answers_500_on_every_store_route() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let h = harness_on(
            rusqlite::Connection::open(&path).unwrap(),
            TicklerConfig::default(),
        );
        let todo = h.store.create("Write report").unwrap();

        rusqlite::Connection::open(&path)
            .unwrap()
            .execute_batch("DROP TABLE todos;")
            .unwrap();

        let resp = send(&h.router, post_form("/add", "text=Buy+milk")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Error adding todo");

        let resp = send(&h.router, post_empty(&format!("/toggle/{}", todo.id))).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(resp).await, "Error updating todo");

        let resp = send(&h.router, get("/admin")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["code"], "STORAGE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn toggle_flips_and_redirects() {
        let h = harness();
        let todo = h.store.create("Write report").unwrap();

        let resp = send(&h.router, post_empty(&format!("/toggle/{}", todo.id))).await;
        assert_redirects_home(&resp);
        assert!(h.store.find_by_id(&todo.id).unwrap().completed);

        let resp = send(&h.router, get(&format!("/api/todos/{}", todo.id))).await;
        assert_eq!(body_json(resp).await["completed"], true);
    }

    #[tokio::test]
    async fn toggle_unknown_id_redirects_by_default() {
        let h = harness();
        let resp = send(&h.router, post_empty("/toggle/does-not-exist")).await;
        assert_redirects_home(&resp);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_404_when_strict() {
        let mut config = TicklerConfig::default();
        config.todos.strict_toggle = true;
        let h = harness_with(config);

        let resp = send(&h.router, post_empty("/toggle/does-not-exist")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn get_unknown_todo_is_404_json() {
        let h = harness();
        let resp = send(&h.router, get("/api/todos/nope")).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(resp).await["error"], "Todo not found");
    }

    #[tokio::test]
    async fn admin_reports_counts() {
        let h = harness();
        let a = h.store.create("a").unwrap();
        h.store.create("b").unwrap();
        h.store.create("c").unwrap();
        h.store.toggle_completion(&a.id).unwrap();

        let resp = send(&h.router, get("/admin")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let stats = body_json(resp).await;
        assert_eq!(stats["totalTodos"], 3);
        assert_eq!(stats["completedTodos"], 1);
        assert_eq!(stats["pendingTodos"], 2);
    }

    #[tokio::test]
    async fn operator_endpoints_require_token_in_token_mode() {
        let mut config = TicklerConfig::default();
        config.gateway.auth.mode = AuthMode::Token;
        config.gateway.auth.token = Some("s3cret".to_string());
        let h = harness_with(config);

        assert_eq!(
            send(&h.router, get("/admin")).await.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            send(&h.router, post_empty("/notify")).await.status(),
            StatusCode::UNAUTHORIZED
        );

        let authed = Request::builder()
            .uri("/admin")
            .header(header::AUTHORIZATION, "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(&h.router, authed).await.status(), StatusCode::OK);

        // The browser routes stay open.
        assert_eq!(send(&h.router, get("/")).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn notify_with_nothing_pending_sends_nothing() {
        let h = harness();
        let resp = send(&h.router, post_empty("/notify")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["sent"], false);
        assert_eq!(body["pending"], 0);
        assert!(body["message"].is_string());
        assert!(h.sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn notify_dispatches_pending_digest() {
        let h = harness();
        h.store.create("Buy milk").unwrap();
        h.store.create("Call Bob").unwrap();

        let resp = send(&h.router, post_empty("/notify")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["sent"], true);
        assert_eq!(body["pending"], 2);

        let sent = h.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Buy milk") && sent[0].contains("Call Bob"));
    }

    #[tokio::test]
    async fn health_is_ok() {
        let h = harness();
        let resp = send(&h.router, get("/health")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }
}
