//! Routes for the todo API.
//!
//! | Method | Path | Handler |
//! |--------|------|---------|
//! | POST | /api/v1/todos | `create_todo` |
//! | GET | /api/v1/todos | `list_todos` |
//! | GET | /api/v1/todos/filter?status= | `filter_todos` |
//! | GET | /api/v1/todos/{id} | `get_todo` |
//! | PUT | /api/v1/todos/{id} | `update_todo` |
//! | DELETE | /api/v1/todos/{id} | `delete_todo` |
//! | GET | /api/v1/health | `health` |

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{
    create_todo, delete_todo, filter_todos, get_todo, health, list_todos, update_todo,
};
use crate::AppState;

pub const API_PREFIX: &str = "/api/v1";
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/filter", get(filter_todos))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/health", get(health));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use todo_core::{FileTodoRepository, MemoryTodoRepository, TodoRepository, TodoService};
    use tower::ServiceExt;

    fn app_with(repo: Arc<dyn TodoRepository>) -> Router {
        create_router(AppState::new(TodoService::new(repo)))
    }

    fn app() -> Router {
        app_with(Arc::new(MemoryTodoRepository::new()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn create(app: &Router, title: &str) -> Value {
        let (status, body) = send(app, Method::POST, "/api/v1/todos", Some(json!({ "title": title }))).await;
        assert_eq!(status, StatusCode::CREATED);
        body
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, body) = send(&app(), Method::GET, "/api/v1/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn create_then_get() {
        let app = app();
        let (status, created) = send(
            &app,
            Method::POST,
            "/api/v1/todos",
            Some(json!({ "title": "Buy milk", "description": "semi-skimmed", "due_date": "2025-05-01" })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "pending");
        assert_eq!(created["due_date"], "2025-05-01");
        assert_eq!(created["created_at"], created["updated_at"]);

        let id = created["id"].as_str().unwrap();
        let (status, fetched) = send(&app, Method::GET, &format!("/api/v1/todos/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_without_title_is_bad_request() {
        let (status, body) = send(&app(), Method::POST, "/api/v1/todos", Some(json!({ "title": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/todos")
            .header("content-type", "application/json")
            .body(Body::from("{ title"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let title = "a".repeat(MAX_BODY_BYTES + 10);
        let (status, body) = send(&app(), Method::POST, "/api/v1/todos", Some(json!({ "title": title }))).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], true);
    }

    #[tokio::test]
    async fn missing_content_type_is_unsupported_media_type() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/todos")
            .body(Body::from(r#"{"title":"Buy milk"}"#))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn update_applies_partial_fields() {
        let app = app();
        let created = create(&app, "Buy milk").await;
        let id = created["id"].as_str().unwrap();

        let (status, updated) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/todos/{}", id),
            Some(json!({ "status": "completed" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "completed");
        assert_eq!(updated["title"], "Buy milk");
        assert_eq!(updated["created_at"], created["created_at"]);
    }

    #[tokio::test]
    async fn unknown_status_in_update_is_bad_request() {
        let app = app();
        let created = create(&app, "a").await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/todos/{}", id),
            Some(json!({ "status": "done" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_todo_is_not_found() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/todos/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Todo not found");

        let (status, _) = send(&app, Method::PUT, "/api/v1/todos/nope", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/api/v1/todos/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let app = app();
        let created = create(&app, "a").await;
        let uri = format!("/api/v1/todos/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_and_filter() {
        let app = app();
        let a = create(&app, "a").await;
        create(&app, "b").await;
        send(
            &app,
            Method::PUT,
            &format!("/api/v1/todos/{}", a["id"].as_str().unwrap()),
            Some(json!({ "status": "in_progress" })),
        )
        .await;

        let (status, all) = send(&app, Method::GET, "/api/v1/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(all.as_array().unwrap().len(), 2);

        let (status, filtered) = send(&app, Method::GET, "/api/v1/todos/filter?status=in_progress", None).await;
        assert_eq!(status, StatusCode::OK);
        let filtered = filtered.as_array().unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0]["id"], a["id"]);

        let (status, none) = send(&app, Method::GET, "/api/v1/todos/filter?status=completed", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(none, json!([]));
    }

    #[tokio::test]
    async fn filter_requires_valid_status() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/api/v1/todos/filter", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Status parameter is required");

        let (status, _) = send(&app, Method::GET, "/api/v1/todos/filter?status=archived", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn storage_failure_is_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let repo = FileTodoRepository::open(data_dir.join("todos.json")).unwrap();
        let app = app_with(Arc::new(repo));
        let created = create(&app, "a").await;
        let uri = format!("/api/v1/todos/{}", created["id"].as_str().unwrap());

        std::fs::remove_dir_all(&data_dir).unwrap();

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], true);
        assert_eq!(body["message"], "internal storage error");
        assert!(!body.to_string().contains(data_dir.to_str().unwrap()));

        let (status, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }
}
