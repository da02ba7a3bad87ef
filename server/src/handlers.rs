use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use todo_core::{NewTodo, ServiceError, Status, Todo, TodoPatch};

use crate::error::ApiError;
use crate::{AppState, SharedService};

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub status: Option<String>,
}

// The file repository does blocking I/O under its write lock, so every
// service call leaves the async workers.
async fn with_service<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&SharedService) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.service.clone();
    let joined = tokio::task::spawn_blocking(move || f(service.as_ref())).await;
    match joined {
        Ok(result) => result.map_err(ApiError::from),
        Err(e) => {
            tracing::error!(error = %e, "service task failed");
            Err(ApiError::internal("internal error"))
        }
    }
}

pub async fn create_todo(
    State(state): State<AppState>,
    body: Result<Json<NewTodo>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body?;
    let todo = with_service(&state, move |s| s.create_todo(input)).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Todo>>, ApiError> {
    let todos = with_service(&state, |s| s.list_todos()).await?;
    Ok(Json(todos))
}

pub async fn filter_todos(
    State(state): State<AppState>,
    params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(params) = params?;
    let raw = params
        .status
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Status parameter is required"))?;
    let status: Status = raw
        .parse()
        .map_err(|e: todo_core::ParseStatusError| ApiError::bad_request(e.to_string()))?;

    let todos = with_service(&state, move |s| s.filter_by_status(status)).await?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let todo = with_service(&state, move |s| s.get_todo(&id)).await?;
    Ok(Json(todo))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(patch) = body?;
    let todo = with_service(&state, move |s| s.update_todo(&id, patch)).await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    with_service(&state, move |s| s.delete_todo(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> &'static str {
    "OK"
}
