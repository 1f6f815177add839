//! JSON HTTP surface over a [`Board`].
//!
//! Every `/api` route acts on behalf of the owner named in the
//! [`OWNER_HEADER`] request header. Authenticating that identity is the job
//! of whatever sits in front of this server; requests without it get `401`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use taskboard::{Board, BoardError, TaskStore};
use taskboard_proto::{MoveTask, NewTask, OwnerId, TaskId, TaskPatch, TaskStatus, TaskView};

/// Header carrying the authenticated owner id.
pub const OWNER_HEADER: &str = "x-owner-id";

/// Builds the router for `board`.
pub fn router<S: TaskStore + 'static>(board: Arc<Board<S>>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route("/api/tasks/status/{status}", get(list_by_status::<S>))
        .route("/api/tasks/{id}", put(update_task::<S>).delete(delete_task::<S>))
        .route("/api/tasks/{id}/move", patch(move_task::<S>))
        .with_state(board)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error returned by a handler, rendered as `{"error": "..."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The owner header is missing or blank.
    #[error("missing or blank x-owner-id header")]
    Unauthenticated,

    /// The path names a task id that cannot exist.
    #[error("task not found: {0}")]
    UnknownTask(String),

    /// The request could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    /// The engine rejected the call.
    #[error(transparent)]
    Board(#[from] BoardError),
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::UnknownTask(_) | Self::Board(BoardError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Board(BoardError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Board(BoardError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Extractors
// ---------------------------------------------------------------------------

/// The calling owner, taken from [`OWNER_HEADER`].
#[derive(Debug, Clone)]
pub struct Owner(pub OwnerId);

impl<St: Send + Sync> FromRequestParts<St> for Owner {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;
        OwnerId::new(raw)
            .map(Self)
            .map_err(|_| ApiError::Unauthenticated)
    }
}

/// Parses a path id; anything that is not a task id is treated as absent.
fn task_id(raw: &str) -> Result<TaskId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::UnknownTask(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type BoardState<S> = State<Arc<Board<S>>>;

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn list_tasks<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    Ok(Json(board.list(&owner).await?))
}

async fn list_by_status<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
    Path(status): Path<String>,
) -> Result<Json<Vec<TaskView>>, ApiError> {
    let status: TaskStatus = status.parse().map_err(BoardError::Validation)?;
    Ok(Json(board.list_by_status(&owner, status).await?))
}

async fn create_task<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
    request: Result<Json<NewTask>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskView>), ApiError> {
    let Json(request) = request?;
    let view = board.create(&owner, request).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_task<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    patch: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let id = task_id(&id)?;
    let Json(patch) = patch?;
    Ok(Json(board.update(&owner, &id, patch).await?))
}

async fn move_task<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
    Path(id): Path<String>,
    request: Result<Json<MoveTask>, JsonRejection>,
) -> Result<Json<TaskView>, ApiError> {
    let id = task_id(&id)?;
    let Json(request) = request?;
    Ok(Json(board.move_task(&owner, &id, request).await?))
}

async fn delete_task<S: TaskStore>(
    State(board): BoardState<S>,
    Owner(owner): Owner,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = task_id(&id)?;
    board.delete(&owner, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
