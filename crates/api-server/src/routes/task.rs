//! Task API endpoints
//!
//! RESTful API for task CRUD operations. The handlers are thin adapters:
//! one repository call each, plus translation of domain errors into
//! transport responses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use task_core::task::{NewTask, Task, TaskPatch};
use task_core::Error;

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
}

impl From<UpdateTaskRequest> for TaskPatch {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            description: req.description,
            is_completed: req.is_completed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub description: String,
    pub is_completed: bool,
    pub created_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            description: task.description,
            is_completed: task.is_completed,
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type RouteError = (StatusCode, Json<ErrorResponse>);

fn route_error(status: StatusCode, error: impl Into<String>) -> RouteError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

/// Map a repository error onto a transport response. Both domain errors
/// are client-caused and must never surface as a 500.
fn map_error(err: Error) -> RouteError {
    match err {
        Error::TaskNotFound(id) => {
            route_error(StatusCode::NOT_FOUND, format!("Task {} not found", id))
        }
        Error::InvalidId(id) => {
            route_error(StatusCode::BAD_REQUEST, format!("Invalid task id: {}", id))
        }
        err => {
            tracing::error!("Storage error: {}", err);
            route_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tasks - List all tasks
async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskResponse>>, RouteError> {
    let tasks = state.tasks().get_tasks().await.map_err(map_error)?;
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// GET /task/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, RouteError> {
    let task = state.tasks().get_task(&id).await.map_err(map_error)?;
    match task {
        Some(task) => Ok(Json(TaskResponse::from(task))),
        None => Err(route_error(
            StatusCode::NOT_FOUND,
            format!("Task {} not found", id),
        )),
    }
}

/// POST /task - Create a new task
async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), RouteError> {
    let created = state
        .tasks()
        .create_task(NewTask::new(req.description))
        .await
        .map_err(map_error)?;
    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// PUT /task/{id} - Update a task (partial semantics: absent fields are
/// left untouched)
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, RouteError> {
    let updated = state
        .tasks()
        .update_task(&id, req.into())
        .await
        .map_err(map_error)?;
    Ok(Json(TaskResponse::from(updated)))
}

/// DELETE /task/{id} - Delete a task, returning its pre-deletion snapshot
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, RouteError> {
    let deleted = state.tasks().delete_task(&id).await.map_err(map_error)?;
    Ok(Json(TaskResponse::from(deleted)))
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/task", post(create_task))
        .route("/tasks", get(list_tasks))
        .route(
            "/task/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
