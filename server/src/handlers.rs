// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::any::Any;

use crate::database;
use crate::error::StoreError;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Json, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::{CreateTaskPayload, MessageBody, Task, TaskId, UpdateTaskPayload};
use sqlx::SqlitePool;
use tracing::{debug, error, info};

const TASK_NOT_FOUND: &str = "Task not found";

/// Handler for listing every task, newest first.
pub async fn list_tasks(State(pool): State<SqlitePool>) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = database::list_tasks_from_db(&pool).await?;
    info!("Successfully retrieved {} tasks.", tasks.len());
    Ok(Json(tasks))
}

/// Handler for fetching a single task.
pub async fn get_task(
    State(pool): State<SqlitePool>,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<Task>, AppError> {
    let task_id = task_id_from_path(task_id)?;
    debug!("Fetching task with ID: {}", task_id);

    let task = database::get_task_from_db(&pool, task_id).await?;
    Ok(Json(task))
}

/// Handler for creating a new task.
pub async fn create_task(
    State(pool): State<SqlitePool>,
    payload: Result<Json<CreateTaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    let Json(payload) = payload?;
    debug!("Received request to create task: {:?}", payload.title);

    let new_task = database::create_task_in_db(&pool, payload).await?;
    info!("Task created successfully with ID: {}", new_task.id);

    // Return a 201 Created status with the new task as JSON.
    Ok((StatusCode::CREATED, Json(new_task)))
}

/// Handler for partially updating a task. Only the keys present in the body
/// are applied.
pub async fn update_task(
    State(pool): State<SqlitePool>,
    task_id: Result<Path<TaskId>, PathRejection>,
    payload: Result<Json<UpdateTaskPayload>, JsonRejection>,
) -> Result<Json<Task>, AppError> {
    let task_id = task_id_from_path(task_id)?;
    let Json(payload) = payload?;
    debug!("Received update for task with ID {}: {:?}", task_id, payload);

    let task = database::update_task_in_db(&pool, task_id, payload).await?;
    info!("Task with ID {} updated successfully.", task_id);
    Ok(Json(task))
}

/// Handler for deleting a task by ID.
pub async fn delete_task(
    State(pool): State<SqlitePool>,
    task_id: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<MessageBody>, AppError> {
    let task_id = task_id_from_path(task_id)?;
    debug!("Attempting to delete task with ID: {}", task_id);

    database::delete_task_from_db(&pool, task_id).await?;
    info!("Task with ID {} deleted successfully.", task_id);
    Ok(Json(MessageBody::new("Task deleted")))
}

/// Fallback for paths outside the task resource.
pub async fn route_not_found() -> AppError {
    AppError::new(StatusCode::NOT_FOUND, "Route not found")
}

/// Last-resort boundary for panics raised while handling a request.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Request handler panicked: {}", detail);

    AppError::new(StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!").into_response()
}

// A non-numeric id can never name a stored task.
fn task_id_from_path(task_id: Result<Path<TaskId>, PathRejection>) -> Result<TaskId, AppError> {
    task_id
        .map(|Path(task_id)| task_id)
        .map_err(|rejection| {
            debug!("Rejected task path: {}", rejection.body_text());
            AppError::new(StatusCode::NOT_FOUND, TASK_NOT_FOUND)
        })
}

// --- Custom Error Handling ---

/// Error returned by every handler; rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct AppError {
    code: StatusCode,
    message: String,
}

impl AppError {
    fn new(code: StatusCode, message: &str) -> Self {
        Self {
            code,
            message: message.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(message) => {
                error!("Validation failed: {}", message);
                Self::new(StatusCode::BAD_REQUEST, &message)
            }
            StoreError::NotFound(task_id) => {
                error!("Task with ID {} not found.", task_id);
                Self::new(StatusCode::NOT_FOUND, TASK_NOT_FOUND)
            }
            // Log the internal error for debugging, never expose it.
            StoreError::Storage(err) => {
                error!("Internal server error: {:?}", err);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "An internal error occurred.")
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, &rejection.body_text())
    }
}

/// Allows Axum to convert our `AppError` into an HTTP `Response`.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            "Responding with error: status_code={}, message={}",
            self.code.as_u16(),
            self.message
        );
        (self.code, Json(MessageBody::new(self.message))).into_response()
    }
}
