// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::future::Future;

use common::{CreateTaskPayload, MessageBody, Task, TaskId, UpdateTaskPayload};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::config::ClientConfig;

/// Coarse classification of an [`ApiError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input, correctable by the user.
    Validation,
    /// The referenced task does not exist.
    NotFound,
    /// Server or network unavailable.
    Infrastructure,
}

/// Failure of a single API call. Calls are never retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::Validation(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            _ => Self::Server {
                status: status.as_u16(),
                message,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Server { .. } | Self::Transport(_) => ErrorKind::Infrastructure,
        }
    }
}

/// The five task operations, one network round-trip each.
pub trait TaskApi {
    fn list_tasks(&self) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    fn get_task(&self, task_id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn create_task(
        &self,
        payload: &CreateTaskPayload,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn update_task(
        &self,
        task_id: TaskId,
        payload: &UpdateTaskPayload,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    fn delete_task(&self, task_id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// HTTP implementation of [`TaskApi`] on top of `reqwest`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// `base_url` is the API root, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.api_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/tasks", self.base_url)
    }

    fn task_url(&self, task_id: TaskId) -> String {
        format!("{}/tasks/{}", self.base_url, task_id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(|err| {
            error!("Error in {}: {}", action, err);
            ApiError::Transport(err)
        })?;

        let status = response.status();
        debug!("{} responded with {}", action, status);
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = match response.json::<MessageBody>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        let err = ApiError::from_status(status, message);
        error!("Error in {}: {}", action, err);
        Err(err)
    }
}

impl TaskApi for ApiClient {
    async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        self.send(self.http.get(self.tasks_url()), "list_tasks").await
    }

    async fn get_task(&self, task_id: TaskId) -> Result<Task, ApiError> {
        self.send(self.http.get(self.task_url(task_id)), "get_task")
            .await
    }

    async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, ApiError> {
        self.send(self.http.post(self.tasks_url()).json(payload), "create_task")
            .await
    }

    async fn update_task(
        &self,
        task_id: TaskId,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, ApiError> {
        self.send(
            self.http.put(self.task_url(task_id)).json(payload),
            "update_task",
        )
        .await
    }

    async fn delete_task(&self, task_id: TaskId) -> Result<(), ApiError> {
        let _: MessageBody = self
            .send(self.http.delete(self.task_url(task_id)), "delete_task")
            .await?;
        Ok(())
    }
}
