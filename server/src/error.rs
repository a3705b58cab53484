// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use common::TaskId;

/// Failure of a store operation.
///
/// The three variants map one-to-one onto the HTTP error classes:
/// `Validation` is user-correctable (400), `NotFound` names a missing id
/// (404) and `Storage` wraps any infrastructure failure (500).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Task not found")]
    NotFound(TaskId),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl StoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
