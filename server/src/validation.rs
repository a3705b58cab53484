// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Utc};
use common::{Category, CreateTaskPayload, UpdateTaskPayload};

use crate::error::StoreError;

/// A creation request that passed schema validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub category: Category,
    pub completed: bool,
}

/// Checks a creation payload and fills in the defaults
/// (empty description, `Other` category, not completed).
pub fn validate_new_task(payload: CreateTaskPayload) -> Result<NewTask, StoreError> {
    let title = match payload.title {
        Some(title) => validate_title(&title)?,
        None => return Err(StoreError::validation("Title is required.")),
    };
    let category = match payload.category {
        Some(category) => parse_category(&category)?,
        None => Category::default(),
    };

    Ok(NewTask {
        title,
        description: payload
            .description
            .map(|description| description.trim().to_string())
            .unwrap_or_default(),
        due_date: payload.due_date,
        category,
        completed: payload.completed.unwrap_or(false),
    })
}

/// The validated subset of an update request. `None` keeps the stored
/// value; `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub category: Option<Category>,
    pub completed: Option<bool>,
}

/// Checks the fields present in an update request. Needs no stored row, so
/// the store can apply the result in a single statement.
pub fn validate_update(payload: UpdateTaskPayload) -> Result<TaskChanges, StoreError> {
    let title = payload
        .title
        .map(|title| {
            let title = title.ok_or_else(|| StoreError::validation("Title cannot be null."))?;
            validate_title(&title)
        })
        .transpose()?;
    let category = payload
        .category
        .map(|category| {
            let category =
                category.ok_or_else(|| StoreError::validation("Category cannot be null."))?;
            parse_category(&category)
        })
        .transpose()?;
    let completed = payload
        .completed
        .map(|completed| {
            completed.ok_or_else(|| StoreError::validation("Completed cannot be null."))
        })
        .transpose()?;

    Ok(TaskChanges {
        title,
        description: payload
            .description
            .map(|description| description.map(|d| d.trim().to_string()).unwrap_or_default()),
        due_date: payload.due_date,
        category,
        completed,
    })
}

fn validate_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::validation("Title cannot be empty."));
    }
    Ok(title.to_string())
}

fn parse_category(category: &str) -> Result<Category, StoreError> {
    category
        .parse()
        .map_err(|err: common::UnknownCategory| StoreError::validation(format!("{err}.")))
}
