// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use common::{CreateTaskPayload, Task, TaskId, UpdateTaskPayload};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::validation;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL CHECK (length(trim(title)) > 0),
        description TEXT NOT NULL DEFAULT '',
        due_date TIMESTAMP NULL,
        category TEXT NOT NULL DEFAULT 'Other'
            CHECK (category IN ('Work', 'Personal', 'Health', 'Education', 'Shopping', 'Finance', 'Other')),
        completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TIMESTAMP NOT NULL,
        updated_at TIMESTAMP NOT NULL
    );
"#;

const SELECT_TASK: &str = "SELECT id, title, description, due_date, category, completed, created_at, updated_at FROM tasks";

/// Establishes the database connection pool.
/// If the database does not exist, it creates it (and its parent directory).
/// It also ensures the `tasks` table has the correct schema.
pub async fn establish_connection_pool(database_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        ensure_parent_dir(database_url)?;
        info!("Creating database {}", database_url);
        Sqlite::create_database(database_url)
            .await
            .context("Failed to create database")?;
    } else {
        info!("Database already exists.");
    }

    let pool = SqlitePool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    init_schema(&pool).await?;
    Ok(pool)
}

/// A private in-memory database with the production schema.
///
/// Every connection to `sqlite::memory:` opens a distinct database, so the
/// pool is pinned to a single connection that is never recycled.
pub async fn establish_in_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .context("Failed to open in-memory database")?;

    init_schema(&pool).await?;
    Ok(pool)
}

async fn init_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(SCHEMA)
        .execute(pool)
        .await
        .context("Failed to create 'tasks' table")?;

    info!("'tasks' table is ready.");
    Ok(())
}

fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    if path.starts_with(':') {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Retrieves every task, newest-created first.
pub async fn list_tasks_from_db(pool: &SqlitePool) -> Result<Vec<Task>, StoreError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "{SELECT_TASK} ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await
    .context("Failed to retrieve tasks from DB")?;

    Ok(tasks)
}

pub async fn get_task_from_db(pool: &SqlitePool, task_id: TaskId) -> Result<Task, StoreError> {
    sqlx::query_as::<_, Task>(&format!("{SELECT_TASK} WHERE id = ?"))
        .bind(task_id)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("Failed to retrieve task with ID: {task_id}"))?
        .ok_or(StoreError::NotFound(task_id))
}

/// Validates the payload and inserts a new task into the database.
pub async fn create_task_in_db(
    pool: &SqlitePool,
    payload: CreateTaskPayload,
) -> Result<Task, StoreError> {
    let new_task = validation::validate_new_task(payload)?;
    let now = Utc::now();

    debug!(
        "Insert values: title={}, category={}, due_date={:?}, completed={}",
        new_task.title, new_task.category, new_task.due_date, new_task.completed
    );

    let id = sqlx::query(
        "INSERT INTO tasks (title, description, due_date, category, completed, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&new_task.title)
    .bind(&new_task.description)
    .bind(new_task.due_date)
    .bind(new_task.category)
    .bind(new_task.completed)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to insert task into DB")?
    .last_insert_rowid();

    Ok(Task {
        id,
        title: new_task.title,
        description: new_task.description,
        due_date: new_task.due_date,
        category: new_task.category,
        completed: new_task.completed,
        created_at: now,
        updated_at: now,
    })
}

/// Applies the supplied fields of `payload` to an existing task.
///
/// The merge is a single `UPDATE ... RETURNING` statement, so it takes the
/// write lock directly and concurrent updates queue on the busy timeout
/// instead of failing. An empty payload returns the stored task untouched.
pub async fn update_task_in_db(
    pool: &SqlitePool,
    task_id: TaskId,
    payload: UpdateTaskPayload,
) -> Result<Task, StoreError> {
    if payload.is_empty() {
        debug!("Empty update for task with ID: {}", task_id);
        return get_task_from_db(pool, task_id).await;
    }

    let changes = validation::validate_update(payload)?;
    let (clear_or_set_due_date, due_date) = match changes.due_date {
        Some(due_date) => (true, due_date),
        None => (false, None),
    };

    let updated = sqlx::query_as::<_, Task>(
        r#"
        UPDATE tasks SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            due_date = CASE WHEN ? THEN ? ELSE due_date END,
            category = COALESCE(?, category),
            completed = COALESCE(?, completed),
            updated_at = ?
        WHERE id = ?
        RETURNING id, title, description, due_date, category, completed, created_at, updated_at
        "#,
    )
    .bind(changes.title)
    .bind(changes.description)
    .bind(clear_or_set_due_date)
    .bind(due_date)
    .bind(changes.category)
    .bind(changes.completed)
    .bind(Utc::now())
    .bind(task_id)
    .fetch_optional(pool)
    .await
    .with_context(|| format!("Failed to update task with ID: {task_id}"))?
    .ok_or(StoreError::NotFound(task_id))?;

    debug!("Updated task with ID: {}", task_id);
    Ok(updated)
}

/// Permanently removes a task.
pub async fn delete_task_from_db(pool: &SqlitePool, task_id: TaskId) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to delete task with ID: {task_id}"))?;

    info!(
        "Deleted {} rows for task ID: {}",
        result.rows_affected(),
        task_id
    );

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(task_id));
    }
    Ok(())
}
