// Copyright (c) 2025 sbksba
//
// This software is licensed under the terms of the MIT License.
// See the LICENSE file in the project root for the full license text.
use chrono::{DateTime, Utc};
use common::{CreateTaskPayload, Task, TaskId, UpdateTaskPayload};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::api::{ApiError, TaskApi};
use crate::filter::{CategoryFilter, StatusFilter, TaskFilter};
use crate::notification::{Notification, Notifier};

#[derive(Debug, Default)]
struct ViewState {
    tasks: Vec<Task>,
    loading: bool,
    filter: TaskFilter,
    editing: Option<TaskId>,
}

/// Client-side owner of the task list.
///
/// The local list only changes after the server answered, and always takes
/// the record the server returned. Actions that talk to the server run one at
/// a time in the order they were issued, so responses are reconciled in
/// order. Filtering and edit mode are purely local.
pub struct TaskController<A> {
    api: A,
    state: RwLock<ViewState>,
    notifier: Notifier,
    actions: Mutex<()>,
}

impl<A: TaskApi> TaskController<A> {
    /// A controller that has not loaded yet; it reports `is_loading()`
    /// until the first [`load`](Self::load) settles.
    pub fn new(api: A) -> Self {
        Self::with_notifier(api, Notifier::new())
    }

    pub fn with_notifier(api: A, notifier: Notifier) -> Self {
        Self {
            api,
            state: RwLock::new(ViewState {
                loading: true,
                ..Default::default()
            }),
            notifier,
            actions: Mutex::new(()),
        }
    }

    /// Creates the controller and performs the initial load.
    pub async fn init(api: A) -> Self {
        let controller = Self::new(api);
        if let Err(err) = controller.load().await {
            debug!("Initial load failed, starting with an empty list: {}", err);
        }
        controller
    }

    /// Replaces the local list with the server's.
    pub async fn load(&self) -> Result<(), ApiError> {
        let _guard = self.actions.lock().await;
        self.state.write().loading = true;

        let result = self.api.list_tasks().await;
        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(tasks) => {
                info!("Loaded {} tasks.", tasks.len());
                state.tasks = tasks;
                Ok(())
            }
            Err(err) => {
                drop(state);
                error!("Error fetching tasks: {}", err);
                self.notifier.error("Failed to load tasks");
                Err(err)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    /// The full, unfiltered list, newest first.
    pub fn tasks(&self) -> Vec<Task> {
        self.state.read().tasks.clone()
    }

    /// The list as seen through the current filter.
    pub fn visible_tasks(&self) -> Vec<Task> {
        let state = self.state.read();
        state.filter.apply(&state.tasks)
    }

    /// Open tasks whose due date is before `now`, in list order.
    pub fn overdue_tasks(&self, now: DateTime<Utc>) -> Vec<Task> {
        self.state
            .read()
            .tasks
            .iter()
            .filter(|task| task.is_overdue(now))
            .cloned()
            .collect()
    }

    pub fn filter(&self) -> TaskFilter {
        self.state.read().filter.clone()
    }

    pub fn set_search_query(&self, query: impl Into<String>) {
        self.state.write().filter.query = query.into();
    }

    pub fn set_category_filter(&self, category: CategoryFilter) {
        self.state.write().filter.category = category;
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.state.write().filter.status = status;
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub fn dismiss_notification(&self) {
        self.notifier.dismiss();
    }

    pub async fn add_task(&self, payload: CreateTaskPayload) -> Result<Task, ApiError> {
        let _guard = self.actions.lock().await;
        match self.api.create_task(&payload).await {
            Ok(task) => {
                debug!("Task {} created.", task.id);
                upsert(&mut self.state.write().tasks, task.clone());
                self.notifier.success("Task added successfully!");
                Ok(task)
            }
            Err(err) => {
                error!("Error adding task: {}", err);
                self.notifier.error("Failed to add task");
                Err(err)
            }
        }
    }

    /// Sends a partial update and, on success, leaves edit mode if this task
    /// was being edited.
    pub async fn update_task(
        &self,
        task_id: TaskId,
        payload: UpdateTaskPayload,
    ) -> Result<Task, ApiError> {
        let _guard = self.actions.lock().await;
        match self.api.update_task(task_id, &payload).await {
            Ok(task) => {
                let mut state = self.state.write();
                upsert(&mut state.tasks, task.clone());
                if state.editing == Some(task_id) {
                    state.editing = None;
                }
                drop(state);
                self.notifier.success("Task updated successfully!");
                Ok(task)
            }
            Err(err) => {
                error!("Error updating task {}: {}", task_id, err);
                self.notifier.error("Failed to update task");
                Err(err)
            }
        }
    }

    pub async fn toggle_complete(&self, task_id: TaskId, completed: bool) -> Result<Task, ApiError> {
        let _guard = self.actions.lock().await;
        let payload = UpdateTaskPayload::default().completed(completed);
        match self.api.update_task(task_id, &payload).await {
            Ok(task) => {
                upsert(&mut self.state.write().tasks, task.clone());
                self.notifier.success(if task.completed {
                    "Task marked as completed!"
                } else {
                    "Task marked as incomplete!"
                });
                Ok(task)
            }
            Err(err) => {
                error!("Error updating status of task {}: {}", task_id, err);
                self.notifier.error("Failed to update task status");
                Err(err)
            }
        }
    }

    pub async fn delete_task(&self, task_id: TaskId) -> Result<(), ApiError> {
        let _guard = self.actions.lock().await;
        match self.api.delete_task(task_id).await {
            Ok(()) => {
                let mut state = self.state.write();
                state.tasks.retain(|task| task.id != task_id);
                if state.editing == Some(task_id) {
                    state.editing = None;
                }
                drop(state);
                self.notifier.success("Task deleted successfully!");
                Ok(())
            }
            Err(err) => {
                error!("Error deleting task {}: {}", task_id, err);
                self.notifier.error("Failed to delete task");
                Err(err)
            }
        }
    }

    /// Puts `task_id` in edit mode, replacing any previous target.
    /// Returns the task being edited, or `None` if it is not in the list.
    pub fn start_edit(&self, task_id: TaskId) -> Option<Task> {
        let mut state = self.state.write();
        let task = state.tasks.iter().find(|task| task.id == task_id).cloned()?;
        state.editing = Some(task_id);
        Some(task)
    }

    pub fn cancel_edit(&self) {
        self.state.write().editing = None;
    }

    pub fn editing(&self) -> Option<TaskId> {
        self.state.read().editing
    }

    pub fn editing_task(&self) -> Option<Task> {
        let state = self.state.read();
        let editing = state.editing?;
        state.tasks.iter().find(|task| task.id == editing).cloned()
    }
}

// Replaces the task with the same id, or inserts it keeping newest-first
// order.
fn upsert(tasks: &mut Vec<Task>, task: Task) {
    if let Some(existing) = tasks.iter_mut().find(|existing| existing.id == task.id) {
        *existing = task;
        return;
    }
    let position = tasks
        .iter()
        .position(|existing| (existing.created_at, existing.id) < (task.created_at, task.id))
        .unwrap_or(tasks.len());
    tasks.insert(position, task);
}
