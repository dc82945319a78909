//! Task list state: cached tasks, filter, inline edit, and load status.
//!
//! The cache is only ever replaced wholesale by [`TaskListController::refresh`].
//! Mutations go to the server first and are followed by exactly one reload on
//! success; on failure nothing local changes.

use std::fmt;

use crate::api::{ApiError, TaskApi};
use crate::auth::{self, Route};
use crate::models::{Filter, Task};
use crate::session::{SessionError, SessionStore};

/// Unsaved title/description for the task being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    #[default]
    Viewing,
    Editing { id: i64, draft: Draft },
}

/// Outcome of the most recent list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing fetched yet.
    #[default]
    Idle,
    Ready,
    /// The last fetch failed; the cache still holds the previous list.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Toggle,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Toggle => "toggle",
            Action::Delete => "delete",
        };
        write!(f, "{verb}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// The server rejected the session; the user must log in again.
    #[error("session expired or missing")]
    Unauthorized,
    #[error("{0}")]
    Validation(String),
    #[error("task {0} is not in the list")]
    UnknownTask(i64),
    #[error("no task is being edited")]
    NotEditing,
    #[error("Failed to {action} task: {source}")]
    Action { action: Action, source: ApiError },
}

impl ControllerError {
    /// Where the view should go in response, if anywhere.
    pub fn redirect(&self) -> Option<Route> {
        match self {
            ControllerError::Unauthorized => Some(Route::Login { notice: None }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted,
    /// The server no longer had the task.
    AlreadyGone,
}

#[derive(Debug)]
pub struct TaskListController<A> {
    api: A,
    tasks: Vec<Task>,
    filter: Filter,
    edit: EditState,
    load_state: LoadState,
}

impl<A: TaskApi> TaskListController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            filter: Filter::default(),
            edit: EditState::default(),
            load_state: LoadState::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// The full cached list, in server order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Tasks matching the current filter, computed fresh from the cache.
    pub fn visible(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn task(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Initial fetch when the view opens.
    pub async fn mount(&mut self) -> Result<(), ControllerError> {
        self.refresh().await
    }

    /// Re-fetch the full list and replace the cache.
    ///
    /// Only an auth failure is returned. Other failures are logged and recorded
    /// in [`LoadState::Failed`], leaving the previous cache in place.
    pub async fn refresh(&mut self) -> Result<(), ControllerError> {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "task list loaded");
                self.tasks = tasks;
                self.load_state = LoadState::Ready;
                Ok(())
            }
            Err(ApiError::Auth) => {
                tracing::warn!("task list rejected: not authenticated");
                Err(ControllerError::Unauthorized)
            }
            Err(e) => {
                tracing::error!("Failed to load tasks: {e}");
                self.load_state = LoadState::Failed(e.to_string());
                Ok(())
            }
        }
    }

    pub async fn create(&mut self, title: &str, description: &str) -> Result<(), ControllerError> {
        if title.trim().is_empty() {
            return Err(ControllerError::Validation("title is required".to_string()));
        }
        self.api
            .create_task(title, description)
            .await
            .map_err(|e| action_failed(Action::Create, e))?;
        self.refresh().await
    }

    /// Flip the completion flag of a cached task.
    pub async fn toggle(&mut self, id: i64) -> Result<(), ControllerError> {
        let completed = self
            .task(id)
            .map(|t| t.completed)
            .ok_or(ControllerError::UnknownTask(id))?;
        self.api
            .toggle_task(id, !completed)
            .await
            .map_err(|e| action_failed(Action::Toggle, e))?;
        self.refresh().await
    }

    /// The confirmation question shown before deleting `id`.
    pub fn delete_prompt(&self, id: i64) -> String {
        match self.task(id) {
            Some(t) => format!("Delete this task? \"{}\"", t.title),
            None => "Delete this task?".to_string(),
        }
    }

    /// Delete after `confirm` approves. A task the server no longer has counts as deleted.
    pub async fn delete(
        &mut self,
        id: i64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<DeleteOutcome, ControllerError> {
        if !confirm(&self.delete_prompt(id)) {
            return Ok(DeleteOutcome::Declined);
        }

        let outcome = match self.api.delete_task(id).await {
            Ok(()) => DeleteOutcome::Deleted,
            Err(ApiError::NotFound) => {
                tracing::warn!(id, "task already deleted on server");
                DeleteOutcome::AlreadyGone
            }
            Err(e) => return Err(action_failed(Action::Delete, e)),
        };
        self.refresh().await?;
        Ok(outcome)
    }

    /// Open the inline editor on `id`, discarding any other open draft.
    pub fn begin_edit(&mut self, id: i64) -> Result<Draft, ControllerError> {
        let task = self.task(id).ok_or(ControllerError::UnknownTask(id))?;
        let draft = Draft {
            title: task.title.clone(),
            description: task.description.clone(),
        };
        if let EditState::Editing { id: prev, .. } = self.edit
            && prev != id
        {
            tracing::debug!(discarded = prev, id, "replacing open draft");
        }
        self.edit = EditState::Editing {
            id,
            draft: draft.clone(),
        };
        Ok(draft)
    }

    pub fn edit_draft(
        &mut self,
        title: Option<&str>,
        description: Option<&str>,
    ) -> Result<(), ControllerError> {
        let EditState::Editing { draft, .. } = &mut self.edit else {
            return Err(ControllerError::NotEditing);
        };
        if let Some(t) = title {
            draft.title = t.to_string();
        }
        if let Some(d) = description {
            draft.description = d.to_string();
        }
        Ok(())
    }

    /// Send the draft, reload, then close the editor.
    ///
    /// On failure the draft stays open so the user can retry or cancel.
    pub async fn save_edit(&mut self) -> Result<(), ControllerError> {
        let EditState::Editing { id, draft } = &self.edit else {
            return Err(ControllerError::NotEditing);
        };
        let (id, draft) = (*id, draft.clone());
        if draft.title.trim().is_empty() {
            return Err(ControllerError::Validation("title is required".to_string()));
        }
        self.api
            .update_task(id, &draft.title, &draft.description)
            .await
            .map_err(|e| action_failed(Action::Update, e))?;
        let reloaded = self.refresh().await;
        self.edit = EditState::Viewing;
        reloaded
    }

    /// Close the editor without contacting the server.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Viewing;
    }

    /// Clear the session and drop everything cached for it.
    pub fn logout(&mut self, session: &dyn SessionStore) -> Result<Route, SessionError> {
        let route = auth::logout(session)?;
        self.tasks.clear();
        self.edit = EditState::Viewing;
        self.load_state = LoadState::Idle;
        Ok(route)
    }
}

fn action_failed(action: Action, source: ApiError) -> ControllerError {
    if source.is_auth() {
        return ControllerError::Unauthorized;
    }
    tracing::warn!("Failed to {action} task: {source}");
    ControllerError::Action { action, source }
}
