use std::sync::Arc;

use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::model::todo::{Status, Todo};
use crate::repository::{RepositoryError, TodoRepository};
use crate::service::dto::{NewTodo, TodoPatch};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("todo {0} not found")]
    NotFound(String),

    #[error("todo {0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            RepositoryError::AlreadyExists(id) => ServiceError::Conflict(id),
            other => ServiceError::Storage(other),
        }
    }
}

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

/// Business rules on top of a repository: id generation, validation and
/// partial-update merging.
pub struct TodoService<R: TodoRepository> {
    repo: R,
    clock: Arc<dyn Clock>,
}

impl<R: TodoRepository> TodoService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: R, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    pub fn create_todo(&self, input: NewTodo) -> Result<Todo> {
        let title = validate_title(&input.title)?;
        let description = input.description.filter(|d| !d.trim().is_empty());
        let todo = Todo::new(title, description, input.due_date, self.clock.now());

        let created = self.repo.create(todo)?;
        tracing::info!(id = %created.id, "todo created");
        Ok(created)
    }

    pub fn get_todo(&self, id: &str) -> Result<Todo> {
        Ok(self.repo.get(id)?)
    }

    /// All todos, oldest first.
    pub fn list_todos(&self) -> Result<Vec<Todo>> {
        let mut todos = self.repo.list()?;
        sort_todos(&mut todos);
        Ok(todos)
    }

    pub fn update_todo(&self, id: &str, patch: TodoPatch) -> Result<Todo> {
        let mut todo = self.repo.get(id)?;

        if let Some(title) = &patch.title {
            todo.title = validate_title(title)?;
        }
        if let Some(description) = patch.description {
            todo.description = Some(description).filter(|d| !d.trim().is_empty());
        }
        if let Some(status) = patch.status {
            todo.status = status;
        }
        if let Some(due) = patch.due_date {
            todo.due_date = Some(due);
        }

        let updated = self.repo.update(todo)?;
        tracing::info!(id = %updated.id, status = %updated.status, "todo updated");
        Ok(updated)
    }

    pub fn delete_todo(&self, id: &str) -> Result<()> {
        self.repo.delete(id)?;
        tracing::info!(id, "todo deleted");
        Ok(())
    }

    pub fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>> {
        let mut todos = self.repo.filter_by_status(status)?;
        sort_todos(&mut todos);
        tracing::debug!(%status, count = todos.len(), "filtered todos");
        Ok(todos)
    }
}

fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::Validation("title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::Validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
}
