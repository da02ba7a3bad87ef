use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::model::todo::{Status, Todo};
use crate::repository::error::{RepositoryError, Result};
use crate::repository::traits::TodoRepository;

/// The keyed collection both backends keep in memory.
///
/// Mutators hand back whatever is needed to undo them so the file backend
/// can roll back when persisting fails.
#[derive(Debug, Default)]
pub(crate) struct TodoMap {
    todos: HashMap<String, Todo>,
}

impl TodoMap {
    pub(crate) fn from_map(todos: HashMap<String, Todo>) -> Self {
        Self { todos }
    }

    pub(crate) fn as_map(&self) -> &HashMap<String, Todo> {
        &self.todos
    }

    pub(crate) fn get(&self, id: &str) -> Result<Todo> {
        self.todos
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    pub(crate) fn list(&self) -> Vec<Todo> {
        self.todos.values().cloned().collect()
    }

    pub(crate) fn filter_by_status(&self, status: Status) -> Vec<Todo> {
        self.todos
            .values()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    pub(crate) fn insert_new(&mut self, todo: Todo) -> Result<Todo> {
        if self.todos.contains_key(&todo.id) {
            return Err(RepositoryError::AlreadyExists(todo.id));
        }
        self.todos.insert(todo.id.clone(), todo.clone());
        Ok(todo)
    }

    /// Returns `(stored, previous)`.
    pub(crate) fn replace(&mut self, mut todo: Todo, now: DateTime<Utc>) -> Result<(Todo, Todo)> {
        let Some(previous) = self.todos.get(&todo.id) else {
            return Err(RepositoryError::NotFound(todo.id));
        };
        todo.created_at = previous.created_at;
        todo.updated_at = now.max(previous.updated_at);

        let previous = self
            .todos
            .insert(todo.id.clone(), todo.clone())
            .unwrap_or_else(|| todo.clone());
        Ok((todo, previous))
    }

    pub(crate) fn remove(&mut self, id: &str) -> Result<Todo> {
        self.todos
            .remove(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    /// Puts a record back exactly as given, bypassing the create/update rules.
    pub(crate) fn restore(&mut self, todo: Todo) {
        self.todos.insert(todo.id.clone(), todo);
    }

    pub(crate) fn forget(&mut self, id: &str) {
        self.todos.remove(id);
    }
}

/// Non-persistent repository. Everything is lost when the process exits.
pub struct MemoryTodoRepository {
    todos: RwLock<TodoMap>,
    clock: Arc<dyn Clock>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            todos: RwLock::new(TodoMap::default()),
            clock,
        }
    }
}

impl Default for MemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoRepository for MemoryTodoRepository {
    fn create(&self, todo: Todo) -> Result<Todo> {
        self.todos.write().insert_new(todo)
    }

    fn get(&self, id: &str) -> Result<Todo> {
        self.todos.read().get(id)
    }

    fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.read().list())
    }

    fn update(&self, todo: Todo) -> Result<Todo> {
        let mut todos = self.todos.write();
        let (stored, _) = todos.replace(todo, self.clock.now())?;
        Ok(stored)
    }

    fn delete(&self, id: &str) -> Result<()> {
        self.todos.write().remove(id).map(|_| ())
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>> {
        Ok(self.todos.read().filter_by_status(status))
    }
}
