use std::sync::Arc;

use crate::model::todo::{Status, Todo};
use crate::repository::error::Result;

/// Storage contract shared by every backend.
///
/// Every call is atomic with respect to every other call on the same
/// repository. Nothing spans two calls: a `list` followed by an `update` can
/// interleave with other writers. Records handed out are copies.
pub trait TodoRepository: Send + Sync {
    /// Fails with `AlreadyExists` if `todo.id` is taken.
    fn create(&self, todo: Todo) -> Result<Todo>;
    fn get(&self, id: &str) -> Result<Todo>;
    /// Order is unspecified.
    fn list(&self) -> Result<Vec<Todo>>;
    /// Replaces the stored record with the same id and refreshes `updated_at`.
    /// `created_at` is kept from the stored record.
    fn update(&self, todo: Todo) -> Result<Todo>;
    fn delete(&self, id: &str) -> Result<()>;
    fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for Arc<R> {
    fn create(&self, todo: Todo) -> Result<Todo> {
        (**self).create(todo)
    }

    fn get(&self, id: &str) -> Result<Todo> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<Todo>> {
        (**self).list()
    }

    fn update(&self, todo: Todo) -> Result<Todo> {
        (**self).update(todo)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>> {
        (**self).filter_by_status(status)
    }
}

impl<R: TodoRepository + ?Sized> TodoRepository for Box<R> {
    fn create(&self, todo: Todo) -> Result<Todo> {
        (**self).create(todo)
    }

    fn get(&self, id: &str) -> Result<Todo> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<Todo>> {
        (**self).list()
    }

    fn update(&self, todo: Todo) -> Result<Todo> {
        (**self).update(todo)
    }

    fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id)
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>> {
        (**self).filter_by_status(status)
    }
}
