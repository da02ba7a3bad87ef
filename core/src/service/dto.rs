use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::todo::{due_date, Status};

/// Fields a caller may supply when creating a todo.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NewTodo {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "due_date::deserialize"
    )]
    pub due_date: Option<NaiveDate>,
}

/// Partial update. Absent fields are left alone.
///
/// An empty `description` clears it; an empty `due_date` counts as absent.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TodoPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "due_date::deserialize"
    )]
    pub due_date: Option<NaiveDate>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.due_date.is_none()
    }
}
