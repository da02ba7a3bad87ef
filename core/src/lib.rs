pub mod clock;
pub mod config;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{default_json_path, StorageConfig, StorageKind};
pub use model::todo::{ParseStatusError, Status, Todo};
pub use repository::{FileTodoRepository, MemoryTodoRepository, RepositoryError, TodoRepository};
pub use service::dto::{NewTodo, TodoPatch};
pub use service::todo_service::{ServiceError, TodoService};
pub use time::parse_due_date;
