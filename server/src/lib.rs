pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use todo_core::{TodoRepository, TodoService};

pub type SharedService = TodoService<Arc<dyn TodoRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SharedService>,
}

impl AppState {
    pub fn new(service: SharedService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

pub use config::ServerArgs;
pub use error::ApiError;
pub use routes::create_router;
