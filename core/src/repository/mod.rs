pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::RepositoryError;
pub use file::FileTodoRepository;
pub use memory::MemoryTodoRepository;
pub use traits::TodoRepository;
