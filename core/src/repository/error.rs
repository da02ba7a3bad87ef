use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("todo {0} not found")]
    NotFound(String),

    #[error("todo {0} already exists")]
    AlreadyExists(String),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt todo file {}: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}

pub type Result<T, E = RepositoryError> = std::result::Result<T, E>;
