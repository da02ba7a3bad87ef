use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::clock::Clock;
use crate::repository::{FileTodoRepository, MemoryTodoRepository, RepositoryError, TodoRepository};

const DATA_DIR_NAME: &str = ".todo-app";
const DEFAULT_FILE_NAME: &str = "todos.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    Memory,
    Json,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageKind::Memory),
            "json" | "file" => Ok(StorageKind::Json),
            other => Err(format!("unknown storage type '{}' (expected memory or json)", other)),
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Memory => f.write_str("memory"),
            StorageKind::Json => f.write_str("json"),
        }
    }
}

/// Which backend to build, decided once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    JsonFile { path: PathBuf },
}

impl StorageConfig {
    pub fn new(kind: StorageKind, json_file: Option<PathBuf>) -> Self {
        match kind {
            StorageKind::Memory => StorageConfig::Memory,
            StorageKind::Json => StorageConfig::JsonFile {
                path: json_file.unwrap_or_else(default_json_path),
            },
        }
    }

    pub fn open(&self, clock: Arc<dyn Clock>) -> Result<Arc<dyn TodoRepository>, RepositoryError> {
        let repo: Arc<dyn TodoRepository> = match self {
            StorageConfig::Memory => Arc::new(MemoryTodoRepository::with_clock(clock)),
            StorageConfig::JsonFile { path } => {
                Arc::new(FileTodoRepository::open_with_clock(path.clone(), clock)?)
            }
        };
        Ok(repo)
    }
}

/// `~/.todo-app/todos.json`, or `todos.json` in the working directory when
/// there is no home directory.
pub fn default_json_path() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(DATA_DIR_NAME).join(DEFAULT_FILE_NAME),
        None => PathBuf::from(DEFAULT_FILE_NAME),
    }
}
