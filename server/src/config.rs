use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use todo_core::{StorageConfig, StorageKind};

#[derive(Parser, Debug, Clone)]
#[command(name = "todo-server")]
#[command(about = "HTTP API for the todo tracker", long_about = None)]
pub struct ServerArgs {
    /// Storage backend: memory or json
    #[arg(long, env = "TODO_STORAGE", default_value = "memory")]
    pub storage: StorageKind,

    /// JSON file for the json backend (defaults to ~/.todo-app/todos.json)
    #[arg(long, env = "TODO_JSON_FILE")]
    pub json_file: Option<PathBuf>,

    #[arg(long, env = "TODO_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "TODO_PORT", default_value_t = 8080)]
    pub port: u16,
}

impl ServerArgs {
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::new(self.storage, self.json_file.clone())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {}", addr, e))
    }
}
