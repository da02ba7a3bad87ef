use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::model::todo::{Status, Todo};
use crate::repository::error::{RepositoryError, Result};
use crate::repository::memory::TodoMap;
use crate::repository::traits::TodoRepository;

/// Repository that mirrors its whole collection into a single JSON file.
///
/// The file holds one object mapping id to record. It is read once in
/// [`FileTodoRepository::open`] and rewritten in full after every mutation,
/// while the write lock is still held. If the rewrite fails the in-memory
/// change is undone, so memory never runs ahead of disk.
pub struct FileTodoRepository {
    file_path: PathBuf,
    todos: RwLock<TodoMap>,
    clock: Arc<dyn Clock>,
}

impl FileTodoRepository {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with_clock(path, Arc::new(SystemClock))
    }

    pub fn open_with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Result<Self> {
        let file_path = path.into();
        if let Some(dir) = file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| RepositoryError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let todos = match file_path.try_exists() {
            Ok(true) => read_todos(&file_path)?,
            Ok(false) => HashMap::new(),
            Err(source) => {
                return Err(RepositoryError::Io {
                    path: file_path,
                    source,
                })
            }
        };
        tracing::debug!(path = %file_path.display(), count = todos.len(), "loaded todo file");

        Ok(FileTodoRepository {
            file_path,
            todos: RwLock::new(TodoMap::from_map(todos)),
            clock,
        })
    }

    fn io_error(&self, source: io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.file_path.clone(),
            source,
        }
    }

    // Writes a sibling temp file and renames it into place so the target is
    // either the old or the new collection, never a prefix of one.
    fn write_todos(&self, todos: &TodoMap) -> Result<()> {
        let ordered: BTreeMap<&str, &Todo> = todos
            .as_map()
            .iter()
            .map(|(id, todo)| (id.as_str(), todo))
            .collect();

        let tmp_path = tmp_path_for(&self.file_path);
        let write = || -> io::Result<()> {
            let file = File::create(&tmp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, &ordered)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&tmp_path, &self.file_path)
        };

        write().map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            self.io_error(e)
        })
    }
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "todos.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_todos(path: &Path) -> Result<HashMap<String, Todo>> {
    let content = fs::read_to_string(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(HashMap::new());
    }

    let corrupt = |reason: String| RepositoryError::CorruptState {
        path: path.to_path_buf(),
        reason,
    };
    let todos: HashMap<String, Todo> =
        serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;

    if let Some((key, todo)) = todos.iter().find(|(key, todo)| **key != todo.id) {
        return Err(corrupt(format!(
            "entry '{}' holds record with id '{}'",
            key, todo.id
        )));
    }
    Ok(todos)
}

impl TodoRepository for FileTodoRepository {
    fn create(&self, todo: Todo) -> Result<Todo> {
        let mut todos = self.todos.write();
        let created = todos.insert_new(todo)?;
        if let Err(e) = self.write_todos(&todos) {
            todos.forget(&created.id);
            return Err(e);
        }
        Ok(created)
    }

    fn get(&self, id: &str) -> Result<Todo> {
        self.todos.read().get(id)
    }

    fn list(&self) -> Result<Vec<Todo>> {
        Ok(self.todos.read().list())
    }

    fn update(&self, todo: Todo) -> Result<Todo> {
        let mut todos = self.todos.write();
        let (stored, previous) = todos.replace(todo, self.clock.now())?;
        if let Err(e) = self.write_todos(&todos) {
            todos.restore(previous);
            return Err(e);
        }
        Ok(stored)
    }

    fn delete(&self, id: &str) -> Result<()> {
        let mut todos = self.todos.write();
        let removed = todos.remove(id)?;
        if let Err(e) = self.write_todos(&todos) {
            todos.restore(removed);
            return Err(e);
        }
        Ok(())
    }

    fn filter_by_status(&self, status: Status) -> Result<Vec<Todo>> {
        Ok(self.todos.read().filter_by_status(status))
    }
}
