// SQLite-backed task store

use crate::error::StorageError;
use crate::filter::TaskFilter;
use crate::models::Task;
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CURRENT_VERSION: u32 = 1;

/// Durable CRUD over the `tasks` table
///
/// The store is the only component that touches the database. Writes take
/// `&mut self`, so a single store value never runs two statements at once;
/// across processes the lock file next to the database keeps a single writer.
pub struct TaskStore {
    path: Option<PathBuf>,
    db: Connection,
    lock: Option<File>,
}

impl TaskStore {
    /// Open or create a store at the given database path
    ///
    /// Parent directories are created as needed. Fails with
    /// `StorageError::Locked` if another process has the store open.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let lock = Self::acquire_lock(&path)?;
        let db = Connection::open(&path)?;

        let store = Self {
            path: Some(path),
            db,
            lock: Some(lock),
        };
        store.init()?;

        info!(path = ?store.path, "Opened task store");
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as the value
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let store = Self {
            path: None,
            db: Connection::open_in_memory()?,
            lock: None,
        };
        store.init()?;
        Ok(store)
    }

    /// Close the connection and release the store lock
    pub fn close(self) -> Result<(), StorageError> {
        let Self { path, db, lock } = self;

        db.close().map_err(|(_, e)| e)?;
        if let Some(lock) = lock {
            FileExt::unlock(&lock)?;
        }

        debug!(?path, "Closed task store");
        Ok(())
    }

    /// Database file path, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut lock_path = path.as_os_str().to_owned();
        lock_path.push(".lock");
        PathBuf::from(lock_path)
    }

    fn acquire_lock(path: &Path) -> Result<File, StorageError> {
        let lock_path = Self::lock_path(path);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(file),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Err(StorageError::Locked(path.to_path_buf())),
            Err(e) => Err(e.into()),
        }
    }

    fn init(&self) -> Result<(), StorageError> {
        let found: u32 = self
            .db
            .pragma_query_value(None, "user_version", |row| row.get(0))?;

        if found > CURRENT_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found,
                supported: CURRENT_VERSION,
            });
        }

        self.create_schema()?;

        if found < CURRENT_VERSION {
            self.db.pragma_update(None, "user_version", CURRENT_VERSION)?;
        }

        Ok(())
    }

    fn create_schema(&self) -> Result<(), StorageError> {
        debug!("Creating database schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                is_completed INTEGER NOT NULL DEFAULT 0
            );
            "#,
        )?;

        Ok(())
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Every task, in id order
    pub fn get_all(&self) -> Result<Vec<Task>, StorageError> {
        self.list(TaskFilter::All)
    }

    pub fn get_completed(&self) -> Result<Vec<Task>, StorageError> {
        self.list(TaskFilter::Completed)
    }

    pub fn get_pending(&self) -> Result<Vec<Task>, StorageError> {
        self.list(TaskFilter::Pending)
    }

    /// List tasks matching a filter
    pub fn list(&self, filter: TaskFilter) -> Result<Vec<Task>, StorageError> {
        let query = format!(
            "SELECT id, description, is_completed FROM tasks{} ORDER BY id",
            filter.to_sql()
        );

        let mut stmt = self.db.prepare(&query)?;
        let rows = stmt.query_map([], task_from_row)?;

        let mut results = Vec::new();
        for row_result in rows {
            results.push(row_result?);
        }

        debug!(%filter, count = results.len(), "list: loaded tasks");
        Ok(results)
    }

    /// Get a task by id
    pub fn get(&self, id: i64) -> Result<Option<Task>, StorageError> {
        let task = self
            .db
            .query_row(
                "SELECT id, description, is_completed FROM tasks WHERE id = ?1",
                [id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a pending task, returning its generated id
    pub fn insert(&mut self, description: &str) -> Result<i64, StorageError> {
        self.db.execute(
            "INSERT INTO tasks (description, is_completed) VALUES (?1, 0)",
            [description],
        )?;

        let id = self.db.last_insert_rowid();
        debug!(id, "insert: created task");
        Ok(id)
    }

    /// Persist description and completion of an existing task
    pub fn update(&mut self, task: &Task) -> Result<(), StorageError> {
        let changed = self.db.execute(
            "UPDATE tasks SET description = ?1, is_completed = ?2 WHERE id = ?3",
            params![task.description, task.is_completed, task.id],
        )?;

        if changed == 0 {
            return Err(StorageError::NotFound(task.id));
        }

        debug!(id = task.id, is_completed = task.is_completed, "update: saved task");
        Ok(())
    }

    /// Delete the row with the task's id; absent rows are not an error
    pub fn delete(&mut self, task: &Task) -> Result<(), StorageError> {
        let changed = self.db.execute("DELETE FROM tasks WHERE id = ?1", [task.id])?;
        debug!(id = task.id, changed, "delete: removed task");
        Ok(())
    }

    /// Delete every task
    pub fn delete_all(&mut self) -> Result<(), StorageError> {
        let changed = self.db.execute("DELETE FROM tasks", [])?;
        info!(changed, "Deleted all tasks");
        Ok(())
    }
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        description: row.get(1)?,
        is_completed: row.get(2)?,
    })
}
