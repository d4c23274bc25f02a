// Error type for the task store

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by `TaskStore` and propagated unchanged by `TaskListController`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite failed (medium unavailable, constraint violation, ...).
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Update of a task id that has no row.
    #[error("task {0} not found")]
    NotFound(i64),

    /// Creating the store directory or lock file failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Another process holds the store lock.
    #[error("task store is locked by another process: {}", .0.display())]
    Locked(PathBuf),

    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(StorageError::NotFound(7).to_string(), "task 7 not found");
    }

    #[test]
    fn test_locked_display() {
        let err = StorageError::Locked(PathBuf::from("/tmp/tasks.db"));
        assert_eq!(
            err.to_string(),
            "task store is locked by another process: /tmp/tasks.db"
        );
    }

    #[test]
    fn test_from_rusqlite() {
        let err: StorageError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StorageError::Database(_)));
    }
}
