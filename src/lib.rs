// tasklist - single-screen task list backed by SQLite

pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod models;
pub mod shell;
pub mod store;
pub mod view;

// Re-export main types for convenience
pub use config::Config;
pub use controller::TaskListController;
pub use error::StorageError;
pub use filter::TaskFilter;
pub use models::Task;
pub use store::TaskStore;
