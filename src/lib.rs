// maeltodo - Personal task lists persisted in SQLite

pub mod board;
pub mod config;
pub mod error;
pub mod migrations;
pub mod models;
pub mod store;

// Re-export main types for convenience
pub use board::{Board, BoardSnapshot, TaskItem};
pub use config::Config;
pub use error::{EntityKind, StoreError, StoreResult};
pub use models::{DEFAULT_LIST_NAME, Task, TaskList};
pub use store::Store;

// Re-exported because Store::db() hands out a rusqlite::Connection
pub use rusqlite;
