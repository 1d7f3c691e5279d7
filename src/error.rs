// Error types for store operations

use std::fmt;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Which kind of entity an id referred to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    List,
    Task,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::List => write!(f, "list"),
            EntityKind::Task => write!(f, "task"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// Empty or otherwise unusable name/text
    #[error("{0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: i64 },

    /// Storage engine failure (disk full, corruption, ...)
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

impl StoreError {
    pub(crate) fn list_not_found(id: i64) -> Self {
        StoreError::NotFound {
            kind: EntityKind::List,
            id,
        }
    }

    pub(crate) fn task_not_found(id: i64) -> Self {
        StoreError::NotFound {
            kind: EntityKind::Task,
            id,
        }
    }

    /// Whether a caller may ignore this error and keep its prior state
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StoreError::Validation(_) | StoreError::NotFound { .. })
    }
}
