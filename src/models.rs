// Data models for task lists

use serde::{Deserialize, Serialize};

/// Name of the list created when the store holds no lists at all
pub const DEFAULT_LIST_NAME: &str = "My Tasks";

/// A named container of tasks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: i64,
    pub name: String,
}

/// A single to-do item belonging to exactly one list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub list_id: i64,
    pub text: String,
    pub is_checked: bool,
}

impl Task {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            list_id: row.get(1)?,
            text: row.get(2)?,
            is_checked: row.get(3)?,
        })
    }
}

impl TaskList {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    }
}
