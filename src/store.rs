// Task list store backed by SQLite

use crate::error::{StoreError, StoreResult};
use crate::migrations;
use crate::models::{DEFAULT_LIST_NAME, Task, TaskList};
use eyre::{Context, Result};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Durable CRUD for lists and tasks
///
/// Every mutating call commits before returning. Deleting a list removes its
/// tasks through the `ON DELETE CASCADE` foreign key, so connections are
/// always opened with `foreign_keys = ON`.
pub struct Store {
    path: Option<PathBuf>,
    db: Connection,
    // Declared after `db` so the connection closes before the lock is released
    _lock: Option<File>,
}

impl Store {
    /// Open or create the database file at the given path
    ///
    /// Takes an exclusive lock on `<path>.lock` for the lifetime of the store;
    /// a second process opening the same database fails fast.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let lock_path = lock_path_for(&path);
        let lock = File::create(&lock_path).context("Failed to create lock file")?;
        lock.try_lock_exclusive()
            .with_context(|| format!("Failed to lock database (in use by another process?): {}", path.display()))?;

        let db = Connection::open(&path).context("Failed to open SQLite database")?;
        let store = Self::bootstrap(db, Some(path), Some(lock))?;

        info!(path = ?store.path, "Store opened");
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::bootstrap(db, None, None)
    }

    fn bootstrap(mut db: Connection, path: Option<PathBuf>, lock: Option<File>) -> Result<Self> {
        db.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        migrations::apply(&mut db)?;

        Ok(Self { path, db, _lock: lock })
    }

    /// Path of the database file (`None` for in-memory stores)
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a reference to the SQLite database connection
    pub fn db(&self) -> &Connection {
        &self.db
    }

    // ========================================================================
    // Lists
    // ========================================================================

    /// Create a list and return its id
    pub fn create_list(&mut self, name: &str) -> StoreResult<i64> {
        let name = validate_text("List name", name)?;

        self.db.execute("INSERT INTO lists (name) VALUES (?1)", [name])?;
        let id = self.db.last_insert_rowid();

        debug!(list_id = id, name, "Created list");
        Ok(id)
    }

    /// All lists in creation order
    pub fn list_all_lists(&self) -> StoreResult<Vec<TaskList>> {
        let mut stmt = self.db.prepare("SELECT id, name FROM lists ORDER BY id")?;
        let rows = stmt.query_map([], TaskList::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Get a list by ID
    pub fn get_list(&self, list_id: i64) -> StoreResult<Option<TaskList>> {
        let list = self
            .db
            .query_row("SELECT id, name FROM lists WHERE id = ?1", [list_id], TaskList::from_row)
            .optional()?;
        Ok(list)
    }

    /// Delete a list together with all of its tasks
    pub fn delete_list(&mut self, list_id: i64) -> StoreResult<()> {
        let tx = self.db.transaction()?;

        let task_count: i64 = tx.query_row("SELECT COUNT(*) FROM tasks WHERE list_id = ?1", [list_id], |row| {
            row.get(0)
        })?;

        // Cascade removes the tasks in the same statement
        let deleted = tx.execute("DELETE FROM lists WHERE id = ?1", [list_id])?;
        if deleted == 0 {
            return Err(StoreError::list_not_found(list_id));
        }

        tx.commit()?;
        debug!(list_id, task_count, "Deleted list");
        Ok(())
    }

    /// Rename a list in place, keeping its id and tasks
    pub fn rename_list(&mut self, list_id: i64, new_name: &str) -> StoreResult<()> {
        let name = validate_text("List name", new_name)?;

        let updated = self
            .db
            .execute("UPDATE lists SET name = ?1 WHERE id = ?2", params![name, list_id])?;
        if updated == 0 {
            return Err(StoreError::list_not_found(list_id));
        }

        debug!(list_id, name, "Renamed list");
        Ok(())
    }

    /// Return the first list, creating the default one if the store is empty
    pub fn ensure_default_list(&mut self) -> StoreResult<TaskList> {
        let first = self
            .db
            .query_row("SELECT id, name FROM lists ORDER BY id LIMIT 1", [], TaskList::from_row)
            .optional()?;

        if let Some(list) = first {
            return Ok(list);
        }

        let id = self.create_list(DEFAULT_LIST_NAME)?;
        info!(list_id = id, "No lists found, created default list");
        Ok(TaskList {
            id,
            name: DEFAULT_LIST_NAME.to_string(),
        })
    }

    // ========================================================================
    // Tasks
    // ========================================================================

    /// Add an unchecked task to a list and return its id
    pub fn create_task(&mut self, list_id: i64, text: &str) -> StoreResult<i64> {
        let text = validate_text("Task text", text)?;
        self.require_list(list_id)?;

        self.db.execute(
            "INSERT INTO tasks (list_id, text, is_checked) VALUES (?1, ?2, 0)",
            params![list_id, text],
        )?;
        let id = self.db.last_insert_rowid();

        debug!(task_id = id, list_id, "Created task");
        Ok(id)
    }

    /// Tasks of one list in creation order
    pub fn list_tasks(&self, list_id: i64) -> StoreResult<Vec<Task>> {
        let mut stmt = self
            .db
            .prepare("SELECT id, list_id, text, is_checked FROM tasks WHERE list_id = ?1 ORDER BY id")?;
        let rows = stmt.query_map([list_id], Task::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: i64) -> StoreResult<Option<Task>> {
        let task = self
            .db
            .query_row(
                "SELECT id, list_id, text, is_checked FROM tasks WHERE id = ?1",
                [task_id],
                Task::from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Overwrite both the text and the checked state of a task
    pub fn update_task(&mut self, task_id: i64, text: &str, is_checked: bool) -> StoreResult<()> {
        let text = validate_text("Task text", text)?;

        let updated = self.db.execute(
            "UPDATE tasks SET text = ?1, is_checked = ?2 WHERE id = ?3",
            params![text, is_checked, task_id],
        )?;
        if updated == 0 {
            return Err(StoreError::task_not_found(task_id));
        }

        debug!(task_id, is_checked, "Updated task");
        Ok(())
    }

    /// Delete a single task
    pub fn delete_task(&mut self, task_id: i64) -> StoreResult<()> {
        let deleted = self.db.execute("DELETE FROM tasks WHERE id = ?1", [task_id])?;
        if deleted == 0 {
            return Err(StoreError::task_not_found(task_id));
        }

        debug!(task_id, "Deleted task");
        Ok(())
    }

    /// Set the checked state of every task in a list.
    /// Returns the number of tasks whose state changed.
    pub fn set_all_checked(&mut self, list_id: i64, checked: bool) -> StoreResult<usize> {
        self.require_list(list_id)?;

        let changed = self.db.execute(
            "UPDATE tasks SET is_checked = ?1 WHERE list_id = ?2 AND is_checked != ?1",
            params![checked, list_id],
        )?;

        debug!(list_id, checked, changed, "Set checked state for list");
        Ok(changed)
    }

    /// Delete all checked tasks of a list.
    /// Returns the number of tasks deleted.
    pub fn delete_checked_tasks(&mut self, list_id: i64) -> StoreResult<usize> {
        self.require_list(list_id)?;

        let deleted = self
            .db
            .execute("DELETE FROM tasks WHERE list_id = ?1 AND is_checked != 0", [list_id])?;

        debug!(list_id, deleted, "Deleted checked tasks");
        Ok(deleted)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn require_list(&self, list_id: i64) -> StoreResult<()> {
        let exists: bool = self
            .db
            .query_row("SELECT EXISTS(SELECT 1 FROM lists WHERE id = ?1)", [list_id], |row| {
                row.get(0)
            })?;

        if exists {
            Ok(())
        } else {
            Err(StoreError::list_not_found(list_id))
        }
    }
}

fn lock_path_for(db_path: &Path) -> PathBuf {
    let mut name = db_path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    db_path.with_file_name(name)
}

/// Trim a name or task text, rejecting empty and whitespace-only input
fn validate_text<'a>(what: &str, value: &'a str) -> StoreResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!(
            "{} cannot be empty or whitespace-only",
            what
        )));
    }
    Ok(trimmed)
}
