// View-model over the currently selected list
//
// A presentation layer drives a Board instead of talking to the Store
// directly. The Board never caches across mutations: every action re-reads
// the current list and its tasks from the Store.

use crate::error::{StoreError, StoreResult};
use crate::models::{Task, TaskList};
use crate::store::Store;
use serde::Serialize;
use tracing::{debug, warn};

/// Display copy of a task in the current list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskItem {
    pub id: i64,
    pub text: String,
    pub is_checked: bool,
}

impl From<Task> for TaskItem {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            text: task.text,
            is_checked: task.is_checked,
        }
    }
}

/// Serializable view of the current list and its items
#[derive(Debug, Clone, Serialize)]
pub struct BoardSnapshot<'a> {
    pub list: &'a TaskList,
    pub tasks: &'a [TaskItem],
}

pub struct Board {
    store: Store,
    current: TaskList,
    items: Vec<TaskItem>,
}

impl Board {
    /// Select the first list (creating the default one if needed) and load it
    pub fn new(mut store: Store) -> StoreResult<Self> {
        let current = store.ensure_default_list()?;
        let mut board = Self {
            store,
            current,
            items: Vec::new(),
        };
        board.refresh()?;
        Ok(board)
    }

    pub fn current(&self) -> &TaskList {
        &self.current
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn snapshot(&self) -> BoardSnapshot<'_> {
        BoardSnapshot {
            list: &self.current,
            tasks: &self.items,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Release the store, closing the connection when it is dropped
    pub fn into_store(self) -> Store {
        self.store
    }

    /// All lists, freshly queried
    pub fn lists(&self) -> StoreResult<Vec<TaskList>> {
        self.store.list_all_lists()
    }

    /// Re-read the current list and its tasks
    pub fn refresh(&mut self) -> StoreResult<()> {
        self.current = match self.store.get_list(self.current.id)? {
            Some(list) => list,
            None => self.store.ensure_default_list()?,
        };
        self.items = self
            .store
            .list_tasks(self.current.id)?
            .into_iter()
            .map(TaskItem::from)
            .collect();

        debug!(list_id = self.current.id, items = self.items.len(), "Board refreshed");
        Ok(())
    }

    // ========================================================================
    // List actions
    // ========================================================================

    pub fn select_list(&mut self, list_id: i64) -> StoreResult<bool> {
        let found = self.store.get_list(list_id)?;
        let Some(list) = found else {
            return self.ignore("select_list", StoreError::list_not_found(list_id));
        };

        self.current = list;
        self.refresh()?;
        Ok(true)
    }

    /// Create a list and make it the current one
    pub fn add_list(&mut self, name: &str) -> StoreResult<bool> {
        let result = self.store.create_list(name);
        self.apply("add_list", result, |board, id| {
            board.current.id = id;
            Ok(())
        })
    }

    pub fn rename_current(&mut self, name: &str) -> StoreResult<bool> {
        let result = self.store.rename_list(self.current.id, name);
        self.apply("rename_current", result, |_, _| Ok(()))
    }

    /// Delete the current list and its tasks, then select the first remaining
    /// list (or a freshly created default one)
    pub fn delete_current(&mut self) -> StoreResult<bool> {
        let result = self.store.delete_list(self.current.id);
        self.apply("delete_current", result, |board, _| {
            board.current = board.store.ensure_default_list()?;
            Ok(())
        })
    }

    // ========================================================================
    // Task actions
    // ========================================================================

    pub fn add_task(&mut self, text: &str) -> StoreResult<bool> {
        let result = self.store.create_task(self.current.id, text);
        self.apply("add_task", result, |_, _| Ok(()))
    }

    /// Replace the text of a task, keeping its checked state
    pub fn edit_task(&mut self, task_id: i64, text: &str) -> StoreResult<bool> {
        let Some(item) = self.item(task_id) else {
            return self.ignore("edit_task", StoreError::task_not_found(task_id));
        };

        let is_checked = item.is_checked;
        let result = self.store.update_task(task_id, text, is_checked);
        self.apply("edit_task", result, |_, _| Ok(()))
    }

    pub fn toggle_task(&mut self, task_id: i64) -> StoreResult<bool> {
        let Some(item) = self.item(task_id) else {
            return self.ignore("toggle_task", StoreError::task_not_found(task_id));
        };

        let (text, is_checked) = (item.text.clone(), !item.is_checked);
        let result = self.store.update_task(task_id, &text, is_checked);
        self.apply("toggle_task", result, |_, _| Ok(()))
    }

    /// Check every task if any is unchecked, otherwise uncheck them all
    pub fn toggle_all(&mut self) -> StoreResult<bool> {
        let check = self.items.iter().any(|item| !item.is_checked);
        let result = self.store.set_all_checked(self.current.id, check);
        self.apply("toggle_all", result, |_, _| Ok(()))
    }

    pub fn delete_checked(&mut self) -> StoreResult<bool> {
        let result = self.store.delete_checked_tasks(self.current.id);
        self.apply("delete_checked", result, |_, _| Ok(()))
    }

    pub fn delete_task(&mut self, task_id: i64) -> StoreResult<bool> {
        if self.item(task_id).is_none() {
            return self.ignore("delete_task", StoreError::task_not_found(task_id));
        }

        let result = self.store.delete_task(task_id);
        self.apply("delete_task", result, |_, _| Ok(()))
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn item(&self, task_id: i64) -> Option<&TaskItem> {
        self.items.iter().find(|item| item.id == task_id)
    }

    /// Finish an action: on success run `then` and refresh; recoverable errors
    /// leave the prior state untouched and report `false`
    fn apply<T>(
        &mut self,
        action: &str,
        result: StoreResult<T>,
        then: impl FnOnce(&mut Self, T) -> StoreResult<()>,
    ) -> StoreResult<bool> {
        match result {
            Ok(value) => {
                then(self, value)?;
                self.refresh()?;
                Ok(true)
            }
            Err(err) => self.ignore(action, err),
        }
    }

    fn ignore(&self, action: &str, err: StoreError) -> StoreResult<bool> {
        if !err.is_recoverable() {
            return Err(err);
        }
        warn!(action, list_id = self.current.id, error = %err, "Action ignored");
        Ok(false)
    }
}
