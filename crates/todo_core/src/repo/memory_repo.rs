//! In-memory Todo gateway.
//!
//! Mirrors the SQLite gateway's observable behavior so services can be
//! exercised without a database file.
//!
//! # Invariants
//! - Ids start at 1 and are never reused, even after delete.
//! - `updated_at` never moves backwards for a record.
//! - An empty patch leaves the record untouched.

use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Default)]
struct MemoryStore {
    last_id: TodoId,
    todos: BTreeMap<TodoId, Todo>,
}

/// Thread-safe map-backed gateway.
#[derive(Debug, Default)]
pub struct MemoryTodoRepository {
    store: RwLock<MemoryStore>,
}

impl MemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> RepoResult<usize> {
        let store = self.store.read().map_err(|_| lock_poisoned("read"))?;
        Ok(store.todos.len())
    }

    pub fn is_empty(&self) -> RepoResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl TodoRepository for MemoryTodoRepository {
    fn initialize(&self) -> RepoResult<()> {
        // Nothing to prepare.
        Ok(())
    }

    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        todo.validate()?;

        let mut store = self.store.write().map_err(|_| lock_poisoned("write"))?;
        let id = store.last_id + 1;
        let now = now_epoch_ms();
        store.todos.insert(
            id,
            Todo {
                id,
                task: todo.task.clone(),
                description: todo.description.clone(),
                status: todo.status,
                created_at: now,
                updated_at: now,
            },
        );
        store.last_id = id;
        Ok(id)
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Todo> {
        let store = self.store.read().map_err(|_| lock_poisoned("read"))?;
        store.todos.get(&id).cloned().ok_or(RepoError::NotFound(id))
    }

    fn find_all(&self) -> RepoResult<Vec<Todo>> {
        let store = self.store.read().map_err(|_| lock_poisoned("read"))?;
        Ok(store.todos.values().cloned().collect())
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()> {
        patch.validate()?;

        let mut store = self.store.write().map_err(|_| lock_poisoned("write"))?;
        let todo = store.todos.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        if patch.is_empty() {
            return Ok(());
        }
        patch.apply_to(todo);
        todo.updated_at = todo.updated_at.max(now_epoch_ms());
        Ok(())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let mut store = self.store.write().map_err(|_| lock_poisoned("write"))?;
        store
            .todos
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound(id))
    }
}

fn lock_poisoned(mode: &str) -> RepoError {
    RepoError::InvalidData(format!("memory store lock poisoned on {mode}"))
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
