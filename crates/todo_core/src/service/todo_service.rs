//! Todo use-case service.
//!
//! # Responsibility
//! - Validate caller input and apply the status defaults.
//! - Orchestrate gateway calls and hand back the authoritative stored record.
//!
//! # Invariants
//! - Invalid input is rejected before the gateway is touched.
//! - Writes are always followed by a re-read; callers never see the draft.
//! - The service holds no state besides its gateway.

use crate::model::todo::{validate_task, NewTodo, Todo, TodoId, TodoPatch, TodoStatus};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use log::{info, warn};

/// Use-case service over a Todo gateway.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided gateway as-is.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a service after making sure the gateway's schema exists.
    ///
    /// # Errors
    /// - Kind `StorageUnavailable` when the store cannot be prepared.
    pub fn try_new(repo: R) -> RepoResult<Self> {
        repo.initialize()?;
        info!("event=service_init module=service status=ok");
        Ok(Self { repo })
    }

    /// Borrows the underlying gateway.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a Todo in `INIT` status and returns the stored record.
    ///
    /// # Contract
    /// - Blank `task` fails with `InvalidArgument`; nothing is persisted.
    /// - The id comes from the gateway.
    pub fn create_todo(
        &self,
        task: impl Into<String>,
        description: impl Into<String>,
    ) -> RepoResult<Todo> {
        let draft = NewTodo::new(task, description);
        validate_task(&draft.task).map_err(|err| reject("todo_create", err.into()))?;

        let result = self
            .repo
            .insert(&draft)
            .and_then(|id| self.repo.find_by_id(id));
        log_outcome("todo_create", result)
    }

    /// Returns every stored Todo. An empty store yields an empty vec.
    pub fn fetch_todos(&self) -> RepoResult<Vec<Todo>> {
        let todos = self.repo.find_all().map_err(|err| reject("todo_list", err))?;
        info!(
            "event=todo_list module=service status=ok count={}",
            todos.len()
        );
        Ok(todos)
    }

    pub fn fetch_todo(&self, id: TodoId) -> RepoResult<Todo> {
        log_outcome("todo_fetch", self.repo.find_by_id(id))
    }

    /// Sets the status from an external label such as `"DONE"`.
    ///
    /// An unknown label fails with `InvalidArgument` and leaves the stored
    /// record untouched.
    pub fn update_status(&self, id: TodoId, status: &str) -> RepoResult<Todo> {
        let status = TodoStatus::parse(status)
            .map_err(|err| reject("todo_update_status", err.into()))?;
        self.set_status(id, status)
    }

    /// Sets an already-typed status and returns the refreshed record.
    pub fn set_status(&self, id: TodoId, status: TodoStatus) -> RepoResult<Todo> {
        let result = self
            .repo
            .update(id, &TodoPatch::status(status))
            .and_then(|()| self.repo.find_by_id(id));
        log_outcome("todo_update_status", result)
    }

    /// Applies a partial edit and returns the refreshed record.
    pub fn update_todo(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<Todo> {
        patch
            .validate()
            .map_err(|err| reject("todo_update", err.into()))?;

        let result = self
            .repo
            .update(id, patch)
            .and_then(|()| self.repo.find_by_id(id));
        log_outcome("todo_update", result)
    }

    pub fn delete_todo(&self, id: TodoId) -> RepoResult<()> {
        self.repo
            .delete(id)
            .map_err(|err| reject("todo_delete", err))?;
        info!("event=todo_delete module=service status=ok id={id}");
        Ok(())
    }
}

fn log_outcome(event: &str, result: RepoResult<Todo>) -> RepoResult<Todo> {
    match result {
        Ok(todo) => {
            info!(
                "event={event} module=service status=ok id={} todo_status={}",
                todo.id, todo.status
            );
            Ok(todo)
        }
        Err(err) => Err(reject(event, err)),
    }
}

fn reject(event: &str, err: RepoError) -> RepoError {
    warn!(
        "event={event} module=service status=error error_code={} error={}",
        err.code(),
        err
    );
    err
}
