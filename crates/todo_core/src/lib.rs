//! Core domain logic for the Todo record service.
//! This crate is the single source of truth for Todo invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{LogConfig, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{
    validate_task, NewTodo, Todo, TodoId, TodoPatch, TodoStatus, TodoValidationError,
};
pub use repo::memory_repo::MemoryTodoRepository;
pub use repo::todo_repo::{
    open_store, ErrorKind, RepoError, RepoResult, SqliteTodoRepository, TodoRepository,
};
pub use service::todo_service::TodoService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
