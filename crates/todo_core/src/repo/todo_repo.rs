//! Todo persistence gateway contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide record-level CRUD over the canonical `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate drafts/patches before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Every call is a single statement, so it is atomic for its record.

use crate::config::StoreConfig;
use crate::db::migrations::apply_migrations;
use crate::db::{open_with_config, DbError};
use crate::model::todo::{NewTodo, Todo, TodoId, TodoPatch, TodoStatus, TodoValidationError};
use log::{debug, error};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    task,
    description,
    status,
    created_at,
    updated_at
FROM todos";

const NOW_MS_SQL: &str = "CAST((julianday('now') - 2440587.5) * 86400000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Caller-facing failure category.
///
/// Adapters map these onto their own transport codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or value; never retried.
    InvalidArgument,
    /// No record with the given id.
    NotFound,
    /// Backing store could not be reached or prepared.
    StorageUnavailable,
    /// Read/write failure after the store was reachable.
    StorageError,
}

/// Gateway and service error for Todo operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    NotFound(TodoId),
    Unavailable(DbError),
    Db(DbError),
    InvalidData(String),
}

impl RepoError {
    /// Wraps a connect/bootstrap failure as `StorageUnavailable`.
    pub fn unavailable(err: DbError) -> Self {
        error!(
            "event=repo_init module=repo status=error error_code=storage_unavailable error={}",
            err
        );
        Self::Unavailable(err)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::InvalidArgument,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unavailable(_) => ErrorKind::StorageUnavailable,
            Self::Db(_) | Self::InvalidData(_) => ErrorKind::StorageError,
        }
    }

    /// Short stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::StorageUnavailable => "storage_unavailable",
            ErrorKind::StorageError => "storage_error",
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Unavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Unavailable(err) | Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence gateway for Todo records.
///
/// Implementations own the durable record; callers only ever get copies.
pub trait TodoRepository {
    /// Ensures the backing schema exists. Idempotent.
    fn initialize(&self) -> RepoResult<()>;
    /// Persists a new record and returns its store-assigned id.
    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId>;
    fn find_by_id(&self, id: TodoId) -> RepoResult<Todo>;
    /// Returns every record ordered by id.
    fn find_all(&self) -> RepoResult<Vec<Todo>>;
    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()>;
    fn delete(&self, id: TodoId) -> RepoResult<()>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn initialize(&self) -> RepoResult<()> {
        (**self).initialize()
    }

    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        (**self).insert(todo)
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Todo> {
        (**self).find_by_id(id)
    }

    fn find_all(&self) -> RepoResult<Vec<Todo>> {
        (**self).find_all()
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        (**self).delete(id)
    }
}

/// Opens the SQLite store a `SqliteTodoRepository` will borrow.
///
/// # Errors
/// - `RepoError::Unavailable` when the database cannot be opened or
///   bootstrapped.
pub fn open_store(config: &StoreConfig) -> RepoResult<Connection> {
    open_with_config(config).map_err(RepoError::unavailable)
}

/// SQLite-backed Todo gateway borrowing a caller-owned connection.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Creates the gateway and makes sure the schema is in place.
    ///
    /// # Errors
    /// - `RepoError::Unavailable` when the schema cannot be prepared.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let repo = Self::new(conn);
        repo.initialize()?;
        Ok(repo)
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn initialize(&self) -> RepoResult<()> {
        apply_migrations(self.conn).map_err(RepoError::unavailable)
    }

    fn insert(&self, todo: &NewTodo) -> RepoResult<TodoId> {
        todo.validate()?;

        self.conn.execute(
            "INSERT INTO todos (task, description, status) VALUES (?1, ?2, ?3);",
            params![
                todo.task.as_str(),
                todo.description.as_str(),
                todo.status.as_str(),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=todo_insert module=repo status=ok id={id}");
        Ok(id)
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Todo> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_todo_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update(&self, id: TodoId, patch: &TodoPatch) -> RepoResult<()> {
        patch.validate()?;

        if patch.is_empty() {
            let exists: bool = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM todos WHERE id = ?1);",
                [id],
                |row| row.get(0),
            )?;
            return if exists {
                Ok(())
            } else {
                Err(RepoError::NotFound(id))
            };
        }

        // MAX keeps updated_at non-decreasing within one millisecond bucket.
        let changed = self.conn.execute(
            &format!(
                "UPDATE todos
                 SET
                    task = COALESCE(?1, task),
                    description = COALESCE(?2, description),
                    status = COALESCE(?3, status),
                    updated_at = MAX(updated_at, {NOW_MS_SQL})
                 WHERE id = ?4;"
            ),
            params![
                patch.task.as_deref(),
                patch.description.as_deref(),
                patch.status.map(TodoStatus::as_str),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=todo_update module=repo status=ok id={id}");
        Ok(())
    }

    fn delete(&self, id: TodoId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM todos WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!("event=todo_delete module=repo status=ok id={id}");
        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id: TodoId = row.get("id")?;

    let status_text: String = row.get("status")?;
    let status = TodoStatus::parse(&status_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid status `{status_text}` in todos.status for id {id}"
        ))
    })?;

    let todo = Todo {
        id,
        task: row.get("task")?,
        description: row.get("description")?,
        status,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    todo.validate().map_err(|err| {
        RepoError::InvalidData(format!("todo {id} failed validation: {err}"))
    })?;
    Ok(todo)
}
