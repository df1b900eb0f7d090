//! Persistence gateway contracts and implementations.
//!
//! # Responsibility
//! - Define the record-level `TodoRepository` contract.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Write paths validate drafts/patches before touching storage.
//! - Gateways return semantic errors (`NotFound`) in addition to storage
//!   failures.

pub mod memory_repo;
pub mod todo_repo;
