//! Todo domain model.
//!
//! # Invariants
//! - Every persisted Todo is identified by a store-assigned `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
