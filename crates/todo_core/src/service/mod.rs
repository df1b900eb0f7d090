//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gateway calls into use-case level APIs.
//! - Keep adapters decoupled from storage details.

pub mod todo_service;
