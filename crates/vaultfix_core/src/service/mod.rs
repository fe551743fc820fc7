//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate the repair pipeline into batch-level APIs.
//! - Keep the CLI decoupled from traversal and I/O details.

pub mod vault_service;
