//! Core frontmatter-repair engine for VaultFix.
//! This crate is the single source of truth for repair invariants.

pub mod config;
pub mod frontmatter;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod repair;
pub mod service;

pub use config::{ConfigError, VaultConfig};
pub use frontmatter::extract::{extract_frontmatter, FrontmatterBlock};
pub use frontmatter::fields::normalize_fields;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{FieldValue, NoteIdentity, RepairOutcome, RewriteDecision};
pub use repair::rescue::{parse_with_rescue, RescueError};
pub use repair::structural::apply_prefixers;
pub use service::vault_service::{
    repair_document, RescueReport, RunSummary, VaultRunError, VaultService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
