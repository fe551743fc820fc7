//! Domain model for frontmatter repair.
//!
//! # Responsibility
//! - Define the canonical data structures flowing through the repair
//!   pipeline.
//! - Keep field-value coercion rules in one place instead of ad-hoc
//!   branches in the normalizer.
//!
//! # Invariants
//! - Every processed file ends in exactly one `RewriteDecision` state.
//! - `FieldValue` coercion never fails; unexpected shapes degrade to a
//!   best-effort scalar or an empty list.

pub mod document;
