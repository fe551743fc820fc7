//! Frontmatter block handling.
//!
//! # Responsibility
//! - `extract`: locate and split the delimited frontmatter region.
//! - `fields`: normalize known fields and fill required defaults.
//! - `emit`: serialize the repaired mapping back into document text.
//!
//! # Invariants
//! - Extraction never fails; absence is a value, not an error.
//! - Emission always produces block-style YAML between `---` delimiters.

pub mod emit;
pub mod extract;
pub mod fields;
