//! Best-effort frontmatter repair passes.
//!
//! # Responsibility
//! - `structural`: line-level text repairs applied before any parse.
//! - `rescue`: parse-retry with heuristic syntactic rewrites.
//!
//! # Invariants
//! - Every repair is a pure text transform with bounded iteration.
//! - Repairs are pattern-matched to observed corruption shapes; inputs
//!   outside those shapes fail closed instead of being guessed at.

pub mod rescue;
pub mod structural;
