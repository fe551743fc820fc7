//! Per-document model types.
//!
//! # Responsibility
//! - Carry the file identity data the engine is allowed to consume
//!   (stem and creation time, used only as default-value sources).
//! - Represent frontmatter field values as an explicit tagged variant.
//! - Represent the terminal per-file rewrite decision.
//!
//! # Invariants
//! - `FieldValue::from_yaml` is total; malformed shapes coerce instead
//!   of failing the file.
//! - `RewriteDecision::RescueFailed` always carries a non-empty
//!   diagnostic line.

use chrono::{DateTime, Local};
use serde_yaml::Value;
use std::path::Path;
use std::time::SystemTime;

/// File identity facts consumed by the field normalizer.
///
/// The engine never touches the filesystem itself; the caller resolves
/// the identity once per file and passes it in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteIdentity {
    /// File base name without the `.md` extension.
    pub stem: String,
    /// File creation time, falling back to modification time when the
    /// platform does not record creation timestamps.
    pub created: Option<SystemTime>,
}

impl NoteIdentity {
    /// Resolves the identity for one on-disk note.
    pub fn from_path(path: &Path) -> Self {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let created = std::fs::metadata(path)
            .ok()
            .and_then(|meta| meta.created().or_else(|_| meta.modified()).ok());
        Self { stem, created }
    }

    /// Creates an identity without filesystem timestamps, for callers
    /// processing in-memory text.
    pub fn from_stem(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            created: None,
        }
    }

    /// Renders the creation time as an ISO-8601 local-time string.
    ///
    /// Falls back to the current time when no timestamp is available, so
    /// a required `created` field can always be filled.
    pub fn created_iso(&self) -> String {
        let timestamp = self.created.unwrap_or_else(SystemTime::now);
        DateTime::<Local>::from(timestamp)
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    }
}

/// Tagged shape of one frontmatter field after coercion.
///
/// Known list fields (`tags`, `aliases`, `topics`, `categories`) and the
/// scalar fields (`title`, `created`) are normalized from this shape
/// rather than from raw YAML values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Scalar(String),
    List(Vec<String>),
    Absent,
}

impl FieldValue {
    /// Coerces a raw YAML value into the tagged field shape.
    ///
    /// Scalars stringify; sequences keep their scalar entries and drop
    /// nested structures; mappings and nulls coerce to `Absent`.
    pub fn from_yaml(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(text)) => Self::Scalar(text.clone()),
            Some(Value::Bool(flag)) => Self::Scalar(flag.to_string()),
            Some(Value::Number(number)) => Self::Scalar(number.to_string()),
            Some(Value::Sequence(items)) => {
                Self::List(items.iter().filter_map(scalar_to_string).collect())
            }
            Some(_) => Self::Absent,
        }
    }
}

/// Stringifies one scalar sequence entry; nested structures are dropped.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Terminal per-file outcome of one repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteDecision {
    /// No frontmatter existed; a fresh block was prepended.
    Inserted,
    /// Existing frontmatter was repaired or normalized.
    Fixed,
    /// Only the structural pre-fixers changed the text.
    HeadingOnly,
    /// Frontmatter was already valid and canonical.
    Unmodified,
    /// Frontmatter stayed unparseable after rescue; file untouched.
    RescueFailed { detail: String },
}

impl RewriteDecision {
    /// Stable status label used in log lines and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Fixed => "fixed",
            Self::HeadingOnly => "fixed_heading_only",
            Self::Unmodified => "unmodified",
            Self::RescueFailed { .. } => "rescue_failed",
        }
    }

    /// Whether this decision requires the caller to write the file.
    pub fn requires_write(&self) -> bool {
        matches!(self, Self::Inserted | Self::Fixed | Self::HeadingOnly)
    }
}

/// Result of one document repair pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub decision: RewriteDecision,
    /// Replacement text, present exactly when `decision.requires_write()`.
    pub text: Option<String>,
}

impl RepairOutcome {
    pub fn unchanged() -> Self {
        Self {
            decision: RewriteDecision::Unmodified,
            text: None,
        }
    }

    pub fn rewrite(decision: RewriteDecision, text: String) -> Self {
        Self {
            decision,
            text: Some(text),
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            decision: RewriteDecision::RescueFailed {
                detail: detail.into(),
            },
            text: None,
        }
    }
}
