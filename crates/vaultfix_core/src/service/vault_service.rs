//! Vault batch service.
//!
//! # Responsibility
//! - Run the pure per-document repair pipeline over every `.md` file
//!   under the configured vault root.
//! - Convert per-file failures into status reports; never let them cross
//!   into the batch loop.
//!
//! # Invariants
//! - Files are processed one at a time in sorted traversal order; no
//!   shared mutable state between files besides the read-only config.
//! - Every processed file yields exactly one terminal status.
//! - A file whose frontmatter stays unparseable is left byte-identical
//!   on disk.

use crate::config::VaultConfig;
use crate::frontmatter::emit::{emit_document, emit_new_document};
use crate::frontmatter::extract::extract_frontmatter;
use crate::frontmatter::fields::normalize_fields;
use crate::model::document::{NoteIdentity, RepairOutcome, RewriteDecision};
use crate::repair::rescue::parse_with_rescue;
use crate::repair::structural::apply_prefixers;
use log::{debug, error, info, warn};
use serde_yaml::Mapping;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Runs the full repair pipeline on one document's text.
///
/// Pure with respect to the filesystem: the caller supplies the raw text
/// and the note identity and decides what to do with the outcome.
pub fn repair_document(content: &str, note: &NoteIdentity, config: &VaultConfig) -> RepairOutcome {
    let prefixed = apply_prefixers(content);
    let structure_fixed = prefixed != content;

    let Some(block) = extract_frontmatter(&prefixed) else {
        let mut mapping = Mapping::new();
        normalize_fields(&mut mapping, note, config);
        return match emit_new_document(&mapping, &prefixed) {
            Ok(text) => RepairOutcome::rewrite(RewriteDecision::Inserted, text),
            Err(err) => RepairOutcome::failed(format!("serialize: {err}")),
        };
    };

    let (mut mapping, rescued) = match parse_with_rescue(&block.raw) {
        Ok(parsed) => parsed,
        Err(err) => return RepairOutcome::failed(err.detail),
    };

    let modified = normalize_fields(&mut mapping, note, config) || rescued;

    if modified {
        match emit_document(&mapping, &block.body) {
            Ok(text) => RepairOutcome::rewrite(RewriteDecision::Fixed, text),
            Err(err) => RepairOutcome::failed(format!("serialize: {err}")),
        }
    } else if structure_fixed {
        RepairOutcome::rewrite(RewriteDecision::HeadingOnly, prefixed)
    } else {
        RepairOutcome::unchanged()
    }
}

/// One reported rescue failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RescueReport {
    pub path: PathBuf,
    pub detail: String,
}

/// Aggregate counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub inserted: usize,
    pub fixed: usize,
    pub heading_only: usize,
    pub unmodified: usize,
    pub rescue_failed: usize,
    pub io_errors: usize,
    /// Per-file rescue failure details, in traversal order.
    pub failures: Vec<RescueReport>,
}

impl RunSummary {
    /// Total number of files that produced a status.
    pub fn processed(&self) -> usize {
        self.inserted + self.fixed + self.heading_only + self.unmodified + self.rescue_failed
    }

    fn record(&mut self, path: &Path, decision: &RewriteDecision) {
        match decision {
            RewriteDecision::Inserted => self.inserted += 1,
            RewriteDecision::Fixed => self.fixed += 1,
            RewriteDecision::HeadingOnly => self.heading_only += 1,
            RewriteDecision::Unmodified => self.unmodified += 1,
            RewriteDecision::RescueFailed { detail } => {
                self.rescue_failed += 1;
                self.failures.push(RescueReport {
                    path: path.to_path_buf(),
                    detail: detail.clone(),
                });
            }
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "processed={} inserted={} fixed={} fixed_heading_only={} unmodified={} rescue_failed={} io_errors={}",
            self.processed(),
            self.inserted,
            self.fixed,
            self.heading_only,
            self.unmodified,
            self.rescue_failed,
            self.io_errors
        )
    }
}

/// Batch-level failure that prevents the run from starting.
#[derive(Debug)]
pub enum VaultRunError {
    NotADirectory(PathBuf),
}

impl Display for VaultRunError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "vault_path `{}` is not a directory", path.display())
            }
        }
    }
}

impl Error for VaultRunError {}

/// Batch facade walking the vault and rewriting files in place.
pub struct VaultService {
    config: VaultConfig,
    dry_run: bool,
}

impl VaultService {
    pub fn new(config: VaultConfig) -> Self {
        Self {
            config,
            dry_run: false,
        }
    }

    /// Suppresses all file writes; decisions and reports are unchanged.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Processes every `.md` file under the vault root, one at a time,
    /// in sorted traversal order.
    ///
    /// Per-file failures are reported and counted; only a missing vault
    /// root aborts the run.
    pub fn run(&self) -> Result<RunSummary, VaultRunError> {
        if !self.config.vault_path.is_dir() {
            return Err(VaultRunError::NotADirectory(self.config.vault_path.clone()));
        }

        let mut summary = RunSummary::default();
        let walker = WalkDir::new(&self.config.vault_path).sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("event=walk_error module=vault status=error error={err}");
                    summary.io_errors += 1;
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }

            match self.process_file(path) {
                Ok(decision) => {
                    self.log_decision(path, &decision);
                    summary.record(path, &decision);
                }
                Err(err) => {
                    error!(
                        "event=file_io_error module=vault status=error path={} error={err}",
                        path.display()
                    );
                    summary.io_errors += 1;
                }
            }
        }

        info!("event=run_complete module=vault status=ok {summary}");
        Ok(summary)
    }

    /// Reads, repairs and (unless dry-run) rewrites one file in place.
    pub fn process_file(&self, path: &Path) -> std::io::Result<RewriteDecision> {
        let content = std::fs::read_to_string(path)?;
        let note = NoteIdentity::from_path(path);
        let outcome = repair_document(&content, &note, &self.config);

        if let Some(text) = &outcome.text {
            if !self.dry_run {
                std::fs::write(path, text)?;
            }
        }

        Ok(outcome.decision)
    }

    fn log_decision(&self, path: &Path, decision: &RewriteDecision) {
        match decision {
            RewriteDecision::Unmodified => debug!(
                "event=file_status module=vault status=ok result={} path={}",
                decision.label(),
                path.display()
            ),
            RewriteDecision::RescueFailed { detail } => warn!(
                "event=file_status module=vault status=error result={} path={} error={detail}",
                decision.label(),
                path.display()
            ),
            _ => info!(
                "event=file_status module=vault status=ok result={} path={}",
                decision.label(),
                path.display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::repair_document;
    use crate::config::VaultConfig;
    use crate::model::document::{NoteIdentity, RewriteDecision};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn config() -> VaultConfig {
        VaultConfig {
            vault_path: PathBuf::from("/vault"),
            required_fields: ["title", "created", "tags"]
                .iter()
                .map(|f| f.to_string())
                .collect::<BTreeSet<_>>(),
            default_tag: "inbox".to_string(),
        }
    }

    #[test]
    fn missing_frontmatter_is_inserted_with_defaults() {
        let note = NoteIdentity::from_stem("weekly-review");
        let outcome = repair_document("\n# Weekly\nbody text", &note, &config());

        assert_eq!(outcome.decision, RewriteDecision::Inserted);
        let text = outcome.text.expect("insert produces text");
        assert!(text.starts_with("---\n"));
        assert!(text.contains("title: weekly-review"));
        assert!(text.contains("tags:\n- inbox"));
        assert!(text.contains("created:"));
        assert!(text.ends_with("---\n# Weekly\nbody text"));
    }

    #[test]
    fn valid_canonical_document_is_unmodified() {
        let note = NoteIdentity::from_stem("note");
        let doc = "---\ntitle: note\ncreated: 2024-01-01T10:00:00\ntags:\n- inbox\n---\nbody";
        let outcome = repair_document(doc, &note, &config());

        assert_eq!(outcome.decision, RewriteDecision::Unmodified);
        assert!(outcome.text.is_none());
    }

    #[test]
    fn canonical_document_with_trailing_newline_is_unmodified() {
        let note = NoteIdentity::from_stem("note");
        let doc = "---\ntitle: note\ncreated: 2024-01-01T10:00:00\ntags:\n- inbox\n---\nbody\n";
        let outcome = repair_document(doc, &note, &config());

        assert_eq!(outcome.decision, RewriteDecision::Unmodified);
        assert!(outcome.text.is_none());
    }

    #[test]
    fn unrescuable_frontmatter_fails_without_text() {
        let note = NoteIdentity::from_stem("note");
        let doc = "---\ntitle: Note\ntags: [a, b\n  broken: {\n---\nbody";
        let outcome = repair_document(doc, &note, &config());

        assert!(matches!(
            outcome.decision,
            RewriteDecision::RescueFailed { .. }
        ));
        assert!(outcome.text.is_none());
    }

    #[test]
    fn heading_only_fix_rewrites_without_touching_fields() {
        let note = NoteIdentity::from_stem("note");
        let doc =
            "---\ntitle: note\ncreated: 2024-01-01T10:00:00\ntags:\n- inbox\n---# Intro\nbody";
        let outcome = repair_document(doc, &note, &config());

        assert_eq!(outcome.decision, RewriteDecision::HeadingOnly);
        let text = outcome.text.expect("heading fix produces text");
        assert!(text.contains("---\n# Intro\nbody"));
        assert!(text.contains("title: note"));
    }

    #[test]
    fn repair_is_idempotent_on_its_own_output() {
        let note = NoteIdentity::from_stem("messy-note");
        let doc = "---\ntitle: Messy Note\ntags:\n- Deep Dive\n- rust\naliases:\n- messy note?\n---\nbody";
        let cfg = config();

        let first = repair_document(doc, &note, &cfg);
        assert_eq!(first.decision, RewriteDecision::Fixed);
        let text = first.text.expect("first pass rewrites");

        let second = repair_document(&text, &note, &cfg);
        assert_eq!(second.decision, RewriteDecision::Unmodified);
    }
}
