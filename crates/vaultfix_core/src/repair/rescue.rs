//! YAML rescue parser.
//!
//! # Responsibility
//! - Parse frontmatter text into a mapping, retrying once after a fixed
//!   set of heuristic syntactic rewrites when the first parse fails.
//!
//! # Invariants
//! - All rewrites are applied together before the single retry; there is
//!   no per-step retry loop.
//! - A failed retry is a terminal, reported failure; the caller must
//!   leave the file untouched.
//! - Rewrite loops are bounded; no open-ended iteration.

use crate::normalize::{clean_malformed_title, normalize_for_compare, quote_if_significant};
use log::debug;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde_yaml::Mapping;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed-point cap for the missing-comma rewrite.
const MAX_REWRITE_PASSES: usize = 5;

static ADJACENT_QUOTED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"("[^"]*")\s+("[^"]*")"#).expect("valid adjacent-quoted regex"));
static TITLE_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^title:\s*(.+)$").expect("valid title line regex"));
static INLINE_ALIASES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"aliases:\s*\[(.*?)\]").expect("valid inline aliases regex"));
static INLINE_TAGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"tags:\s*\[(.*?)\]").expect("valid inline tags regex"));
static COMMA_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("valid comma split regex"));

/// Frontmatter that stayed unparseable after the heuristic rewrites.
#[derive(Debug)]
pub struct RescueError {
    /// First line of the parse error from the retry, for diagnosis.
    pub detail: String,
}

impl Display for RescueError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "frontmatter unparseable after rescue: {}", self.detail)
    }
}

impl Error for RescueError {}

/// Parses frontmatter text into a mapping, with an empty region parsing
/// as an empty mapping.
pub fn parse_mapping(raw: &str) -> Result<Mapping, serde_yaml::Error> {
    if raw.trim().is_empty() {
        return Ok(Mapping::new());
    }
    serde_yaml::from_str::<Mapping>(raw)
}

/// Attempts a standard parse, then one rescue pass.
///
/// Returns the parsed mapping plus a flag telling whether the rescue
/// rewrites were needed (a rescued mapping always counts as modified for
/// the rewrite decision).
///
/// # Errors
/// Returns [`RescueError`] when the text stays unparseable after the
/// rewrites; the error carries the first line of the retry parse error.
pub fn parse_with_rescue(raw: &str) -> Result<(Mapping, bool), RescueError> {
    match parse_mapping(raw) {
        Ok(mapping) => Ok((mapping, false)),
        Err(first_error) => {
            debug!(
                "event=rescue_attempt module=rescue status=start error={}",
                first_line(&first_error.to_string())
            );
            let fixed = rescue_frontmatter(raw);
            match parse_mapping(&fixed) {
                Ok(mapping) => Ok((mapping, true)),
                Err(retry_error) => Err(RescueError {
                    detail: first_line(&retry_error.to_string()),
                }),
            }
        }
    }
}

/// Applies all heuristic rewrites to raw frontmatter text, in order:
/// missing commas, title re-quoting, inline alias list, inline tag list.
pub fn rescue_frontmatter(raw: &str) -> String {
    let mut fixed = insert_missing_commas(raw);

    let title = extract_raw_title(raw).map(|title| prepare_inline_title(&title));
    if let Some(title) = title.as_deref() {
        fixed = TITLE_LINE_RE
            .replace(&fixed, NoExpand(&format!("title: \"{title}\"")))
            .into_owned();
    }

    fixed = rewrite_inline_aliases(&fixed, title.as_deref());
    rewrite_inline_tags(&fixed)
}

/// Extracts the raw title scalar via a loose line match and unwraps its
/// quoting layers.
pub fn extract_raw_title(frontmatter: &str) -> Option<String> {
    TITLE_LINE_RE
        .captures(frontmatter)
        .map(|captures| clean_malformed_title(captures[1].trim()))
}

/// Inserts missing commas between adjacent quoted scalars, iterating to
/// a fixed point within a bounded pass count.
fn insert_missing_commas(raw: &str) -> String {
    let mut current = raw.to_string();
    for _ in 0..MAX_REWRITE_PASSES {
        let next = ADJACENT_QUOTED_RE
            .replace_all(&current, "$1, $2")
            .into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Strips characters that break an inline quoted scalar from a rescued
/// title and escapes its remaining quotes.
fn prepare_inline_title(title: &str) -> String {
    title
        .replace('"', "\\\"")
        .replace(" - ", " ")
        .replace('|', "")
        .replace(['[', ']'], "")
}

/// Rewrites an `aliases: [...]` inline list into block style.
///
/// When the list's content loosely matches the rescued title, the list
/// collapses to a single normalized entry; otherwise items are split on
/// commas, unquoted, and re-quoted only when structurally needed.
fn rewrite_inline_aliases(text: &str, title: Option<&str>) -> String {
    let Some(captures) = INLINE_ALIASES_RE.captures(text) else {
        return text.to_string();
    };

    let raw_aliases = captures[1]
        .replace('"', "\\\"")
        .replace(" - ", " ")
        .replace('|', "")
        .replace(['[', ']'], "");

    let replacement = match title {
        Some(title)
            if !title.is_empty()
                && normalize_for_compare(&raw_aliases)
                    .contains(&normalize_for_compare(title)) =>
        {
            format!("aliases:\n  - \"{}\"", normalize_for_compare(title))
        }
        _ => {
            let joined = COMMA_SPLIT_RE
                .split(&raw_aliases)
                .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
                .map(|item| quote_if_significant(&item))
                .collect::<Vec<_>>()
                .join("\n  - ");
            format!("aliases:\n  - {joined}")
        }
    };

    INLINE_ALIASES_RE
        .replace(text, NoExpand(&replacement))
        .into_owned()
}

/// Rewrites a `tags: [...]` inline list into block style with spaces and
/// hyphens replaced by underscores.
fn rewrite_inline_tags(text: &str) -> String {
    let Some(captures) = INLINE_TAGS_RE.captures(text) else {
        return text.to_string();
    };

    let joined = COMMA_SPLIT_RE
        .split(&captures[1])
        .map(|item| {
            item.trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .replace(' ', "_")
                .replace('-', "_")
        })
        .map(|item| quote_if_significant(&item))
        .collect::<Vec<_>>()
        .join("\n  - ");

    INLINE_TAGS_RE
        .replace(text, NoExpand(&format!("tags:\n  - {joined}")))
        .into_owned()
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or("unknown parse error").to_string()
}
