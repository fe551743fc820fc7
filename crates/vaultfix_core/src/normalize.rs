//! Stateless text-cleaning primitives.
//!
//! # Responsibility
//! - Provide the quote-stripping, whitespace-collapsing and tag
//!   sanitization helpers shared by the pre-fixers, the rescue parser
//!   and the field normalizer.
//!
//! # Invariants
//! - Every function is a pure `&str -> String` transform.
//! - `clean_malformed_title` terminates within a fixed unescape depth.
//! - Sanitized tags contain no whitespace, uppercase letters or hyphens.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Unescape depth cap for over-escaped titles; prevents pathological
/// inputs from looping.
const MAX_TITLE_UNESCAPE_DEPTH: usize = 5;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static SIGNIFICANT_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,:|]").expect("valid significant-char regex"));
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w]").expect("valid non-word regex"));
static LEADING_QUOTE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^['"]{2,}"#).expect("valid leading quote-run regex"));
static TRAILING_QUOTE_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"['"]{2,}$"#).expect("valid trailing quote-run regex"));

/// Strips surrounding single/double quotes and whitespace.
pub fn strip_extra_quotes(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

/// Collapses internal whitespace runs to single spaces and trims.
pub fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value.trim(), " ").into_owned()
}

/// Canonical list-item form: unquoted, whitespace-collapsed, `?` free.
pub fn normalize_item(value: &str) -> String {
    collapse_whitespace(&strip_extra_quotes(value))
        .replace('?', "")
        .trim()
        .to_string()
}

/// Loose equivalence form for title/alias comparison: quotes and square
/// brackets removed, whitespace collapsed, lowercased.
pub fn normalize_for_compare(value: &str) -> String {
    let stripped = value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .replace(['[', ']'], "");
    collapse_whitespace(&stripped).to_lowercase()
}

/// Unwraps over-escaped or quote-wrapped title scalars.
///
/// Repeats unescaping (`\\`, `\"`, `\'`), wrapping-quote removal and
/// quote-run trimming until a fixed point, capped at a bounded depth.
pub fn clean_malformed_title(raw: &str) -> String {
    let mut current = raw.trim().to_string();
    let mut previous: Option<String> = None;

    for _ in 0..MAX_TITLE_UNESCAPE_DEPTH {
        if previous.as_deref() == Some(current.as_str()) {
            break;
        }
        previous = Some(current.clone());

        current = current
            .replace("\\\\", "\\")
            .replace("\\\"", "\"")
            .replace("\\'", "'");

        loop {
            let trimmed = current.trim();
            let wrapped = trimmed.len() >= 2
                && ((trimmed.starts_with('"') && trimmed.ends_with('"'))
                    || (trimmed.starts_with('\'') && trimmed.ends_with('\'')));
            if !wrapped {
                break;
            }
            current = trimmed[1..trimmed.len() - 1].trim().to_string();
        }

        current = LEADING_QUOTE_RUN_RE.replace(&current, "").into_owned();
        current = TRAILING_QUOTE_RUN_RE.replace(&current, "").into_owned();
    }

    current.trim().to_string()
}

/// Whether an item contains characters that break inline YAML scalars
/// (whitespace, comma, colon, pipe).
pub fn needs_quoting(item: &str) -> bool {
    SIGNIFICANT_CHAR_RE.is_match(item)
}

/// Wraps an item in double quotes when it contains structurally
/// significant characters, otherwise returns it untouched.
pub fn quote_if_significant(item: &str) -> String {
    if needs_quoting(item) {
        format!("\"{item}\"")
    } else {
        item.to_string()
    }
}

/// Canonical tag form: spaces and hyphens become underscores, remaining
/// non-word characters are stripped, result is lowercased.
pub fn sanitize_tag(tag: &str) -> String {
    let underscored = tag.trim().replace(' ', "_").replace('-', "_");
    NON_WORD_RE.replace_all(&underscored, "").to_lowercase()
}

/// Sanitizes, de-duplicates and sorts a raw tag list.
///
/// Empty results of sanitization are dropped rather than kept as blank
/// tags.
pub fn clean_tags(raw_tags: &[String]) -> Vec<String> {
    let cleaned: BTreeSet<String> = raw_tags
        .iter()
        .map(|tag| sanitize_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect();
    cleaned.into_iter().collect()
}

/// Splits a comma-separated scalar into trimmed, non-empty items.
pub fn split_comma_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        clean_malformed_title, clean_tags, collapse_whitespace, normalize_for_compare,
        normalize_item, quote_if_significant, sanitize_tag, split_comma_list, strip_extra_quotes,
    };

    #[test]
    fn strip_extra_quotes_removes_mixed_wrapping() {
        assert_eq!(strip_extra_quotes("\"'My Note'\""), "My Note");
        assert_eq!(strip_extra_quotes("  plain  "), "plain");
    }

    #[test]
    fn normalize_item_collapses_and_drops_question_marks() {
        assert_eq!(normalize_item("  \"What  is   this?\"  "), "What is this");
    }

    #[test]
    fn normalize_for_compare_is_case_and_bracket_insensitive() {
        assert_eq!(
            normalize_for_compare("[My   Note]"),
            normalize_for_compare("\"my note\"")
        );
    }

    #[test]
    fn clean_malformed_title_unwraps_nested_quotes() {
        assert_eq!(clean_malformed_title("\"\\\"Deep Title\\\"\""), "Deep Title");
        assert_eq!(clean_malformed_title("''''Odd''''"), "Odd");
    }

    #[test]
    fn clean_malformed_title_reaches_fixed_point_on_plain_input() {
        assert_eq!(clean_malformed_title("Plain Title"), "Plain Title");
    }

    #[test]
    fn sanitize_tag_lowercases_and_underscores() {
        assert_eq!(sanitize_tag("Machine Learning"), "machine_learning");
        assert_eq!(sanitize_tag("type-system"), "type_system");
        assert_eq!(sanitize_tag("c++ (notes)"), "c_notes");
    }

    #[test]
    fn clean_tags_dedupes_and_sorts() {
        let raw = vec![
            "Rust".to_string(),
            "rust".to_string(),
            "async io".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(clean_tags(&raw), vec!["async_io", "rust"]);
    }

    #[test]
    fn quote_if_significant_only_quotes_when_needed() {
        assert_eq!(quote_if_significant("plain"), "plain");
        assert_eq!(quote_if_significant("two words"), "\"two words\"");
        assert_eq!(quote_if_significant("a:b"), "\"a:b\"");
    }

    #[test]
    fn split_comma_list_skips_empty_entries() {
        assert_eq!(split_comma_list("a, , b,"), vec!["a", "b"]);
    }

    #[test]
    fn collapse_whitespace_handles_tabs_and_newlines() {
        assert_eq!(collapse_whitespace("a\t b\n  c"), "a b c");
    }
}
