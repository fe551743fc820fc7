//! Structural pre-fixers for raw note text.
//!
//! # Responsibility
//! - Repair line-level corruption patterns that break the frontmatter
//!   delimiters before any YAML parse is attempted.
//!
//! # Invariants
//! - Each fixer is idempotent: applying it twice equals applying it once.
//! - Fixers rewrite only the matched lines and never reorder content.
//! - A document containing none of the corruption patterns is returned
//!   byte-identical, trailing newline included.

use once_cell::sync::Lazy;
use regex::Regex;

static DANGLING_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^---(.)").expect("valid dangling delimiter regex"));
static INLINE_ALIAS_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^aliases\s*:\s*\[(https?://[^\]]+)\]$").expect("valid alias url regex"));
static BARE_SOURCE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^source\s*:\s*(https?://[^\]]+)$").expect("valid source url regex"));

/// Applies all structural pre-fixers in canonical order.
pub fn apply_prefixers(content: &str) -> String {
    let fixed = fix_dangling_heading(content);
    let fixed = fix_multiline_alias_url(&fixed);
    let fixed = quote_url_like_aliases(&fixed);
    quote_url_like_source(&fixed)
}

/// Splits a delimiter glued to following text: `---# Heading` becomes
/// `---` and `# Heading` on separate lines.
pub fn fix_dangling_heading(content: &str) -> String {
    DANGLING_DELIMITER_RE
        .replace_all(content, "---\n$1")
        .into_owned()
}

/// Collapses a broken two-line alias list into a quoted block list:
///
/// ```text
/// aliases: [
///     https://example.com/a]
/// ```
///
/// becomes `aliases:` with a single `- "https://example.com/a"` entry,
/// consuming both lines.
pub fn fix_multiline_alias_url(content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let mut fixed: Vec<String> = Vec::with_capacity(lines.len());
    let mut changed = false;
    let mut index = 0;

    while index < lines.len() {
        // The opening must be exactly `aliases: [`; an opening carrying
        // inline content is out of scope and must not lose that content.
        if lines[index].trim() == "aliases: [" && index + 1 < lines.len() {
            let next = lines[index + 1].trim();
            if next.starts_with("http://") || next.starts_with("https://") {
                let url = next.trim_end_matches(']');
                fixed.push("aliases:".to_string());
                fixed.push(format!("  - \"{url}\""));
                changed = true;
                index += 2;
                continue;
            }
        }
        fixed.push(lines[index].to_string());
        index += 1;
    }

    if !changed {
        return content.to_string();
    }
    with_trailing_newline(content, fixed.join("\n"))
}

/// Rewrites an inline bracketed URL alias into a quoted block list:
/// `aliases: [https://…]` becomes `aliases:` + `- "https://…"`.
pub fn quote_url_like_aliases(content: &str) -> String {
    if !content
        .lines()
        .any(|line| INLINE_ALIAS_URL_RE.is_match(line.trim()))
    {
        return content.to_string();
    }

    let rebuilt = content
        .lines()
        .map(|line| match INLINE_ALIAS_URL_RE.captures(line.trim()) {
            Some(captures) => {
                let url = captures[1].trim();
                format!("aliases:\n  - \"{url}\"")
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    with_trailing_newline(content, rebuilt)
}

/// Quotes a bare URL `source:` scalar so the colon inside the URL does
/// not terminate the YAML key.
pub fn quote_url_like_source(content: &str) -> String {
    if !content
        .lines()
        .any(|line| BARE_SOURCE_URL_RE.is_match(line.trim()))
    {
        return content.to_string();
    }

    let rebuilt = content
        .lines()
        .map(|line| match BARE_SOURCE_URL_RE.captures(line.trim()) {
            Some(captures) => {
                let url = captures[1].trim();
                format!("source: \"{url}\"")
            }
            None => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n");
    with_trailing_newline(content, rebuilt)
}

/// The line-based rebuilds lose the final newline; a repaired document
/// must keep the original's trailing newline so the only textual
/// changes are the matched lines themselves.
fn with_trailing_newline(original: &str, mut rebuilt: String) -> String {
    if original.ends_with('\n') && !rebuilt.ends_with('\n') {
        rebuilt.push('\n');
    }
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::{
        apply_prefixers, fix_dangling_heading, fix_multiline_alias_url, quote_url_like_aliases,
        quote_url_like_source,
    };

    #[test]
    fn dangling_heading_is_split_onto_its_own_line() {
        assert_eq!(fix_dangling_heading("---# Heading"), "---\n# Heading");
        assert_eq!(
            fix_dangling_heading("---\ntitle: x\n---# Intro\nbody"),
            "---\ntitle: x\n---\n# Intro\nbody"
        );
    }

    #[test]
    fn bare_delimiter_lines_are_left_alone() {
        let text = "---\ntitle: x\n---\nbody";
        assert_eq!(fix_dangling_heading(text), text);
    }

    #[test]
    fn multiline_alias_url_collapses_both_lines() {
        let broken = "title: x\naliases: [\nhttps://example.com/a]\ntags: []";
        assert_eq!(
            fix_multiline_alias_url(broken),
            "title: x\naliases:\n  - \"https://example.com/a\"\ntags: []"
        );
    }

    #[test]
    fn inline_alias_url_becomes_block_list() {
        assert_eq!(
            quote_url_like_aliases("aliases: [https://example.com/page]"),
            "aliases:\n  - \"https://example.com/page\""
        );
    }

    #[test]
    fn bare_source_url_gets_quoted() {
        assert_eq!(
            quote_url_like_source("source: https://example.com/page"),
            "source: \"https://example.com/page\""
        );
        let already_quoted = "source: \"https://example.com/page\"";
        assert_eq!(quote_url_like_source(already_quoted), already_quoted);
    }

    #[test]
    fn prefixers_are_idempotent() {
        let broken =
            "---# Title\ntitle: x\naliases: [\nhttps://example.com/a]\nsource: https://example.com/b\n---\nbody";
        let once = apply_prefixers(broken);
        let twice = apply_prefixers(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn non_url_alias_continuation_is_untouched() {
        let text = "aliases: [\nplain alias]";
        assert_eq!(fix_multiline_alias_url(text), text);
    }

    #[test]
    fn clean_document_with_trailing_newline_stays_byte_identical() {
        let clean = "---\ntitle: note\ntags:\n- inbox\n---\nbody\n";
        assert_eq!(apply_prefixers(clean), clean);
    }

    #[test]
    fn matched_fixers_keep_the_trailing_newline() {
        assert_eq!(
            quote_url_like_source("source: https://example.com/a\n"),
            "source: \"https://example.com/a\"\n"
        );
        assert_eq!(
            quote_url_like_aliases("aliases: [https://example.com/a]\n"),
            "aliases:\n  - \"https://example.com/a\"\n"
        );
        assert_eq!(
            fix_multiline_alias_url("aliases: [\nhttps://example.com/a]\n"),
            "aliases:\n  - \"https://example.com/a\"\n"
        );
    }

    #[test]
    fn alias_opening_with_inline_content_is_not_consumed() {
        let text = "aliases: [kept item,\nhttps://example.com/a]";
        assert_eq!(fix_multiline_alias_url(text), text);
    }
}
