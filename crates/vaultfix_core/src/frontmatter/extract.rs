//! Frontmatter block extraction.
//!
//! # Responsibility
//! - Split a document into its frontmatter region and body.
//!
//! # Invariants
//! - Only the first two delimiter lines count; later `---` lines belong
//!   to the body.
//! - Documents without a complete delimiter pair return `None`, never an
//!   error.

/// Delimited frontmatter region split out of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterBlock {
    /// Raw text strictly between the two delimiter lines.
    pub raw: String,
    /// Everything after the closing delimiter line.
    pub body: String,
    /// Zero-based line index of the closing delimiter.
    pub end_line: usize,
}

/// Finds the delimited frontmatter region in `content`.
///
/// The document must open with a `---` line (surrounding whitespace
/// tolerated) and contain a second line that is exactly `---`. Documents
/// with fewer than three lines or no closing delimiter yield `None`.
pub fn extract_frontmatter(content: &str) -> Option<FrontmatterBlock> {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 3 || lines[0].trim() != "---" {
        return None;
    }

    let end_line = lines[1..].iter().position(|line| *line == "---")? + 1;
    let raw = lines[1..end_line].join("\n");
    let body = lines[end_line + 1..].join("\n");

    Some(FrontmatterBlock {
        raw,
        body,
        end_line,
    })
}

#[cfg(test)]
mod tests {
    use super::extract_frontmatter;

    #[test]
    fn splits_frontmatter_and_body() {
        let doc = "---\ntitle: Note\ntags:\n  - a\n---\nbody line\nmore body";
        let block = extract_frontmatter(doc).expect("block should be found");
        assert_eq!(block.raw, "title: Note\ntags:\n  - a");
        assert_eq!(block.body, "body line\nmore body");
        assert_eq!(block.end_line, 4);
    }

    #[test]
    fn document_without_opening_delimiter_is_absent() {
        assert!(extract_frontmatter("# Just a heading\nbody").is_none());
    }

    #[test]
    fn missing_closing_delimiter_is_absent() {
        assert!(extract_frontmatter("---\ntitle: Note\nbody").is_none());
    }

    #[test]
    fn short_documents_are_absent() {
        assert!(extract_frontmatter("---\n---").is_none());
        assert!(extract_frontmatter("").is_none());
    }

    #[test]
    fn empty_frontmatter_region_is_allowed() {
        let block = extract_frontmatter("---\n---\nbody").expect("empty block");
        assert_eq!(block.raw, "");
        assert_eq!(block.body, "body");
    }

    #[test]
    fn later_delimiters_stay_in_the_body() {
        let doc = "---\ntitle: Note\n---\nintro\n---\noutro";
        let block = extract_frontmatter(doc).expect("block should be found");
        assert_eq!(block.body, "intro\n---\noutro");
    }
}
