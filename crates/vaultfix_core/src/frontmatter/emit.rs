//! Frontmatter serialization and document reassembly.
//!
//! # Responsibility
//! - Serialize the normalized mapping as block-style YAML and rebuild
//!   the full document text around it.
//!
//! # Invariants
//! - List fields serialize in block style (`- item` per line), never
//!   inline bracket style.
//! - The emitted document always opens with `---` and closes the block
//!   with `---`.

use serde_yaml::Mapping;

/// Reassembles a document from its normalized mapping and existing body.
pub fn emit_document(mapping: &Mapping, body: &str) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{yaml}---\n{body}"))
}

/// Builds a document with freshly inserted frontmatter, prepending the
/// block to the original text trimmed of leading whitespace.
pub fn emit_new_document(mapping: &Mapping, original: &str) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(mapping)?;
    Ok(format!("---\n{yaml}---\n{}", original.trim_start()))
}

#[cfg(test)]
mod tests {
    use super::{emit_document, emit_new_document};
    use serde_yaml::{Mapping, Value};

    fn key(name: &str) -> Value {
        Value::String(name.to_string())
    }

    #[test]
    fn lists_serialize_in_block_style() {
        let mut mapping = Mapping::new();
        mapping.insert(key("title"), Value::String("Note".into()));
        mapping.insert(
            key("tags"),
            Value::Sequence(vec![Value::String("alpha".into()), Value::String("beta".into())]),
        );

        let text = emit_document(&mapping, "body").expect("emit should succeed");
        assert!(text.starts_with("---\n"));
        assert!(text.contains("tags:\n- alpha\n- beta\n"));
        assert!(!text.contains("tags: ["));
        assert!(text.ends_with("---\nbody"));
    }

    #[test]
    fn new_document_trims_leading_whitespace_from_body() {
        let mut mapping = Mapping::new();
        mapping.insert(key("title"), Value::String("Note".into()));

        let text =
            emit_new_document(&mapping, "\n\n# Heading\ncontent").expect("emit should succeed");
        assert_eq!(text, "---\ntitle: Note\n---\n# Heading\ncontent");
    }

    #[test]
    fn emitted_document_round_trips_through_extraction() {
        let mut mapping = Mapping::new();
        mapping.insert(key("title"), Value::String("Note".into()));

        let text = emit_document(&mapping, "body").expect("emit should succeed");
        let block = crate::frontmatter::extract::extract_frontmatter(&text)
            .expect("emitted document should extract");
        assert_eq!(block.raw, "title: Note");
        assert_eq!(block.body, "body");
    }
}
