//! Known-field normalization and required-field defaults.
//!
//! # Responsibility
//! - Normalize `aliases`, `tags`, `topics` and `categories` to canonical
//!   de-duplicated list form on the parsed mapping.
//! - Fill required fields (`title`, `created`, `tags`) with computed
//!   defaults from the note identity and run configuration.
//!
//! # Invariants
//! - A mapping that is already canonical reports no modification, so an
//!   unchanged file is never rewritten.
//! - Unexpected value shapes are coerced, never a per-file failure.
//! - Tag lists contain no whitespace, uppercase letters or hyphens and
//!   are sorted.

use crate::config::VaultConfig;
use crate::model::document::{scalar_to_string, FieldValue, NoteIdentity};
use crate::normalize::{
    clean_tags, normalize_item, quote_if_significant, split_comma_list, strip_extra_quotes,
};
use serde_yaml::{Mapping, Value};

/// Fields normalized to list form when present.
const LIST_FIELDS: &[&str] = &["aliases", "tags", "topics", "categories"];

fn key(name: &str) -> Value {
    Value::String(name.to_string())
}

/// Normalizes known fields in place and fills required defaults.
///
/// Returns whether anything actually changed.
pub fn normalize_fields(
    mapping: &mut Mapping,
    note: &NoteIdentity,
    config: &VaultConfig,
) -> bool {
    let mut modified = false;

    let title_value = match FieldValue::from_yaml(mapping.get(&key("title"))) {
        FieldValue::Scalar(title) => Some(title),
        _ => None,
    };

    for &field in LIST_FIELDS {
        let Some(current) = mapping.get(&key(field)) else {
            continue;
        };
        let title_for_field = if field == "aliases" {
            title_value.as_deref()
        } else {
            None
        };
        let cleaned = sanitize_list_field(FieldValue::from_yaml(Some(current)), title_for_field);
        let cleaned_value = to_string_sequence(&cleaned);
        if &cleaned_value != current {
            mapping.insert(key(field), cleaned_value);
            modified = true;
        }
    }

    if let Some(current) = mapping.get(&key("tags")) {
        let cleaned_value = to_string_sequence(&coerce_tags(current));
        if &cleaned_value != current {
            mapping.insert(key("tags"), cleaned_value);
            modified = true;
        }
    }

    if config.requires("title") && !mapping.contains_key(&key("title")) {
        mapping.insert(key("title"), Value::String(note.stem.clone()));
        modified = true;
    }
    if config.requires("created") && !mapping.contains_key(&key("created")) {
        mapping.insert(key("created"), Value::String(note.created_iso()));
        modified = true;
    }
    if config.requires("tags") && !mapping.contains_key(&key("tags")) {
        mapping.insert(
            key("tags"),
            to_string_sequence(&[config.default_tag.clone()]),
        );
        modified = true;
    }

    modified
}

/// Coerces one list-valued field to canonical list form.
///
/// String values are first tried as a literal list expression, then
/// treated as a single item. An `aliases` list of length one whose sole
/// item loosely matches the title collapses to the normalized title.
pub fn sanitize_list_field(value: FieldValue, title: Option<&str>) -> Vec<String> {
    match value {
        FieldValue::Absent => Vec::new(),
        FieldValue::Scalar(scalar) => {
            let stripped = strip_extra_quotes(&scalar);
            let items = parse_literal_list(&stripped).unwrap_or_else(|| vec![stripped]);
            normalize_list_items(&items, title)
        }
        FieldValue::List(items) => normalize_list_items(&items, title),
    }
}

/// Coerces the `tags` value through full tag sanitization.
pub fn coerce_tags(value: &Value) -> Vec<String> {
    let raw = match FieldValue::from_yaml(Some(value)) {
        FieldValue::Scalar(scalar) => split_comma_list(&scalar),
        FieldValue::List(items) => items,
        FieldValue::Absent => Vec::new(),
    };
    clean_tags(&raw)
}

/// Tries to read a string as a bracketed literal list, e.g. a frontmatter
/// value that itself contains `[a, b]` as text.
fn parse_literal_list(value: &str) -> Option<Vec<String>> {
    if !(value.starts_with('[') && value.ends_with(']')) {
        return None;
    }
    match serde_yaml::from_str::<Value>(value).ok()? {
        Value::Sequence(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
        _ => None,
    }
}

fn normalize_list_items(items: &[String], title: Option<&str>) -> Vec<String> {
    if let Some(title) = title {
        let normalized_title = normalize_item(title);
        // Comparison is case-insensitive; the collapsed value keeps the
        // title's own casing.
        if items.len() == 1
            && normalize_item(&items[0]).to_lowercase() == normalized_title.to_lowercase()
        {
            return vec![normalized_title];
        }
    }

    items
        .iter()
        .map(|item| quote_if_significant(&normalize_item(item)))
        .collect()
}

fn to_string_sequence(items: &[String]) -> Value {
    Value::Sequence(items.iter().cloned().map(Value::String).collect())
}
