//! Canonical frontmatter rendering.
//!
//! Canonical form: the schema's recognized keys first, in canonical order
//! (only those present), then every other key in its original relative
//! order. Rendering is deterministic: the same mapping always produces the
//! same YAML text.

use serde_yaml::{Mapping, Value};

use crate::error::Result;
use crate::frontmatter::Document;
use crate::schema::Schema;

/// True if the recognized keys of `metadata` already follow `order`.
///
/// Unrecognized keys are ignored, wherever they sit.
#[must_use]
pub fn is_canonical(metadata: &Mapping, order: &[String]) -> bool {
    let expected = order
        .iter()
        .map(String::as_str)
        .filter(|key| metadata.contains_key(*key));
    let current = metadata
        .keys()
        .filter_map(Value::as_str)
        .filter(|key| order.iter().any(|k| k == key));
    expected.eq(current)
}

/// Copy of `metadata` with canonical keys first and the rest appended.
#[must_use]
pub fn reorder(metadata: &Mapping, order: &[String]) -> Mapping {
    let mut ordered = Mapping::with_capacity(metadata.len());
    for key in order {
        if let Some(value) = metadata.get(key.as_str()) {
            ordered.insert(Value::from(key.as_str()), value.clone());
        }
    }
    for (key, value) in metadata {
        if !ordered.contains_key(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    ordered
}

/// Plain scalars that YAML 1.1 readers resolve to booleans but YAML 1.2
/// (and therefore `serde_yaml`) treats as strings.
const YAML11_BOOL_WORDS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

fn contains_text(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(s) => s.contains(needle),
        Value::Sequence(items) => items.iter().any(|v| contains_text(v, needle)),
        Value::Mapping(map) => map
            .iter()
            .any(|(k, v)| contains_text(k, needle) || contains_text(v, needle)),
        Value::Tagged(tagged) => contains_text(&tagged.value, needle),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Replaces YAML 1.1 boolean words with placeholders that serialize as
/// plain scalars, remembering each word for [`Masker::restore`].
struct Masker {
    prefix: String,
    words: Vec<String>,
}

impl Masker {
    fn new(root: &Value) -> Self {
        let mut prefix = String::from("__yaml11_");
        while contains_text(root, &prefix) {
            prefix.push('_');
        }
        Self {
            prefix,
            words: Vec::new(),
        }
    }

    fn mask(&mut self, value: &Value) -> Value {
        match value {
            Value::String(s) if YAML11_BOOL_WORDS.contains(&s.as_str()) => {
                let token = format!("{}{}__", self.prefix, self.words.len());
                self.words.push(s.clone());
                Value::String(token)
            }
            Value::Sequence(items) => Value::Sequence(items.iter().map(|v| self.mask(v)).collect()),
            Value::Mapping(map) => {
                let mut masked = Mapping::with_capacity(map.len());
                for (k, v) in map {
                    let key = self.mask(k);
                    let value = self.mask(v);
                    masked.insert(key, value);
                }
                Value::Mapping(masked)
            }
            Value::Tagged(tagged) => {
                let mut tagged = tagged.clone();
                tagged.value = self.mask(&tagged.value);
                Value::Tagged(tagged)
            }
            other => other.clone(),
        }
    }

    fn restore(&self, mut yaml: String) -> String {
        for (index, word) in self.words.iter().enumerate() {
            let token = format!("{}{index}__", self.prefix);
            yaml = yaml.replace(&token, &format!("'{word}'"));
        }
        yaml
    }
}

/// Render `metadata` as YAML in canonical order for `schema`.
///
/// The output always ends with a line break. Strings such as `yes` or `off`
/// are single-quoted so YAML 1.1 readers keep them as strings.
///
/// # Errors
///
/// Returns an error if the mapping cannot be serialized.
pub fn render(metadata: &Mapping, schema: &Schema) -> Result<String> {
    let ordered = Value::Mapping(reorder(metadata, &schema.canonical_order));
    let mut masker = Masker::new(&ordered);
    let masked = masker.mask(&ordered);
    let mut yaml = masker.restore(serde_yaml::to_string(&masked)?);
    if !yaml.ends_with('\n') {
        yaml.push('\n');
    }
    Ok(yaml)
}

/// Full document text with the frontmatter replaced and the body kept
/// byte for byte.
///
/// # Errors
///
/// Returns an error if the mapping cannot be serialized.
pub fn rewrite(document: &Document<'_>, metadata: &Mapping, schema: &Schema) -> Result<String> {
    Ok(document.reassemble(&render(metadata, schema)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap_or_default()
    }

    fn order(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| (*k).to_string()).collect()
    }

    #[test]
    fn yaml11_bool_words_are_quoted() {
        let schema = Schema::claude(
            &crate::schema::RuleTables::default(),
            crate::schema::SchemaFlags::default(),
        );
        let m = mapping("name: r\nzeta: \"yes\"\nflags:\n  \"on\": true\n  list: [\"n\", \"no way\"]\nreal: true\n");
        let yaml = render(&m, &schema).unwrap_or_default();
        assert!(yaml.starts_with("name: r\nzeta: 'yes'\n"), "{yaml}");
        assert!(yaml.contains("  'on': true\n"), "{yaml}");
        assert!(yaml.contains("- 'n'\n"), "{yaml}");
        assert!(yaml.contains("- no way\n"), "{yaml}");
        assert!(yaml.ends_with("real: true\n"), "{yaml}");
        let back: Mapping = serde_yaml::from_str(&yaml).unwrap_or_default();
        assert_eq!(back, m);
    }

    #[test]
    fn unknown_keys_do_not_affect_canonical_check() {
        let m = mapping("extra: 1\nname: a\nother: 2\ndescription: b\n");
        assert!(is_canonical(&m, &order(&["name", "description"])));
    }

    #[test]
    fn reorder_appends_unknown_keys_in_original_order() {
        let m = mapping("zeta: 1\ndescription: b\nalpha: 2\nname: a\n");
        let keys: Vec<String> = reorder(&m, &order(&["name", "description"]))
            .keys()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        assert_eq!(keys, ["name", "description", "zeta", "alpha"]);
    }
}
