//! Tests for frontmatter splitting.
//!
//! The body must survive a split/reassemble cycle byte for byte.

use omni_lint::{Frontmatter, MARKER, extract_frontmatter, split_document};

/// Test a well-formed document splits into mapping and body.
#[test]
fn test_split_parses_mapping_and_keeps_body() {
    let text = "---\nname: git\ndescription: Use when working with git\n---\n# Git\n\nBody.\n";
    let doc = split_document(text);

    let mapping = doc.frontmatter().mapping().unwrap();
    assert_eq!(mapping.len(), 2);
    assert_eq!(mapping.get("name").and_then(|v| v.as_str()), Some("git"));
    assert_eq!(doc.body(), "\n# Git\n\nBody.\n");
    assert_eq!(doc.original(), text);
}

/// Test key order of the parsed mapping follows the source.
#[test]
fn test_split_preserves_key_order() {
    let doc = split_document("---\nzeta: 1\nalpha: 2\nname: x\n---\n");
    let keys: Vec<&str> = doc
        .frontmatter()
        .mapping()
        .unwrap()
        .keys()
        .filter_map(|k| k.as_str())
        .collect();
    assert_eq!(keys, ["zeta", "alpha", "name"]);
}

/// Test a document without an opening marker is reported as missing.
#[test]
fn test_missing_frontmatter() {
    let text = "# Title\n\nNo frontmatter here.\n";
    let doc = split_document(text);
    assert_eq!(doc.frontmatter(), &Frontmatter::Missing);
    assert_eq!(doc.body(), text);
    assert_eq!(doc.original(), text);
}

/// Test invalid YAML and non-mapping YAML are malformed.
#[test]
fn test_malformed_frontmatter() {
    let broken = split_document("---\nname: [unclosed\n---\nbody\n");
    assert!(matches!(broken.frontmatter(), Frontmatter::Malformed(_)));

    let list = split_document("---\n- a\n- b\n---\nbody\n");
    assert!(matches!(list.frontmatter(), Frontmatter::Malformed(_)));
    assert_eq!(list.body(), "---\n- a\n- b\n---\nbody\n");
}

/// Test an empty block parses to an empty mapping.
#[test]
fn test_empty_frontmatter_is_empty_mapping() {
    let doc = split_document("---\n---\nbody\n");
    assert_eq!(doc.frontmatter().mapping().map(|m| m.len()), Some(0));
    assert_eq!(doc.body(), "\nbody\n");
}

/// Test markers inside the body are left alone.
#[test]
fn test_body_markers_are_not_frontmatter() {
    let text = "---\nname: a\n---\nintro\n---\nname: not-frontmatter\n---\n";
    let doc = split_document(text);
    assert_eq!(doc.source(), "name: a\n");
    assert_eq!(doc.body(), "\nintro\n---\nname: not-frontmatter\n---\n");
}

/// Test reassembling with new YAML keeps the body untouched.
#[test]
fn test_reassemble_replaces_only_frontmatter() {
    let text = "---\ndescription: d\nname: a\n---\n\n  indented body\n\ttabs\n";
    let doc = split_document(text);
    let updated = doc.reassemble("name: a\ndescription: d\n");
    assert_eq!(
        updated,
        format!("{MARKER}\nname: a\ndescription: d\n{MARKER}\n\n  indented body\n\ttabs\n")
    );
}

/// Test a body without a final newline stays that way.
#[test]
fn test_body_without_trailing_newline() {
    let doc = split_document("---\nname: a\n---\nlast line");
    assert_eq!(doc.body(), "\nlast line");
    assert!(doc.reassemble("name: b\n").ends_with("---\nlast line"));

    let bare = split_document("---\nname: a\n---");
    assert_eq!(bare.body(), "");
    assert_eq!(bare.reassemble("name: a\n"), "---\nname: a\n---");
}

/// Test raw extraction helper.
#[test]
fn test_extract_frontmatter() {
    assert_eq!(
        extract_frontmatter("---\nname: a\n---\nbody"),
        Some("name: a\n")
    );
    assert_eq!(extract_frontmatter("---\nname: a\n"), None);
    assert_eq!(extract_frontmatter(""), None);
}
