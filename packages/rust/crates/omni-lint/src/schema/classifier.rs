//! Schema Classifier - picks the schema for a document path.
//!
//! In automatic mode the path's segments decide: a segment equal to
//! `opencode` selects the OpenCode schema, otherwise a segment equal to
//! `claude` selects the Claude schema. OpenCode is checked first, so a path
//! containing both segments is always OpenCode, wherever they occur.
//! Depth does not matter, only segment names.

use std::fmt;
use std::path::{Component, Path};
use std::str::FromStr;

use super::registry::{Schema, SchemaKind, SchemaRegistry};

/// How the schema for each file is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaSelection {
    /// Infer from path segments; unmatched paths are skipped.
    #[default]
    Auto,
    /// Use this schema for every file.
    Forced(SchemaKind),
}

impl SchemaSelection {
    /// True for automatic selection.
    #[must_use]
    pub const fn is_auto(self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl FromStr for SchemaSelection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Forced)
    }
}

impl fmt::Display for SchemaSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Forced(kind) => write!(f, "{kind}"),
        }
    }
}

fn has_segment(path: &Path, segment: &str) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name == segment,
        _ => false,
    })
}

/// Schema kind for `path`, or `None` when the path is unclassified.
#[must_use]
pub fn classify_kind(path: &Path, selection: SchemaSelection) -> Option<SchemaKind> {
    match selection {
        SchemaSelection::Forced(kind) => Some(kind),
        SchemaSelection::Auto => SchemaKind::ALL
            .into_iter()
            .find(|kind| has_segment(path, kind.as_str())),
    }
}

/// Resolve the schema for `path` against a registry.
#[must_use]
pub fn classify<'r>(
    path: &Path,
    selection: SchemaSelection,
    registry: &'r SchemaRegistry,
) -> Option<&'r Schema> {
    classify_kind(path, selection).map(|kind| registry.get(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_match_is_exact() {
        assert_eq!(
            classify_kind(Path::new("agents/opencode.md"), SchemaSelection::Auto),
            None
        );
        assert_eq!(
            classify_kind(Path::new("opencode-old/a.md"), SchemaSelection::Auto),
            None
        );
    }

    #[test]
    fn selection_parses_from_cli_values() {
        assert_eq!("auto".parse(), Ok(SchemaSelection::Auto));
        assert_eq!(
            "claude".parse(),
            Ok(SchemaSelection::Forced(SchemaKind::Claude))
        );
        assert!("gemini".parse::<SchemaSelection>().is_err());
    }
}
