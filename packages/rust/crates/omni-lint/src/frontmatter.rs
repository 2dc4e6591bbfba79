//! YAML Frontmatter Splitting
//!
//! Separates an agent document into its frontmatter block and its body.
//! The block is delimited by a `---` line at the very start of the file and
//! the next line consisting of `---`; trailing whitespace on either marker
//! line is ignored. The body is everything after the closing marker,
//! including the line break that ends the marker line, and is handed back
//! untouched so a rewrite never perturbs it.

use serde_yaml::{Mapping, Value};

/// Delimiter line opening and closing the frontmatter block.
pub const MARKER: &str = "---";

/// Outcome of parsing the frontmatter block.
#[derive(Debug, Clone, PartialEq)]
pub enum Frontmatter {
    /// The block parsed to a YAML mapping (key order as written).
    Parsed(Mapping),
    /// The document does not start with a marker line or never closes it.
    Missing,
    /// The block exists but is not valid YAML or not a mapping.
    Malformed(String),
}

impl Frontmatter {
    /// Parsed mapping, if any.
    #[must_use]
    pub fn mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Parsed(mapping) => Some(mapping),
            Self::Missing | Self::Malformed(_) => None,
        }
    }
}

/// A document split at its frontmatter markers.
///
/// Borrows the original text; `original()` reproduces it byte for byte.
#[derive(Debug, Clone)]
pub struct Document<'a> {
    opening: &'a str,
    source: &'a str,
    body: &'a str,
    frontmatter: Frontmatter,
}

/// Byte offsets of a located frontmatter block.
struct Bounds {
    source_start: usize,
    source_end: usize,
    body_start: usize,
}

/// True for a line (with or without its line break) that is exactly the
/// marker, ignoring trailing whitespace.
fn is_marker_line(line: &str) -> bool {
    line.trim_end() == MARKER
}

fn locate(content: &str) -> Option<Bounds> {
    let opening = content.split_inclusive('\n').next()?;
    if !opening.ends_with('\n') || !is_marker_line(opening) {
        return None;
    }
    let source_start = opening.len();

    let mut offset = source_start;
    for line in content[source_start..].split_inclusive('\n') {
        if is_marker_line(line) {
            return Some(Bounds {
                source_start,
                source_end: offset,
                body_start: offset + MARKER.len(),
            });
        }
        offset += line.len();
    }
    None
}

/// Extract the raw YAML source between the two marker lines.
///
/// Returns `None` when the content does not open with a marker line or the
/// block is never closed.
///
/// ```
/// use omni_lint::extract_frontmatter;
///
/// let content = "---\nname: git\n---\n# Git\n";
/// assert_eq!(extract_frontmatter(content), Some("name: git\n"));
/// assert_eq!(extract_frontmatter("# No frontmatter\n"), None);
/// ```
#[must_use]
pub fn extract_frontmatter(content: &str) -> Option<&str> {
    locate(content).map(|bounds| &content[bounds.source_start..bounds.source_end])
}

/// Parse YAML frontmatter content into a serde value.
///
/// # Errors
///
/// Returns an error if the YAML is invalid.
pub fn parse_frontmatter(yaml_content: &str) -> Result<Value, serde_yaml::Error> {
    serde_yaml::from_str(yaml_content)
}

fn parse_mapping(source: &str) -> Frontmatter {
    if source.trim().is_empty() {
        return Frontmatter::Parsed(Mapping::new());
    }
    match parse_frontmatter(source) {
        Ok(Value::Mapping(mapping)) => Frontmatter::Parsed(mapping),
        Ok(Value::Null) => Frontmatter::Parsed(Mapping::new()),
        Ok(_) => Frontmatter::Malformed("frontmatter is not a mapping".to_string()),
        Err(e) => Frontmatter::Malformed(e.to_string()),
    }
}

/// Split a document into frontmatter and body.
///
/// Never fails: a missing or unparsable block is reported through
/// [`Frontmatter`] and the body is then the whole text.
#[must_use]
pub fn split_document(text: &str) -> Document<'_> {
    let Some(bounds) = locate(text) else {
        return Document {
            opening: "",
            source: "",
            body: text,
            frontmatter: Frontmatter::Missing,
        };
    };

    let source = &text[bounds.source_start..bounds.source_end];
    match parse_mapping(source) {
        Frontmatter::Parsed(mapping) => Document {
            opening: &text[..bounds.source_start],
            source,
            body: &text[bounds.body_start..],
            frontmatter: Frontmatter::Parsed(mapping),
        },
        other => Document {
            opening: "",
            source: "",
            body: text,
            frontmatter: other,
        },
    }
}

impl<'a> Document<'a> {
    /// Parse outcome of the frontmatter block.
    #[must_use]
    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    /// Body text: everything after the closing marker, or the whole text
    /// when no frontmatter was recognized.
    #[must_use]
    pub fn body(&self) -> &'a str {
        self.body
    }

    /// Raw YAML source between the markers (empty if not recognized).
    #[must_use]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Reconstruct the original text from its parts.
    #[must_use]
    pub fn original(&self) -> String {
        if self.frontmatter.mapping().is_none() {
            return self.body.to_string();
        }
        format!("{}{}{MARKER}{}", self.opening, self.source, self.body)
    }

    /// Assemble a new document from rendered YAML and the untouched body.
    ///
    /// `rendered` must end with a line break (as [`crate::render`] output does).
    #[must_use]
    pub fn reassemble(&self, rendered: &str) -> String {
        format!("{MARKER}\n{rendered}{MARKER}{}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closing_marker_must_be_its_own_line() {
        let text = "---\ndescription: a --- b\n---\nbody";
        let doc = split_document(text);
        assert_eq!(doc.source(), "description: a --- b\n");
        assert_eq!(doc.body(), "\nbody");
    }

    #[test]
    fn unclosed_block_is_missing() {
        let doc = split_document("---\nname: x\n");
        assert_eq!(doc.frontmatter(), &Frontmatter::Missing);
        assert_eq!(doc.body(), "---\nname: x\n");
    }

    #[test]
    fn marker_prefix_without_line_break_is_missing() {
        let doc = split_document("----\nname: x\n---\n");
        assert_eq!(doc.frontmatter(), &Frontmatter::Missing);
    }

    #[test]
    fn opening_marker_allows_trailing_whitespace() {
        let text = "--- \t\nname: x\n---  \nbody\n";
        let doc = split_document(text);
        assert_eq!(doc.source(), "name: x\n");
        assert_eq!(doc.body(), "  \nbody\n");
        assert_eq!(doc.original(), text);
        assert_eq!(split_document("---").frontmatter(), &Frontmatter::Missing);
    }

    #[test]
    fn crlf_documents_round_trip() {
        let text = "---\r\nname: x\r\n---\r\nbody\r\n";
        let doc = split_document(text);
        assert!(doc.frontmatter().mapping().is_some());
        assert_eq!(doc.body(), "\r\nbody\r\n");
        assert_eq!(doc.original(), text);
    }
}
