//! Scan Driver - walks roots, lints every classified document, aggregates.
//!
//! Per file: classify, then split, validate and (if the engine changed the
//! mapping) rewrite. Unclassified files are skipped without being counted.
//! A missing or malformed frontmatter block ends processing of that file
//! with a single violation.
//!
//! # Example
//!
//! ```ignore
//! use omni_lint::{ScanOptions, SchemaRegistry, Scanner};
//!
//! let registry = SchemaRegistry::default();
//! let options = ScanOptions::new(vec!["opencode".into()]);
//! let report = Scanner::new(&registry).run(&options)?;
//! println!("{report}");
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::canonical::rewrite;
use crate::engine::{LintOptions, MISSING_FRONTMATTER, Violation, validate};
use crate::error::{LintError, Result};
use crate::frontmatter::{Frontmatter, split_document};
use crate::report::ScanReport;
use crate::schema::{Schema, SchemaKind, SchemaRegistry, SchemaSelection, classify_kind};

/// Extension of agent documents.
pub const DOCUMENT_EXTENSION: &str = "md";

/// What to scan and how.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Root directories (or single documents) to scan.
    pub roots: Vec<PathBuf>,
    /// Schema selection strategy.
    pub selection: SchemaSelection,
    /// Rule switches.
    pub lint: LintOptions,
}

impl ScanOptions {
    /// Options for `roots` with automatic schema selection and no auto-fix.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }
}

/// Result of linting one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Document path.
    pub path: PathBuf,
    /// Schema it was validated against.
    pub schema: SchemaKind,
    /// Violations in rule order.
    pub violations: Vec<Violation>,
    /// True if the document was rewritten.
    pub changed: bool,
}

fn malformed_outcome(path: &Path, schema: &Schema) -> FileOutcome {
    FileOutcome {
        path: path.to_path_buf(),
        schema: schema.kind,
        violations: vec![Violation::new(path, MISSING_FRONTMATTER)],
        changed: false,
    }
}

/// Lints documents against a registry.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Scanner<'r> {
    /// Create a scanner bound to `registry`.
    #[must_use]
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    /// All documents under `root`, in lexical order.
    ///
    /// Unreadable entries are logged and skipped.
    #[must_use]
    pub fn discover(root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {e}", root.display());
                    None
                }
            })
            .filter(|entry| {
                entry.file_type().is_file()
                    && entry
                        .path()
                        .extension()
                        .is_some_and(|ext| ext == DOCUMENT_EXTENSION)
            })
            .map(walkdir::DirEntry::into_path)
            .collect()
    }

    /// Lint one document, rewriting it when auto-fix changed its frontmatter.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not UTF-8, or cannot
    /// be written back.
    pub fn lint_file(
        &self,
        path: &Path,
        kind: SchemaKind,
        options: &LintOptions,
    ) -> Result<FileOutcome> {
        let schema = self.registry.get(kind);
        let bytes = fs::read(path).map_err(|e| LintError::io(path, e))?;
        let text = String::from_utf8(bytes).map_err(|_| LintError::Encoding(path.to_path_buf()))?;
        let document = split_document(&text);

        let metadata = match document.frontmatter() {
            Frontmatter::Parsed(mapping) => mapping,
            Frontmatter::Missing => {
                log::debug!("{}: no frontmatter block", path.display());
                return Ok(malformed_outcome(path, schema));
            }
            Frontmatter::Malformed(reason) => {
                log::debug!("{}: unparsable frontmatter: {reason}", path.display());
                return Ok(malformed_outcome(path, schema));
            }
        };

        let validation = validate(path, metadata, schema, options);
        if validation.changed {
            let updated = rewrite(&document, &validation.metadata, schema)?;
            fs::write(path, updated).map_err(|e| LintError::io(path, e))?;
            log::info!("Rewrote frontmatter of {}", path.display());
        }

        log::debug!(
            "{}: {} violation(s) against {} schema",
            path.display(),
            validation.violations.len(),
            schema.name()
        );

        Ok(FileOutcome {
            path: path.to_path_buf(),
            schema: schema.kind,
            violations: validation.violations,
            changed: validation.changed,
        })
    }

    /// Scan every root and aggregate the results.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::NothingClassified`] if no document under any
    /// root matched a schema, or the first I/O error hit while linting.
    pub fn run(&self, options: &ScanOptions) -> Result<ScanReport> {
        self.run_with(options, |_| {})
    }

    /// Like [`Scanner::run`], calling `on_missing_root` for each requested
    /// root that does not exist, as soon as it is seen. The callback fires
    /// even when the scan later fails with [`LintError::NothingClassified`].
    ///
    /// # Errors
    ///
    /// See [`Scanner::run`].
    pub fn run_with(
        &self,
        options: &ScanOptions,
        mut on_missing_root: impl FnMut(&Path),
    ) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        for root in &options.roots {
            if !root.exists() {
                log::debug!("Root not found: {}", root.display());
                on_missing_root(root);
                report.missing_roots.push(root.clone());
                continue;
            }
            for path in Self::discover(root) {
                let Some(kind) = classify_kind(&path, options.selection) else {
                    log::debug!("Skipping unclassified {}", path.display());
                    continue;
                };
                let outcome = self.lint_file(&path, kind, &options.lint)?;
                report.files_scanned += 1;
                report.schema_counts.record(outcome.schema);
                if outcome.changed {
                    report.files_modified += 1;
                }
                report.violations.extend(outcome.violations);
            }
        }

        if report.files_scanned == 0 {
            let message = if options.selection.is_auto() {
                "No agent files classified under auto schema detection. \
                 Provide --schema opencode or --schema claude explicitly."
            } else {
                "No files matched provided roots/schema."
            };
            return Err(LintError::NothingClassified(message.to_string()));
        }

        log::info!(
            "Scanned {} file(s): {} violation(s), {} modified",
            report.files_scanned,
            report.violation_count(),
            report.files_modified
        );
        Ok(report)
    }
}

/// Scan `options.roots` against `registry`.
///
/// # Errors
///
/// See [`Scanner::run`].
pub fn run(options: &ScanOptions, registry: &SchemaRegistry) -> Result<ScanReport> {
    Scanner::new(registry).run(options)
}
