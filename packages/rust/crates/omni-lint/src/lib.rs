//! Omni-Lint - YAML frontmatter linter and auto-fixer for agent documents.
//!
//! Validates the frontmatter of agent markdown files against one of two
//! schemas and optionally rewrites it into canonical form, leaving the
//! document body byte-for-byte untouched.
//!
//! # Architecture
//!
//! ```text
//! omni-lint/src/
//! ├── lib.rs              # Main module and exports
//! ├── error.rs            # LintError, ExitStatus
//! ├── frontmatter.rs      # Document splitting (frontmatter / body)
//! ├── schema/             # Schema descriptors
//! │   ├── mod.rs
//! │   ├── registry.rs     # Schema, rule tables, SchemaRegistry
//! │   └── classifier.rs   # Path-based schema selection
//! ├── settings.rs         # Optional YAML/TOML rule-table overrides
//! ├── engine.rs           # Violation engine
//! ├── canonical.rs        # Canonical key order and rendering
//! ├── scan.rs             # Directory scan driver
//! ├── report.rs           # ScanReport, text/JSON output
//! └── bin/agent_lint.rs   # `agent-lint` CLI
//! ```
//!
//! # Schemas
//!
//! ```yaml
//! ---
//! # opencode/<skill>/SKILL.md (strict, canonical order enforced)
//! name: git
//! description: Use when you need to work with git
//! license: MIT
//! compatibility: opencode
//! metadata:
//!   audience: developers
//!   workflow: general
//!
//! # claude/<agent>.md (legacy, any order, nothing required)
//! name: reviewer
//! description: Reviews pull requests
//! model: sonnet
//! tools:
//!   read: true
//! ---
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod canonical;
pub mod engine;
pub mod error;
pub mod frontmatter;
pub mod report;
pub mod scan;
pub mod schema;
pub mod settings;

// ============================================================================
// Re-exports
// ============================================================================

pub use canonical::{is_canonical, render, reorder, rewrite};
pub use engine::{LintOptions, MISSING_FRONTMATTER, Validation, Violation, validate};
pub use error::{ExitStatus, LintError, Result};
pub use frontmatter::{Document, Frontmatter, MARKER, extract_frontmatter, split_document};
pub use report::{
    ScanReport, SchemaCounts, missing_root_warning, render_tool_list, scan_report_schema,
};
pub use scan::{FileOutcome, ScanOptions, Scanner, run};
pub use schema::{
    Rule, RuleTables, Schema, SchemaFlags, SchemaKind, SchemaRegistry, SchemaSelection, classify,
    classify_kind,
};
pub use settings::{LintSettings, SchemaOverrides};

// ============================================================================
// Version
// ============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
