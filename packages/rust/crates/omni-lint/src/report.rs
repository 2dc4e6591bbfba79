//! Scan report - aggregate counters and violations of one run.
//!
//! Text rendering (via `Display`) is what the CLI prints by default; the
//! JSON form serializes the same struct. Missing roots are announced while
//! scanning (see [`missing_root_warning`]), so `Display` leaves them out.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema as SchemarsJsonSchema;
use serde::{Deserialize, Serialize};

use crate::engine::Violation;
use crate::error::ExitStatus;
use crate::schema::{SchemaKind, SchemaRegistry};

/// Number of scanned files per schema.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, SchemarsJsonSchema,
)]
pub struct SchemaCounts {
    /// Files validated against the OpenCode schema.
    pub opencode: usize,
    /// Files validated against the Claude schema.
    pub claude: usize,
}

impl SchemaCounts {
    /// Count one file for `kind`.
    pub fn record(&mut self, kind: SchemaKind) {
        match kind {
            SchemaKind::OpenCode => self.opencode += 1,
            SchemaKind::Claude => self.claude += 1,
        }
    }

    /// Count for `kind`.
    #[must_use]
    pub const fn get(&self, kind: SchemaKind) -> usize {
        match kind {
            SchemaKind::OpenCode => self.opencode,
            SchemaKind::Claude => self.claude,
        }
    }
}

/// Aggregated result of a scan. Created empty, filled per file, printed once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SchemarsJsonSchema)]
pub struct ScanReport {
    /// Files that were classified and linted.
    pub files_scanned: usize,
    /// Files rewritten by auto-fix.
    pub files_modified: usize,
    /// Scanned files per schema.
    pub schema_counts: SchemaCounts,
    /// Every violation, in scan order.
    pub violations: Vec<Violation>,
    /// Requested roots that do not exist.
    #[serde(default)]
    pub missing_roots: Vec<PathBuf>,
}

impl ScanReport {
    /// Number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    /// Exit status for this report.
    #[must_use]
    pub fn exit_status(&self, warn_only: bool) -> ExitStatus {
        if self.violations.is_empty() || warn_only {
            ExitStatus::Clean
        } else {
            ExitStatus::Violations
        }
    }

    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.violations.is_empty() {
            writeln!(f, "\nViolations:")?;
            for violation in &self.violations {
                writeln!(f, "- {violation}")?;
            }
        }
        writeln!(f, "\nSummary:")?;
        writeln!(f, "  Files scanned: {}", self.files_scanned)?;
        writeln!(f, "  Violations: {}", self.violation_count())?;
        writeln!(f, "  Files modified (auto-fix): {}", self.files_modified)?;
        writeln!(
            f,
            "  Schema counts: opencode={} claude={}",
            self.schema_counts.opencode, self.schema_counts.claude
        )
    }
}

/// Line announcing a requested root that does not exist.
#[must_use]
pub fn missing_root_warning(root: &Path) -> String {
    format!("WARN: Root not found: {}", root.display())
}

/// `--list-tools` output.
#[must_use]
pub fn render_tool_list(registry: &SchemaRegistry) -> String {
    let mut out = String::from("Allowed tools:\n");
    for tool in registry.allowed_tools() {
        out.push_str(" - ");
        out.push_str(tool);
        out.push('\n');
    }
    out
}

/// Generate JSON Schema for `ScanReport`.
#[must_use]
pub fn scan_report_schema() -> String {
    let schema = schemars::schema_for!(ScanReport);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
