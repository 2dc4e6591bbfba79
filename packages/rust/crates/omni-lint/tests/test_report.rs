//! Tests for scan report rendering and its JSON Schema.

use std::path::{Path, PathBuf};

use omni_lint::{
    ExitStatus, ScanReport, SchemaCounts, SchemaRegistry, Violation, missing_root_warning,
    render_tool_list, scan_report_schema,
};

fn sample_report() -> ScanReport {
    ScanReport {
        files_scanned: 2,
        files_modified: 1,
        schema_counts: SchemaCounts {
            opencode: 1,
            claude: 1,
        },
        violations: vec![
            Violation::new("opencode/git/SKILL.md", "Missing required key: license"),
            Violation::fixable(
                "opencode/git/SKILL.md",
                "Non-canonical key order (informational)",
            ),
        ],
        missing_roots: vec![PathBuf::from("claude")],
    }
}

/// Test the text summary layout. Missing roots are announced during the
/// scan, not repeated here.
#[test]
fn test_text_report() {
    let expected = "
Violations:
- opencode/git/SKILL.md: Missing required key: license
- opencode/git/SKILL.md: Non-canonical key order (informational) (fixable)

Summary:
  Files scanned: 2
  Violations: 2
  Files modified (auto-fix): 1
  Schema counts: opencode=1 claude=1
";
    assert_eq!(sample_report().to_string(), expected);
}

/// Test a clean report has no violations section.
#[test]
fn test_clean_text_report() {
    let report = ScanReport {
        files_scanned: 1,
        ..ScanReport::default()
    };
    let text = report.to_string();
    assert!(!text.contains("Violations:\n"));
    assert!(text.starts_with("\nSummary:\n  Files scanned: 1\n"));
}

/// Test exit status mapping.
#[test]
fn test_exit_status() {
    let report = sample_report();
    assert_eq!(report.exit_status(false), ExitStatus::Violations);
    assert_eq!(report.exit_status(true), ExitStatus::Clean);
    assert_eq!(ScanReport::default().exit_status(false), ExitStatus::Clean);
    assert_eq!(ExitStatus::Interrupted.code(), 130);
}

/// Test the JSON form round-trips through serde.
#[test]
fn test_json_report() {
    let report = sample_report();
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["files_scanned"], 2);
    assert_eq!(value["schema_counts"]["opencode"], 1);
    assert_eq!(value["violations"][1]["fixable"], true);

    let back: ScanReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back, report);
}

/// Test the missing-root line.
#[test]
fn test_missing_root_warning() {
    assert_eq!(
        missing_root_warning(Path::new("agents/claude")),
        "WARN: Root not found: agents/claude"
    );
}

/// Test `--list-tools` output.
#[test]
fn test_tool_list() {
    let listing = render_tool_list(&SchemaRegistry::default());
    assert!(listing.starts_with("Allowed tools:\n - bash\n - diff\n"));
    assert!(listing.ends_with(" - write\n"));
    assert_eq!(listing.lines().count(), 11);
}

/// Test the report JSON Schema.
#[test]
fn test_scan_report_schema() {
    let schema_json = scan_report_schema();
    let parsed: serde_json::Value = serde_json::from_str(&schema_json).unwrap();
    assert_eq!(parsed["title"], "ScanReport");
    assert!(parsed["properties"]["violations"].is_object());
    assert!(parsed["properties"]["schema_counts"].is_object());
}
