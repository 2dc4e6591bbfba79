//! Violation Engine - runs a schema's rule table against parsed frontmatter.
//!
//! Every rule runs, even after an earlier one fails. The engine never
//! touches the filesystem: it returns the violations, the (possibly
//! updated) mapping and whether the mapping changed. Only two rules mutate
//! the mapping: `model` injection and order repair.

use std::fmt;
use std::path::{Path, PathBuf};

use schemars::JsonSchema as SchemarsJsonSchema;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::canonical::{is_canonical, reorder};
use crate::schema::{DeprecationPolicy, MappingRule, Rule, Schema, ValueKind};

/// Message for documents without a usable frontmatter block.
pub const MISSING_FRONTMATTER: &str = "Missing or invalid YAML frontmatter";

/// A single reported deviation from a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, SchemarsJsonSchema)]
pub struct Violation {
    /// Document the violation was found in.
    pub path: PathBuf,
    /// Human-readable description.
    pub message: String,
    /// Whether `--check-order` style auto-fix can repair it.
    #[serde(default)]
    pub fixable: bool,
}

impl Violation {
    /// Non-fixable violation.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            fixable: false,
        }
    }

    /// Violation that auto-fix can repair.
    pub fn fixable(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            fixable: true,
            ..Self::new(path, message)
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)?;
        if self.fixable {
            f.write_str(" (fixable)")?;
        }
        Ok(())
    }
}

/// Caller switches that shape a lint pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintOptions {
    /// Report a missing `model` key.
    pub require_model: bool,
    /// Inject this `model` value where it is missing (implies `require_model`).
    pub fix_missing_model: Option<String>,
    /// Repair non-canonical key order instead of reporting it.
    pub fix_order: bool,
    /// Silence deprecated keys for schemas that allow it.
    pub allow_deprecated_claude: bool,
}

impl LintOptions {
    /// True when `model` must be present.
    #[must_use]
    pub fn model_required(&self) -> bool {
        self.require_model || self.fix_missing_model.is_some()
    }
}

/// Result of validating one mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// Violations in rule order.
    pub violations: Vec<Violation>,
    /// Mapping after any auto-fix.
    pub metadata: Mapping,
    /// True if `metadata` differs from the input and should be written back.
    pub changed: bool,
}

/// Compact, deterministic rendering of a YAML value for messages.
fn describe(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

fn key_label(key: &Value) -> String {
    key.as_str().map_or_else(|| describe(key), str::to_string)
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn matches_kind(value: &Value, kind: ValueKind) -> bool {
    match kind {
        ValueKind::Bool => value.is_bool(),
        ValueKind::String => value.is_string(),
    }
}

struct Pass<'a> {
    path: &'a Path,
    schema: &'a Schema,
    options: &'a LintOptions,
    metadata: Mapping,
    violations: Vec<Violation>,
    changed: bool,
}

impl Pass<'_> {
    fn flag(&mut self, message: impl Into<String>) {
        self.violations.push(Violation::new(self.path, message));
    }

    fn apply(&mut self, rule: &Rule) {
        match rule {
            Rule::Deprecated { keys, policy } => self.check_deprecated(keys, *policy),
            Rule::RequiredKeys => self.check_required(),
            Rule::Mode { allowed } => self.check_mode(allowed),
            Rule::Model => self.check_model(),
            Rule::Temperature => self.check_temperature(),
            Rule::Mapping(mapping_rule) => self.check_mapping(mapping_rule),
            Rule::Literal { key, expected } => self.check_literal(key, expected),
            Rule::Order => self.check_order(),
        }
    }

    fn check_deprecated(&mut self, keys: &[String], policy: DeprecationPolicy) {
        if policy == DeprecationPolicy::UnlessAllowed && self.options.allow_deprecated_claude {
            return;
        }
        let found: Vec<String> = self
            .metadata
            .keys()
            .filter_map(Value::as_str)
            .filter(|key| keys.iter().any(|k| k == key))
            .map(str::to_string)
            .collect();
        let schema = self.schema.name();
        for key in found {
            match policy {
                DeprecationPolicy::Always => {
                    self.flag(format!("Deprecated key in {schema} schema: {key}"));
                }
                DeprecationPolicy::UnlessAllowed => self.flag(format!(
                    "Deprecated key in {schema} schema (allow with --allow-deprecated-claude): {key}"
                )),
            }
        }
    }

    fn check_required(&mut self) {
        let missing: Vec<String> = self
            .schema
            .required_keys
            .iter()
            .filter(|key| !self.metadata.contains_key(key.as_str()))
            .cloned()
            .collect();
        for key in missing {
            self.flag(format!("Missing required key: {key}"));
        }
    }

    fn check_mode(&mut self, allowed: &[String]) {
        match self.metadata.get("mode") {
            Some(value) => {
                let valid = value
                    .as_str()
                    .is_some_and(|mode| allowed.iter().any(|a| a == mode));
                if !valid {
                    let message = format!(
                        "Invalid mode: {} (expected one of {})",
                        describe(value),
                        allowed.join(", ")
                    );
                    self.flag(message);
                }
            }
            None if self.schema.require_mode => self.flag("Missing mode"),
            None => {}
        }
    }

    fn check_model(&mut self) {
        if !self.options.model_required() || self.metadata.contains_key("model") {
            return;
        }
        match &self.options.fix_missing_model {
            Some(model) => {
                self.metadata
                    .insert(Value::from("model"), Value::from(model.as_str()));
                self.changed = true;
            }
            None => self.flag("Missing model"),
        }
    }

    fn check_temperature(&mut self) {
        let required = self.schema.require_temperature;
        let qualifier = if required {
            String::new()
        } else {
            format!(" ({}, optional)", self.schema.name())
        };
        let Some(value) = self.metadata.get("temperature") else {
            if required {
                self.flag("Missing temperature");
            }
            return;
        };
        let message = match as_number(value) {
            Some(t) if (0.0..=1.0).contains(&t) => return,
            Some(t) => format!("Out-of-range temperature{qualifier}: {t:?}"),
            None => format!("Non-numeric temperature{qualifier}: {}", describe(value)),
        };
        self.flag(message);
    }

    fn check_mapping(&mut self, rule: &MappingRule) {
        let key = rule.key.as_str();
        let Some(value) = self.metadata.get(key) else {
            if rule.required {
                self.flag(format!("Missing {key} mapping"));
            }
            return;
        };
        let Some(entries) = value.as_mapping() else {
            let suffix = if rule.required { "" } else { " (if present)" };
            self.flag(format!("{key} must be a mapping{suffix}"));
            return;
        };

        let bad_values: Vec<String> = entries
            .iter()
            .filter(|(_, v)| !matches_kind(v, rule.value_kind))
            .map(|(k, v)| format!("{}={}", key_label(k), describe(v)))
            .collect();
        let unknown: Vec<String> = entries
            .keys()
            .filter(|k| k.as_str().is_none_or(|name| !rule.allowed_keys.contains(name)))
            .map(key_label)
            .collect();

        if !bad_values.is_empty() {
            self.flag(format!(
                "Non-{} {key} values: {}",
                rule.value_kind.label(),
                bad_values.join(", ")
            ));
        }
        if !unknown.is_empty() {
            self.flag(format!("Unknown {key} entries: {}", unknown.join(", ")));
        }
    }

    fn check_literal(&mut self, key: &str, expected: &str) {
        if let Some(value) = self.metadata.get(key) {
            if value.as_str() != Some(expected) {
                let message = format!("Invalid {key}: {} (expected {expected:?})", describe(value));
                self.flag(message);
            }
        }
    }

    fn check_order(&mut self) {
        if !self.schema.enforce_order || is_canonical(&self.metadata, &self.schema.canonical_order)
        {
            return;
        }
        if self.options.fix_order {
            self.metadata = reorder(&self.metadata, &self.schema.canonical_order);
            self.changed = true;
        } else {
            self.violations.push(Violation::fixable(
                self.path,
                "Non-canonical key order (informational)",
            ));
        }
    }
}

/// Validate a parsed mapping against `schema`.
///
/// The input mapping is not modified; `Validation::metadata` holds the
/// auto-fixed copy.
#[must_use]
pub fn validate(
    path: &Path,
    metadata: &Mapping,
    schema: &Schema,
    options: &LintOptions,
) -> Validation {
    let mut pass = Pass {
        path,
        schema,
        options,
        metadata: metadata.clone(),
        violations: Vec::new(),
        changed: false,
    };
    for rule in &schema.rules {
        pass.apply(rule);
    }
    Validation {
        violations: pass.violations,
        metadata: pass.metadata,
        changed: pass.changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_strings_count_as_numbers() {
        assert_eq!(as_number(&Value::from("0.5")), Some(0.5));
        assert_eq!(as_number(&Value::from(true)), None);
    }

    #[test]
    fn violation_display_marks_fixable() {
        let v = Violation::fixable("a.md", "Non-canonical key order (informational)");
        assert_eq!(
            v.to_string(),
            "a.md: Non-canonical key order (informational) (fixable)"
        );
    }
}
