//! Lint settings - optional overrides for the built-in rule tables.
//!
//! ```yaml
//! allowed_tools: [read, write, edit, bash]
//! deprecated_keys: [tags, category]
//! opencode:
//!   require_mode: true
//! claude:
//!   require_temperature: true
//! ```
//!
//! Every field is optional; a present field replaces the built-in value.
//! Files ending in `.toml` are read as TOML, anything else as YAML.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{LintError, Result};
use crate::schema::{RuleTables, SchemaFlags, SchemaRegistry};

/// Per-schema presence requirements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaOverrides {
    /// Require a `tools` mapping.
    pub require_tools: Option<bool>,
    /// Require a `temperature` value.
    pub require_temperature: Option<bool>,
    /// Require a `mode` value.
    pub require_mode: Option<bool>,
}

impl SchemaOverrides {
    fn apply(self, base: SchemaFlags) -> SchemaFlags {
        SchemaFlags {
            require_tools: self.require_tools.unwrap_or(base.require_tools),
            require_temperature: self.require_temperature.unwrap_or(base.require_temperature),
            require_mode: self.require_mode.unwrap_or(base.require_mode),
        }
    }
}

/// Settings file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintSettings {
    /// Tool names accepted in `tools`.
    pub allowed_tools: Option<Vec<String>>,
    /// Accepted `mode` values.
    pub allowed_modes: Option<Vec<String>>,
    /// Keys reported as deprecated.
    pub deprecated_keys: Option<Vec<String>>,
    /// Keys accepted inside the OpenCode `metadata` mapping.
    pub metadata_keys: Option<Vec<String>>,
    /// Required `compatibility` value.
    pub compatibility: Option<String>,
    /// OpenCode schema requirements.
    pub opencode: SchemaOverrides,
    /// Claude schema requirements.
    pub claude: SchemaOverrides,
}

impl LintSettings {
    /// Parse YAML settings.
    ///
    /// # Errors
    ///
    /// Returns the parser message if the YAML is invalid or has unknown fields.
    pub fn from_yaml_str(raw: &str) -> std::result::Result<Self, String> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Parse TOML settings.
    ///
    /// # Errors
    ///
    /// Returns the parser message if the TOML is invalid or has unknown fields.
    pub fn from_toml_str(raw: &str) -> std::result::Result<Self, String> {
        toml::from_str(raw).map_err(|e| e.to_string())
    }

    /// Load a settings file. The caller asked for this file explicitly, so a
    /// missing or broken file is an error rather than a silent fallback.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::SettingsRead`] if the file cannot be read and
    /// [`LintError::Settings`] if it cannot be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| LintError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        let is_toml = path.extension().is_some_and(|ext| ext == "toml");
        let parsed = if is_toml {
            Self::from_toml_str(&raw)
        } else {
            Self::from_yaml_str(&raw)
        };
        let settings = parsed.map_err(|message| LintError::Settings {
            path: path.to_path_buf(),
            message,
        })?;
        log::debug!("Loaded lint settings from {}", path.display());
        Ok(settings)
    }

    /// Rule tables with overrides applied.
    #[must_use]
    pub fn tables(&self) -> RuleTables {
        let mut tables = RuleTables::default();
        if let Some(tools) = &self.allowed_tools {
            tables.allowed_tools = tools.iter().cloned().collect();
        }
        if let Some(modes) = &self.allowed_modes {
            tables.allowed_modes.clone_from(modes);
        }
        if let Some(keys) = &self.deprecated_keys {
            tables.deprecated_keys.clone_from(keys);
        }
        if let Some(keys) = &self.metadata_keys {
            tables.metadata_keys = keys.iter().cloned().collect();
        }
        if let Some(compatibility) = &self.compatibility {
            tables.compatibility.clone_from(compatibility);
        }
        tables
    }

    /// Build the schema registry these settings describe.
    #[must_use]
    pub fn registry(&self) -> SchemaRegistry {
        SchemaRegistry::new(
            self.tables(),
            self.opencode.apply(SchemaFlags::default()),
            self.claude.apply(SchemaFlags::default()),
        )
    }
}
