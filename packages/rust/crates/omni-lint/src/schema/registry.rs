//! Schema Registry - the two agent frontmatter schemas and their rule tables.
//!
//! Both schemas are built from one set of [`RuleTables`] (allowed tools,
//! modes, deprecated keys, ...) and per-schema [`SchemaFlags`]. Each schema
//! carries an ordered list of [`Rule`] descriptors; the engine evaluates
//! them in that order, so the order of violations in a report follows the
//! order of this table.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema as SchemarsJsonSchema;
use serde::{Deserialize, Serialize};

/// Tool names accepted in a `tools` mapping.
pub const DEFAULT_ALLOWED_TOOLS: &[&str] = &[
    "bash", "diff", "edit", "format", "glob", "grep", "read", "search", "webfetch", "write",
];

/// Accepted values of the `mode` key.
pub const DEFAULT_ALLOWED_MODES: &[&str] = &["primary", "subagent", "all"];

/// Keys flagged as deprecated.
pub const DEFAULT_DEPRECATED_KEYS: &[&str] = &["tags"];

/// Keys accepted inside the OpenCode `metadata` mapping.
pub const DEFAULT_METADATA_KEYS: &[&str] = &["audience", "workflow"];

/// Required value of the OpenCode `compatibility` key.
pub const DEFAULT_COMPATIBILITY: &str = "opencode";

/// Canonical key order of OpenCode skill frontmatter.
pub const OPENCODE_CANONICAL_ORDER: &[&str] =
    &["name", "description", "license", "compatibility", "metadata"];

/// Canonical key order of legacy Claude agent frontmatter.
pub const CLAUDE_CANONICAL_ORDER: &[&str] = &["name", "description", "model", "tools"];

/// The two supported schemas.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, SchemarsJsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// Current OpenCode skill documents (`opencode/` trees).
    OpenCode,
    /// Legacy Claude agent documents (`claude/` trees).
    Claude,
}

impl SchemaKind {
    /// All schemas, in classification precedence order.
    pub const ALL: [Self; 2] = [Self::OpenCode, Self::Claude];

    /// Schema label, also the reserved path segment selecting it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenCode => "opencode",
            Self::Claude => "claude",
        }
    }
}

impl FromStr for SchemaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "opencode" => Ok(Self::OpenCode),
            "claude" => Ok(Self::Claude),
            other => Err(format!("unknown schema: {other}")),
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// When deprecated keys are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeprecationPolicy {
    /// Always a violation.
    Always,
    /// A violation unless the caller allows deprecated keys for this schema.
    UnlessAllowed,
}

/// Primitive type expected for every value inside a structural mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// YAML boolean.
    Bool,
    /// YAML string.
    String,
}

impl ValueKind {
    /// Human-readable type name used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::String => "string",
        }
    }
}

/// Shape constraint for a mapping-typed key such as `tools` or `metadata`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRule {
    /// Frontmatter key holding the mapping.
    pub key: String,
    /// Expected type of every value.
    pub value_kind: ValueKind,
    /// Keys accepted inside the mapping.
    pub allowed_keys: BTreeSet<String>,
    /// Whether absence of the key is a violation.
    pub required: bool,
}

/// One validation step. Evaluated in list order by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Flag keys from the deprecated set.
    Deprecated {
        /// Deprecated keys.
        keys: Vec<String>,
        /// Whether the caller can silence this rule.
        policy: DeprecationPolicy,
    },
    /// Flag missing keys from the schema's required set.
    RequiredKeys,
    /// `mode` must be one of the allowed values.
    Mode {
        /// Allowed `mode` values.
        allowed: Vec<String>,
    },
    /// `model` presence, when requested by the caller.
    Model,
    /// `temperature` must be a number in `[0.0, 1.0]`.
    Temperature,
    /// Mapping shape check.
    Mapping(MappingRule),
    /// Key must equal a fixed literal when present.
    Literal {
        /// Frontmatter key.
        key: String,
        /// Required value.
        expected: String,
    },
    /// Canonical key order (only for order-enforcing schemas).
    Order,
}

/// Shared tables every schema draws its rules from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTables {
    /// Tool names accepted in `tools`.
    pub allowed_tools: BTreeSet<String>,
    /// Accepted `mode` values.
    pub allowed_modes: Vec<String>,
    /// Deprecated keys.
    pub deprecated_keys: Vec<String>,
    /// Keys accepted in the OpenCode `metadata` mapping.
    pub metadata_keys: BTreeSet<String>,
    /// Required `compatibility` value.
    pub compatibility: String,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

impl Default for RuleTables {
    fn default() -> Self {
        Self {
            allowed_tools: owned(DEFAULT_ALLOWED_TOOLS).into_iter().collect(),
            allowed_modes: owned(DEFAULT_ALLOWED_MODES),
            deprecated_keys: owned(DEFAULT_DEPRECATED_KEYS),
            metadata_keys: owned(DEFAULT_METADATA_KEYS).into_iter().collect(),
            compatibility: DEFAULT_COMPATIBILITY.to_string(),
        }
    }
}

/// Presence requirements that are off for both built-in schemas but can be
/// switched on through settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaFlags {
    /// `tools` must be present.
    pub require_tools: bool,
    /// `temperature` must be present.
    pub require_temperature: bool,
    /// `mode` must be present (only meaningful where `mode` is recognized).
    pub require_mode: bool,
}

/// An immutable schema descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Which schema this is.
    pub kind: SchemaKind,
    /// Preferred key order.
    pub canonical_order: Vec<String>,
    /// Whether non-canonical order is a violation.
    pub enforce_order: bool,
    /// Keys that must be present.
    pub required_keys: Vec<String>,
    /// `temperature` must be present.
    pub require_temperature: bool,
    /// `mode` must be present.
    pub require_mode: bool,
    /// Ordered rule table. Whether `tools` is required lives on its
    /// mapping rule; see [`Schema::require_tools`].
    pub rules: Vec<Rule>,
}

impl Schema {
    /// OpenCode skill schema: strict order, five required keys, `mode`,
    /// `compatibility` and `metadata` recognized.
    #[must_use]
    pub fn opencode(tables: &RuleTables, flags: SchemaFlags) -> Self {
        let rules = vec![
            Rule::Deprecated {
                keys: tables.deprecated_keys.clone(),
                policy: DeprecationPolicy::Always,
            },
            Rule::RequiredKeys,
            Rule::Mode {
                allowed: tables.allowed_modes.clone(),
            },
            Rule::Model,
            Rule::Temperature,
            Rule::Mapping(tools_rule(tables, flags.require_tools)),
            Rule::Mapping(MappingRule {
                key: "metadata".to_string(),
                value_kind: ValueKind::String,
                allowed_keys: tables.metadata_keys.clone(),
                required: false,
            }),
            Rule::Literal {
                key: "compatibility".to_string(),
                expected: tables.compatibility.clone(),
            },
            Rule::Order,
        ];
        Self {
            kind: SchemaKind::OpenCode,
            canonical_order: owned(OPENCODE_CANONICAL_ORDER),
            enforce_order: true,
            required_keys: owned(OPENCODE_CANONICAL_ORDER),
            require_temperature: flags.require_temperature,
            require_mode: flags.require_mode,
            rules,
        }
    }

    /// Legacy Claude schema: any order, nothing required, `mode` unknown.
    #[must_use]
    pub fn claude(tables: &RuleTables, flags: SchemaFlags) -> Self {
        let rules = vec![
            Rule::Deprecated {
                keys: tables.deprecated_keys.clone(),
                policy: DeprecationPolicy::UnlessAllowed,
            },
            Rule::RequiredKeys,
            Rule::Model,
            Rule::Temperature,
            Rule::Mapping(tools_rule(tables, flags.require_tools)),
            Rule::Order,
        ];
        Self {
            kind: SchemaKind::Claude,
            canonical_order: owned(CLAUDE_CANONICAL_ORDER),
            enforce_order: false,
            required_keys: Vec::new(),
            require_temperature: flags.require_temperature,
            // `mode` is not part of this schema.
            require_mode: false,
            rules,
        }
    }

    /// Schema label.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// True if the `tools` mapping must be present.
    #[must_use]
    pub fn require_tools(&self) -> bool {
        self.rules.iter().any(|rule| match rule {
            Rule::Mapping(mapping) => mapping.key == "tools" && mapping.required,
            _ => false,
        })
    }
}

fn tools_rule(tables: &RuleTables, required: bool) -> MappingRule {
    MappingRule {
        key: "tools".to_string(),
        value_kind: ValueKind::Bool,
        allowed_keys: tables.allowed_tools.clone(),
        required,
    }
}

/// Holds exactly one instance of each schema for the lifetime of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaRegistry {
    tables: RuleTables,
    opencode: Schema,
    claude: Schema,
}

impl SchemaRegistry {
    /// Build both schemas from shared tables and per-schema flags.
    #[must_use]
    pub fn new(tables: RuleTables, opencode: SchemaFlags, claude: SchemaFlags) -> Self {
        Self {
            opencode: Schema::opencode(&tables, opencode),
            claude: Schema::claude(&tables, claude),
            tables,
        }
    }

    /// Look up a schema.
    #[must_use]
    pub fn get(&self, kind: SchemaKind) -> &Schema {
        match kind {
            SchemaKind::OpenCode => &self.opencode,
            SchemaKind::Claude => &self.claude,
        }
    }

    /// Shared rule tables.
    #[must_use]
    pub fn tables(&self) -> &RuleTables {
        &self.tables
    }

    /// Allowed tool names, sorted.
    pub fn allowed_tools(&self) -> impl Iterator<Item = &str> {
        self.tables.allowed_tools.iter().map(String::as_str)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new(
            RuleTables::default(),
            SchemaFlags::default(),
            SchemaFlags::default(),
        )
    }
}
