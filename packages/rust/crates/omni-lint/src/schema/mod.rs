//! Schema Module
//!
//! Schema descriptors for agent frontmatter and path-based classification.

pub mod classifier;
pub mod registry;

pub use classifier::{SchemaSelection, classify, classify_kind};
pub use registry::{
    DeprecationPolicy, MappingRule, Rule, RuleTables, Schema, SchemaFlags, SchemaKind,
    SchemaRegistry, ValueKind,
};
