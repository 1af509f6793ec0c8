//! Deploy metadata wire types
//!
//! `WorkerMetadata` is the exact JSON shape the platform deploy API expects.
//! Optional sections are omitted entirely when empty; the API rejects
//! empty-object and empty-array placeholders.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::assets::AssetsBlock;
use crate::migrations::MigrationDescriptor;

/// Metadata descriptor submitted alongside the worker script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerMetadata {
    /// Entry module name (e.g. "worker.js")
    pub main_module: String,

    /// Platform compatibility date (YYYY-MM-DD)
    pub compatibility_date: String,

    /// Feature-flag tokens, in declaration order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compatibility_flags: Option<Vec<String>>,

    /// Resource bindings attached to the worker. Always present on the
    /// wire; an empty list is meaningful to the platform.
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,

    /// Static asset block (manifest + serving config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetsBlock>,

    /// Cumulative actor-class migration descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migrations: Option<MigrationDescriptor>,

    /// Actor classes the script exports as addressable handlers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_handlers: Option<Vec<String>>,

    /// Plain-text environment variables
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vars: Option<BTreeMap<String, String>>,
}

/// A declared external resource connection (storage, queue, secret, ...)
/// attached to the worker at deploy time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingSpec {
    /// Binding type understood by the platform (kv_namespace, queue, ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Name the worker script references the resource by
    pub name: String,

    /// Additional type-specific configuration as key-value pairs
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl BindingSpec {
    /// Create a binding with no extra configuration.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }
}
