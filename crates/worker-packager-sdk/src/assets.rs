//! Static asset wire types
//!
//! The asset manifest maps served paths to content descriptors. Keys are
//! unique and sorted; repeated packaging runs over the same tree emit
//! byte-identical JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Mapping from served path ("/index.html") to its asset descriptor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    pub entries: BTreeMap<String, AssetEntry>,
}

impl AssetManifest {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a descriptor under a served path, replacing any previous entry.
    pub fn insert(&mut self, path: impl Into<String>, entry: AssetEntry) {
        self.entries.insert(path.into(), entry);
    }

    pub fn get(&self, path: &str) -> Option<&AssetEntry> {
        self.entries.get(path)
    }
}

/// Content descriptor for one served asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    /// Lowercase hex SHA-256 of the file contents
    pub hash: String,

    /// Size of the file in bytes
    pub size: u64,
}

/// Asset section of the deploy metadata: manifest plus serving config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsBlock {
    pub manifest: AssetManifest,
    pub config: AssetsConfig,
}

/// Serving configuration for static assets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// How the platform answers requests for paths not in the manifest.
    /// Absent means the platform default applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_found_handling: Option<NotFoundHandling>,
}

/// Serving policy for asset paths missing from the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotFoundHandling {
    /// Serve the root index page (client-side routed applications)
    #[serde(rename = "single-page-application")]
    SinglePageApplication,

    /// Serve a dedicated 404 page
    #[serde(rename = "404-page")]
    NotFoundPage,

    /// Plain 404 response
    #[serde(rename = "none")]
    None,
}

impl NotFoundHandling {
    /// Wire name of the policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundHandling::SinglePageApplication => "single-page-application",
            NotFoundHandling::NotFoundPage => "404-page",
            NotFoundHandling::None => "none",
        }
    }
}

impl fmt::Display for NotFoundHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized serving policy.
#[derive(Debug, thiserror::Error)]
#[error("unknown asset serving policy: {0:?}")]
pub struct ParsePolicyError(pub String);

impl FromStr for NotFoundHandling {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-page-application" => Ok(NotFoundHandling::SinglePageApplication),
            "404-page" => Ok(NotFoundHandling::NotFoundPage),
            "none" => Ok(NotFoundHandling::None),
            other => Err(ParsePolicyError(other.to_string())),
        }
    }
}
