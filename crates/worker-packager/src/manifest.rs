//! Deploy manifest parsing
//!
//! Parses deploy.yaml manifests with environment variable substitution.
//! The manifest describes everything the packager needs that is not worker
//! source: script identity, compatibility settings, bindings, vars, the
//! migration history, auxiliary module paths and the asset directory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use worker_packager_sdk::assets::NotFoundHandling;
use worker_packager_sdk::metadata::BindingSpec;
use worker_packager_sdk::migrations::MigrationDirective;

/// The deploy manifest (deploy.yaml)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployManifest {
    /// Script identity and compatibility settings
    pub script: ScriptInfo,

    /// Resource bindings attached to the worker
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,

    /// Plain-text environment variables
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Auxiliary module paths, relative to the source directory
    #[serde(default)]
    pub modules: Vec<String>,

    /// Static asset configuration
    #[serde(default)]
    pub assets: Option<AssetsSection>,

    /// Migration-directive history, oldest first
    #[serde(default)]
    pub migrations: Vec<MigrationDirective>,
}

/// Script identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptInfo {
    /// Script name (unique identifier on the platform)
    pub name: String,

    /// Platform compatibility date (YYYY-MM-DD)
    pub compatibility_date: String,

    /// Feature-flag tokens
    #[serde(default)]
    pub compatibility_flags: Vec<String>,
}

/// Static asset configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsSection {
    /// Directory of static files to package
    pub directory: PathBuf,

    /// Serving policy for paths missing from the manifest
    #[serde(default)]
    pub not_found_handling: Option<NotFoundHandling>,
}

impl DeployManifest {
    /// Parse a manifest from YAML content
    pub fn parse(yaml: &str) -> Result<Self> {
        // First, substitute environment variables
        let expanded = expand_env_vars(yaml);

        // Then parse
        serde_yaml::from_str(&expanded).context("Failed to parse deploy manifest")
    }

    /// Load a manifest from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read manifest file: {:?}", path.as_ref()))?;
        Self::parse(&content)
    }

    /// Validate the manifest
    pub fn validate(&self) -> Result<()> {
        if self.script.name.is_empty() {
            anyhow::bail!("Script name is required");
        }
        if self.script.compatibility_date.is_empty() {
            anyhow::bail!("Compatibility date is required");
        }

        for binding in &self.bindings {
            if binding.kind.is_empty() {
                anyhow::bail!("Binding '{}' must have a 'type' field", binding.name);
            }
            if binding.name.is_empty() {
                anyhow::bail!("Every binding must have a 'name' field");
            }
        }

        for directive in &self.migrations {
            if directive.tag.is_empty() {
                anyhow::bail!("Every migration directive must have a 'tag' field");
            }
        }

        Ok(())
    }
}

/// Expand environment variables in a string
/// Supports: ${VAR}, ${VAR:-default}, $VAR
fn expand_env_vars(input: &str) -> String {
    let mut result = input.to_string();

    // Pattern: ${VAR:-default} or ${VAR}
    let re = regex_lite::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").unwrap();
    result = re
        .replace_all(&result, |caps: &regex_lite::Captures| {
            let var_name = &caps[1];
            let default = caps.get(2).map(|m| m.as_str());

            std::env::var(var_name).unwrap_or_else(|_| default.unwrap_or("").to_string())
        })
        .to_string();

    // Pattern: $VAR (simple)
    let re = regex_lite::Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    result = re
        .replace_all(&result, |caps: &regex_lite::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_default()
        })
        .to_string();

    result
}
