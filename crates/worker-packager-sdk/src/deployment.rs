//! Prepared deployment artifact
//!
//! The complete in-memory package handed to the publishing pipeline. The
//! packager constructs it fresh per invocation and retains no state; the
//! caller owns the artifact after return and must not mutate the file
//! contents it passed in once handed off.

use bytes::Bytes;
use std::collections::BTreeMap;

use crate::assets::AssetManifest;
use crate::metadata::WorkerMetadata;

/// The complete artifact a publisher commits and later submits to the
/// platform deploy API.
#[derive(Debug, Clone)]
pub struct PreparedDeployment {
    /// Script name, as registered with the platform
    pub script_name: String,

    /// Deploy metadata in the platform's wire shape
    pub metadata: WorkerMetadata,

    /// Raw worker entry-module source text
    pub worker_source: String,

    /// Asset manifest, present only for asset-carrying deployments
    pub asset_manifest: Option<AssetManifest>,

    /// Raw asset contents keyed by served path
    pub files: Option<BTreeMap<String, Bytes>>,

    /// Auxiliary module sources keyed by module path
    pub modules: Option<BTreeMap<String, String>>,
}

impl PreparedDeployment {
    /// Number of static assets carried by the package.
    pub fn asset_count(&self) -> usize {
        self.asset_manifest.as_ref().map_or(0, AssetManifest::len)
    }

    /// Number of auxiliary modules carried by the package.
    pub fn module_count(&self) -> usize {
        self.modules.as_ref().map_or(0, BTreeMap::len)
    }
}
