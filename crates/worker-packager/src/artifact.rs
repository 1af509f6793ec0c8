//! Artifact output
//!
//! Writes a prepared deployment into the directory layout the publishing
//! pipeline commits: deploy metadata, entry module, auxiliary modules, the
//! asset subtree, and a receipt for pipeline bookkeeping.
//!
//! Output layout:
//! ```text
//! dist/
//! ├── metadata.json        # platform deploy metadata
//! ├── worker.js            # entry module
//! ├── modules/
//! │   └── lib/util.mjs     # auxiliary modules
//! ├── manifest.json        # asset manifest (asset deployments only)
//! ├── assets/
//! │   └── index.html       # raw asset contents
//! └── receipt.json         # package id, timestamp, counts
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use worker_packager_sdk::deployment::PreparedDeployment;

/// Bookkeeping record written alongside the packaged files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageReceipt {
    /// Unique id of this packaging run
    pub package_id: String,

    /// Script name the package was prepared for
    pub script_name: String,

    /// When the package was written
    pub prepared_at: DateTime<Utc>,

    /// Number of static assets in the package
    pub asset_count: usize,

    /// Number of auxiliary modules in the package
    pub module_count: usize,
}

/// Write the deployment into `out_dir`, creating it if needed.
pub fn write_artifact(deployment: &PreparedDeployment, out_dir: &Path) -> Result<PackageReceipt> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    let metadata_json = serde_json::to_string_pretty(&deployment.metadata)
        .context("Failed to serialize deploy metadata")?;
    fs::write(out_dir.join("metadata.json"), metadata_json)
        .context("Failed to write metadata.json")?;

    let entry_path = out_dir.join(&deployment.metadata.main_module);
    fs::write(&entry_path, &deployment.worker_source)
        .with_context(|| format!("Failed to write entry module: {:?}", entry_path))?;

    if let Some(modules) = &deployment.modules {
        for (module_path, source) in modules {
            let target = out_dir.join("modules").join(module_path);
            write_nested(&target, source.as_bytes())?;
        }
    }

    if let Some(manifest) = &deployment.asset_manifest {
        let manifest_json =
            serde_json::to_string_pretty(manifest).context("Failed to serialize asset manifest")?;
        fs::write(out_dir.join("manifest.json"), manifest_json)
            .context("Failed to write manifest.json")?;
    }

    if let Some(files) = &deployment.files {
        for (served_path, content) in files {
            let target = out_dir.join("assets").join(served_path.trim_start_matches('/'));
            write_nested(&target, content)?;
        }
    }

    let receipt = PackageReceipt {
        package_id: Uuid::new_v4().to_string(),
        script_name: deployment.script_name.clone(),
        prepared_at: Utc::now(),
        asset_count: deployment.asset_count(),
        module_count: deployment.module_count(),
    };
    let receipt_json =
        serde_json::to_string_pretty(&receipt).context("Failed to serialize receipt")?;
    fs::write(out_dir.join("receipt.json"), receipt_json)
        .context("Failed to write receipt.json")?;

    tracing::info!(
        package_id = %receipt.package_id,
        script = %receipt.script_name,
        out = ?out_dir,
        "wrote deployment artifact"
    );

    Ok(receipt)
}

/// Write a file, creating intermediate directories.
fn write_nested(target: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }
    fs::write(target, content).with_context(|| format!("Failed to write file: {:?}", target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::collections::BTreeMap;
    use worker_packager_sdk::assets::{AssetManifest, NotFoundHandling};
    use worker_packager_sdk::metadata::WorkerMetadata;

    use crate::assets;
    use crate::packager::{AssetUpload, DeploymentPackager, PackageInputs};

    fn prepared(script: &str) -> PreparedDeployment {
        let mut files = BTreeMap::new();
        files.insert(
            "/index.html".to_string(),
            Bytes::from_static(b"<html></html>"),
        );
        files.insert("/css/site.css".to_string(), Bytes::from_static(b"body {}"));

        let inputs = PackageInputs {
            script_name: script.to_string(),
            worker_source: "export default {}".to_string(),
            compatibility_date: "2025-06-01".to_string(),
            modules: Some(BTreeMap::from([(
                "lib/util.mjs".to_string(),
                "export const x = 1;".to_string(),
            )])),
            ..Default::default()
        };
        let upload = AssetUpload {
            manifest: assets::manifest_for_files(&files),
            files,
            not_found_handling: Some(NotFoundHandling::NotFoundPage),
        };
        DeploymentPackager::new().prepare_with_assets(inputs, upload)
    }

    #[test]
    fn test_write_artifact_layout() {
        let out = tempfile::tempdir().unwrap();
        let deployment = prepared("artifact-worker");

        let receipt = write_artifact(&deployment, out.path()).unwrap();
        assert_eq!(receipt.script_name, "artifact-worker");
        assert_eq!(receipt.asset_count, 2);
        assert_eq!(receipt.module_count, 1);

        assert!(out.path().join("metadata.json").exists());
        assert!(out.path().join("worker.js").exists());
        assert!(out.path().join("modules/lib/util.mjs").exists());
        assert!(out.path().join("manifest.json").exists());
        assert!(out.path().join("assets/index.html").exists());
        assert!(out.path().join("assets/css/site.css").exists());
        assert!(out.path().join("receipt.json").exists());
    }

    #[test]
    fn test_metadata_round_trips_through_disk() {
        let out = tempfile::tempdir().unwrap();
        let deployment = prepared("round-trip-worker");
        write_artifact(&deployment, out.path()).unwrap();

        let content = fs::read_to_string(out.path().join("metadata.json")).unwrap();
        let parsed: WorkerMetadata = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, deployment.metadata);

        let manifest = fs::read_to_string(out.path().join("manifest.json")).unwrap();
        let parsed: AssetManifest = serde_json::from_str(&manifest).unwrap();
        assert_eq!(Some(&parsed), deployment.asset_manifest.as_ref());
    }

    #[test]
    fn test_write_artifact_without_assets() {
        let out = tempfile::tempdir().unwrap();
        let inputs = PackageInputs {
            script_name: "plain".to_string(),
            worker_source: "export default {}".to_string(),
            compatibility_date: "2025-06-01".to_string(),
            ..Default::default()
        };
        let deployment = DeploymentPackager::new().prepare_without_assets(inputs);

        let receipt = write_artifact(&deployment, out.path()).unwrap();
        assert_eq!(receipt.asset_count, 0);
        assert!(!out.path().join("manifest.json").exists());
        assert!(!out.path().join("assets").exists());
    }
}
