//! Asset manifest construction
//!
//! Walks a directory of static files, hashes each file, and produces the
//! served-path manifest plus the raw contents handed to the packager. The
//! sorted map keys make repeated runs over the same tree byte-identical.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use worker_packager_sdk::assets::{AssetEntry, AssetManifest};

/// Read every file under `dir` into a served-path -> contents map.
pub fn read_asset_dir(dir: &Path) -> Result<BTreeMap<String, Bytes>> {
    let mut files = BTreeMap::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk asset directory: {:?}", dir))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let content = fs::read(entry.path())
            .with_context(|| format!("Failed to read asset file: {:?}", entry.path()))?;
        let served = served_path(dir, entry.path())?;

        tracing::debug!(path = %served, size = content.len(), "collected asset");
        files.insert(served, Bytes::from(content));
    }

    Ok(files)
}

/// Build a manifest over already-loaded file contents.
pub fn manifest_for_files(files: &BTreeMap<String, Bytes>) -> AssetManifest {
    let mut manifest = AssetManifest::default();
    for (path, content) in files {
        manifest.insert(
            path.clone(),
            AssetEntry {
                hash: content_hash(content),
                size: content.len() as u64,
            },
        );
    }
    manifest
}

/// Lowercase hex SHA-256 of the file contents.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Convert a filesystem path under `root` into its "/"-rooted served form.
/// Separators are normalized so Windows trees serve the same keys.
fn served_path(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .with_context(|| format!("Asset path {:?} escapes root {:?}", path, root))?;

    let mut served = String::new();
    for component in rel.components() {
        served.push('/');
        served.push_str(&component.as_os_str().to_string_lossy());
    }
    Ok(served)
}
