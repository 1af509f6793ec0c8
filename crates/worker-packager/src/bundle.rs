//! Source bundle intake
//!
//! CI hands the built worker over as a zip archive. Expected layout:
//! ```text
//! worker.bundle.zip
//! ├── worker.js            # entry module (also accepted under src/)
//! ├── lib/helpers.mjs      # auxiliary modules
//! └── assets/
//!     └── index.html       # static files served alongside the worker
//! ```
//!
//! Entry candidates are checked in priority order; auxiliary modules keep
//! their archive-relative paths as module names.

use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use bytes::Bytes;
use zip::ZipArchive;

/// Parsed bundle contents
#[derive(Debug, Default)]
pub struct SourceBundle {
    /// Entry module source (if found)
    pub worker_source: Option<String>,

    /// Auxiliary module sources keyed by module path
    pub modules: BTreeMap<String, String>,

    /// Static asset contents keyed by served path
    pub asset_files: BTreeMap<String, Bytes>,
}

/// Possible entry module names (in priority order)
pub const ENTRY_FILENAMES: &[&str] = &["worker.js", "worker.mjs", "index.js", "index.mjs"];

/// Parse a zip bundle into worker source, auxiliary modules and asset files.
pub fn parse_bundle(zip_bytes: &[u8]) -> Result<SourceBundle> {
    let cursor = Cursor::new(zip_bytes);
    let mut archive = ZipArchive::new(cursor).context("Failed to read zip archive")?;

    tracing::debug!("Parsing source bundle with {} files", archive.len());

    // First pass: find the entry module, honoring candidate priority.
    let mut worker_source = None;
    let mut entry_path = None;
    'candidates: for candidate in ENTRY_FILENAMES {
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = normalize_path(file.name());
            if file.is_dir() {
                continue;
            }

            if name == *candidate || name == format!("src/{candidate}") {
                let mut content = String::new();
                file.read_to_string(&mut content)
                    .with_context(|| format!("Failed to read entry module: {name:?}"))?;
                tracing::debug!(entry = %name, "found entry module");
                worker_source = Some(content);
                entry_path = Some(name);
                break 'candidates;
            }
        }
    }

    // Second pass: auxiliary modules and asset files.
    let mut modules = BTreeMap::new();
    let mut asset_files = BTreeMap::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = normalize_path(file.name());
        if file.is_dir() {
            continue;
        }
        if !is_clean_relative(&name) {
            anyhow::bail!("Bundle entry has an unsafe path: {name:?}");
        }
        if Some(&name) == entry_path.as_ref() {
            continue;
        }

        if let Some(asset_path) = name.strip_prefix("assets/") {
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .with_context(|| format!("Failed to read asset file: {name:?}"))?;
            asset_files.insert(format!("/{asset_path}"), Bytes::from(content));
            continue;
        }

        if is_module_source(&name) {
            let mut content = String::new();
            file.read_to_string(&mut content)
                .with_context(|| format!("Failed to read module: {name:?}"))?;
            let module_path = name.strip_prefix("src/").unwrap_or(&name).to_string();
            modules.insert(module_path, content);
        }
    }

    tracing::debug!(
        entry = worker_source.is_some(),
        modules = modules.len(),
        assets = asset_files.len(),
        "parsed source bundle"
    );

    Ok(SourceBundle {
        worker_source,
        modules,
        asset_files,
    })
}

/// Normalize path separators (Windows archives use backslashes)
fn normalize_path(name: &str) -> String {
    name.replace('\\', "/")
}

/// Check if a file is an auxiliary module source
fn is_module_source(name: &str) -> bool {
    name.ends_with(".js") || name.ends_with(".mjs")
}

/// Reject absolute paths and parent-directory traversal
fn is_clean_relative(name: &str) -> bool {
    !name.starts_with('/') && name.split('/').all(|part| part != ".." && !part.is_empty())
}
