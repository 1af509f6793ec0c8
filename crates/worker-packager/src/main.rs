//! Worker Packager - Main entry point
//!
//! Command-line driver that:
//! - Loads the deploy manifest
//! - Gathers worker source, auxiliary modules and static assets
//! - Folds the migration history and derives exported handlers
//! - Writes the prepared artifact for the publishing pipeline

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use worker_packager::artifact;
use worker_packager::assets;
use worker_packager::bundle;
use worker_packager::config::AppConfig;
use worker_packager::manifest::DeployManifest;
use worker_packager::packager::{AssetUpload, DeploymentPackager, PackageInputs};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,worker_packager=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Worker Packager");

    // Load configuration; a positional argument overrides the manifest path
    let mut config = AppConfig::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.manifest_path = path.into();
    }
    tracing::info!("Configuration loaded: {:?}", config);

    let manifest = DeployManifest::load(&config.manifest_path)?;
    manifest.validate()?;

    // Gather worker source, auxiliary modules and any bundled assets
    let (worker_source, modules, mut asset_files) = match &config.source_bundle {
        Some(bundle_path) => {
            let bytes = fs::read(bundle_path)
                .with_context(|| format!("Failed to read source bundle: {:?}", bundle_path))?;
            let parsed = bundle::parse_bundle(&bytes)?;
            let source = parsed
                .worker_source
                .ok_or_else(|| anyhow::anyhow!("No entry module found in source bundle"))?;
            (source, parsed.modules, parsed.asset_files)
        }
        None => {
            let source = read_entry_module(&config.source_dir)?;
            let modules = read_modules(&config.source_dir, &manifest.modules)?;
            (source, modules, BTreeMap::new())
        }
    };

    let inputs = PackageInputs {
        script_name: manifest.script.name.clone(),
        worker_source,
        compatibility_date: manifest.script.compatibility_date.clone(),
        compatibility_flags: (!manifest.script.compatibility_flags.is_empty())
            .then(|| manifest.script.compatibility_flags.clone()),
        bindings: (!manifest.bindings.is_empty()).then(|| manifest.bindings.clone()),
        vars: (!manifest.vars.is_empty()).then(|| manifest.vars.clone()),
        modules: (!modules.is_empty()).then_some(modules),
        migrations: (!manifest.migrations.is_empty()).then(|| manifest.migrations.clone()),
    };

    let packager = DeploymentPackager::new();
    let deployment = if manifest.assets.is_some() || !asset_files.is_empty() {
        if let Some(section) = &manifest.assets {
            // Directory assets take precedence over bundled ones on collision
            asset_files.extend(assets::read_asset_dir(&section.directory)?);
        }
        let upload = AssetUpload {
            manifest: assets::manifest_for_files(&asset_files),
            files: asset_files,
            not_found_handling: manifest
                .assets
                .as_ref()
                .and_then(|section| section.not_found_handling),
        };
        packager.prepare_with_assets(inputs, upload)
    } else {
        packager.prepare_without_assets(inputs)
    };

    let receipt = artifact::write_artifact(&deployment, &config.output_dir)?;
    tracing::info!(
        package_id = %receipt.package_id,
        out = ?config.output_dir,
        "Deployment package written"
    );

    Ok(())
}

/// Find and read the worker entry module in the source directory.
fn read_entry_module(dir: &Path) -> Result<String> {
    for candidate in bundle::ENTRY_FILENAMES {
        let path = dir.join(candidate);
        if path.is_file() {
            return fs::read_to_string(&path)
                .with_context(|| format!("Failed to read entry module: {:?}", path));
        }
    }
    anyhow::bail!(
        "No entry module found in {:?} (expected one of {:?})",
        dir,
        bundle::ENTRY_FILENAMES
    )
}

/// Read the auxiliary modules listed in the manifest.
fn read_modules(dir: &Path, module_paths: &[String]) -> Result<BTreeMap<String, String>> {
    let mut modules = BTreeMap::new();
    for module_path in module_paths {
        let path = dir.join(module_path);
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read module: {:?}", path))?;
        modules.insert(module_path.clone(), source);
    }
    Ok(modules)
}
