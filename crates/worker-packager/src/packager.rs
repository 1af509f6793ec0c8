//! Deployment packaging
//!
//! Assembles worker code, static asset contents, auxiliary modules and the
//! deploy metadata descriptor into one in-memory artifact the publishing
//! pipeline commits and later submits to the platform deploy API.
//!
//! Packaging is a pure synchronous transformation: each call builds a fresh
//! artifact from its own inputs, shares no state with other calls, and
//! performs no I/O beyond structured log emission.

use std::collections::BTreeMap;

use bytes::Bytes;

use worker_packager_sdk::assets::{AssetManifest, AssetsBlock, AssetsConfig, NotFoundHandling};
use worker_packager_sdk::deployment::PreparedDeployment;
use worker_packager_sdk::metadata::{BindingSpec, WorkerMetadata};
use worker_packager_sdk::migrations::MigrationDirective;

use crate::handlers;
use crate::migrations;

/// Canonical entry module name for packaged workers.
pub const ENTRY_MODULE: &str = "worker.js";

/// Inputs common to both packaging entry points.
#[derive(Debug, Clone, Default)]
pub struct PackageInputs {
    /// Script name, as registered with the platform (non-empty)
    pub script_name: String,

    /// Raw worker entry-module source text
    pub worker_source: String,

    /// Platform compatibility date (YYYY-MM-DD)
    pub compatibility_date: String,

    /// Feature-flag tokens, in declaration order
    pub compatibility_flags: Option<Vec<String>>,

    /// Resource bindings attached to the worker
    pub bindings: Option<Vec<BindingSpec>>,

    /// Plain-text environment variables
    pub vars: Option<BTreeMap<String, String>>,

    /// Auxiliary module sources keyed by module path
    pub modules: Option<BTreeMap<String, String>>,

    /// Ordered migration-directive history, oldest first
    pub migrations: Option<Vec<MigrationDirective>>,
}

/// Static asset contents for the assets-enabled entry point.
///
/// The file map is owned by the caller until the call returns; afterwards
/// the prepared artifact carries it and the caller must not mutate it.
#[derive(Debug, Clone, Default)]
pub struct AssetUpload {
    /// Served path -> content descriptor
    pub manifest: AssetManifest,

    /// Served path -> raw file contents
    pub files: BTreeMap<String, Bytes>,

    /// Serving policy for paths missing from the manifest
    pub not_found_handling: Option<NotFoundHandling>,
}

/// Stateless packaging engine.
///
/// Folds the migration history, derives the exported handler list, and
/// assembles the final `PreparedDeployment`. Concurrent calls are safe;
/// nothing is shared between invocations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeploymentPackager;

impl DeploymentPackager {
    pub fn new() -> Self {
        Self
    }

    /// Prepare a deployment package carrying static assets.
    pub fn prepare_with_assets(
        &self,
        inputs: PackageInputs,
        assets: AssetUpload,
    ) -> PreparedDeployment {
        tracing::info!(
            script = %inputs.script_name,
            assets = assets.manifest.len(),
            modules = inputs.modules.as_ref().map_or(0, BTreeMap::len),
            "preparing deployment package"
        );

        let mut metadata = base_metadata(&inputs);
        metadata.assets = Some(AssetsBlock {
            manifest: assets.manifest.clone(),
            config: AssetsConfig {
                not_found_handling: assets.not_found_handling,
            },
        });

        assemble(inputs, metadata, Some(assets))
    }

    /// Prepare a deployment package with no asset block.
    pub fn prepare_without_assets(&self, inputs: PackageInputs) -> PreparedDeployment {
        tracing::info!(
            script = %inputs.script_name,
            assets = 0usize,
            modules = inputs.modules.as_ref().map_or(0, BTreeMap::len),
            "preparing deployment package"
        );

        let metadata = base_metadata(&inputs);
        assemble(inputs, metadata, None)
    }
}

/// Build the base metadata shared by both entry points.
fn base_metadata(inputs: &PackageInputs) -> WorkerMetadata {
    WorkerMetadata {
        main_module: ENTRY_MODULE.to_string(),
        compatibility_date: inputs.compatibility_date.clone(),
        compatibility_flags: inputs
            .compatibility_flags
            .clone()
            .filter(|flags| !flags.is_empty()),
        bindings: inputs.bindings.clone().unwrap_or_default(),
        assets: None,
        migrations: None,
        exported_handlers: None,
        vars: None,
    }
}

/// Attach migration and vars fields, then assemble the final artifact.
fn assemble(
    inputs: PackageInputs,
    mut metadata: WorkerMetadata,
    assets: Option<AssetUpload>,
) -> PreparedDeployment {
    let PackageInputs {
        script_name,
        worker_source,
        vars,
        modules,
        migrations: history,
        ..
    } = inputs;

    if let Some(descriptor) = migrations::merge(history.as_deref()) {
        let classes = handlers::exported_classes(&descriptor);
        metadata.migrations = Some(descriptor);
        if !classes.is_empty() {
            metadata.exported_handlers = Some(classes);
        }
    }

    // Empty maps never reach the wire.
    if let Some(vars) = vars.filter(|v| !v.is_empty()) {
        metadata.vars = Some(vars);
    }
    let modules = modules.filter(|m| !m.is_empty());

    let (asset_manifest, files) = match assets {
        Some(upload) => (Some(upload.manifest), Some(upload.files)),
        None => (None, None),
    };

    let deployment = PreparedDeployment {
        script_name,
        metadata,
        worker_source,
        asset_manifest,
        files,
        modules,
    };

    tracing::info!(
        script = %deployment.script_name,
        assets = deployment.asset_count(),
        modules = deployment.module_count(),
        "deployment package ready"
    );

    deployment
}

#[cfg(test)]
mod tests {
    use super::*;
    use worker_packager_sdk::assets::AssetEntry;
    use worker_packager_sdk::migrations::RenamedClass;

    fn inputs(script: &str) -> PackageInputs {
        PackageInputs {
            script_name: script.to_string(),
            worker_source: "export default { fetch() {} }".to_string(),
            compatibility_date: "2025-06-01".to_string(),
            ..Default::default()
        }
    }

    fn sample_assets() -> AssetUpload {
        let mut manifest = AssetManifest::default();
        manifest.insert(
            "/index.html",
            AssetEntry {
                hash: "0f".repeat(32),
                size: 64,
            },
        );
        let mut files = BTreeMap::new();
        files.insert("/index.html".to_string(), Bytes::from_static(b"<html></html>"));
        AssetUpload {
            manifest,
            files,
            not_found_handling: Some(NotFoundHandling::SinglePageApplication),
        }
    }

    #[test]
    fn test_empty_vars_and_migrations_leave_fields_absent() {
        let mut input = inputs("empty-worker");
        input.vars = Some(BTreeMap::new());
        input.migrations = Some(Vec::new());

        let deployment = DeploymentPackager::new().prepare_without_assets(input);
        assert!(deployment.metadata.vars.is_none());
        assert!(deployment.metadata.migrations.is_none());
        assert!(deployment.metadata.exported_handlers.is_none());

        let value = serde_json::to_value(&deployment.metadata).unwrap();
        let obj = value.as_object().unwrap();
        assert!(!obj.contains_key("vars"));
        assert!(!obj.contains_key("migrations"));
        assert!(!obj.contains_key("exported_handlers"));
    }

    #[test]
    fn test_assets_round_trip() {
        let upload = sample_assets();
        let expected = upload.manifest.clone();

        let deployment =
            DeploymentPackager::new().prepare_with_assets(inputs("asset-worker"), upload);

        let block = deployment.metadata.assets.as_ref().unwrap();
        assert_eq!(block.manifest, expected);
        assert_eq!(
            block.config.not_found_handling,
            Some(NotFoundHandling::SinglePageApplication)
        );
        assert_eq!(deployment.asset_manifest.as_ref(), Some(&expected));
        assert!(deployment.files.as_ref().unwrap().contains_key("/index.html"));
    }

    #[test]
    fn test_no_assets_path_never_sets_assets_field() {
        let mut input = inputs("plain-worker");
        input.vars = Some(BTreeMap::from([(
            "MODE".to_string(),
            "production".to_string(),
        )]));

        let deployment = DeploymentPackager::new().prepare_without_assets(input);
        assert!(deployment.metadata.assets.is_none());
        assert!(deployment.asset_manifest.is_none());
        assert!(deployment.files.is_none());
    }

    #[test]
    fn test_migration_history_populates_metadata() {
        let mut input = inputs("stateful-worker");
        input.migrations = Some(vec![
            MigrationDirective {
                tag: "v1".to_string(),
                new_classes: vec!["Counter".to_string(), "Session".to_string()],
                ..Default::default()
            },
            MigrationDirective {
                tag: "v2".to_string(),
                renamed_classes: vec![RenamedClass::new("Counter", "HitCounter")],
                ..Default::default()
            },
        ]);

        let deployment = DeploymentPackager::new().prepare_without_assets(input);
        let descriptor = deployment.metadata.migrations.as_ref().unwrap();
        assert_eq!(descriptor.new_classes, vec!["Session"]);
        assert_eq!(
            descriptor.renamed_classes,
            vec![RenamedClass::new("Counter", "HitCounter")]
        );
        assert_eq!(
            deployment.metadata.exported_handlers.as_deref(),
            Some(&["Session".to_string(), "HitCounter".to_string()][..])
        );
    }

    #[test]
    fn test_deleted_only_history_attaches_no_handler_list() {
        let mut input = inputs("shrinking-worker");
        input.migrations = Some(vec![
            MigrationDirective {
                tag: "v1".to_string(),
                new_classes: vec!["Counter".to_string()],
                ..Default::default()
            },
            MigrationDirective {
                tag: "v2".to_string(),
                deleted_classes: vec!["Counter".to_string()],
                ..Default::default()
            },
        ]);

        let deployment = DeploymentPackager::new().prepare_without_assets(input);
        let descriptor = deployment.metadata.migrations.as_ref().unwrap();
        assert_eq!(descriptor.deleted_classes, vec!["Counter"]);
        assert!(deployment.metadata.exported_handlers.is_none());
    }

    #[test]
    fn test_entry_module_and_bindings_defaults() {
        let deployment = DeploymentPackager::new().prepare_without_assets(inputs("w"));
        assert_eq!(deployment.metadata.main_module, ENTRY_MODULE);
        assert!(deployment.metadata.bindings.is_empty());

        let value = serde_json::to_value(&deployment.metadata).unwrap();
        assert!(value.as_object().unwrap().contains_key("bindings"));
    }

    #[test]
    fn test_empty_compatibility_flags_are_dropped() {
        let mut input = inputs("flagless-worker");
        input.compatibility_flags = Some(Vec::new());

        let deployment = DeploymentPackager::new().prepare_without_assets(input);
        assert!(deployment.metadata.compatibility_flags.is_none());
    }
}
