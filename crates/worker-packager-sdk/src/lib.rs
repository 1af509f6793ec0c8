//! Worker Packager SDK - Types shared with downstream publishers
//!
//! This crate defines the wire and artifact types produced by the Worker
//! Packager: the deploy metadata descriptor the platform API accepts, the
//! migration directive/descriptor shapes, the asset manifest, and the
//! prepared-deployment artifact a publishing pipeline commits.

pub mod assets;
pub mod deployment;
pub mod metadata;
pub mod migrations;

pub mod prelude {
    //! Common imports for publisher integrations
    pub use crate::assets::{AssetEntry, AssetManifest, AssetsBlock, AssetsConfig, NotFoundHandling};
    pub use crate::deployment::PreparedDeployment;
    pub use crate::metadata::{BindingSpec, WorkerMetadata};
    pub use crate::migrations::{MigrationDescriptor, MigrationDirective, RenamedClass};
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{json, Value as JsonValue};
}

// Re-export key types at crate root
pub use assets::{AssetManifest, NotFoundHandling};
pub use deployment::PreparedDeployment;
pub use metadata::{BindingSpec, WorkerMetadata};
pub use migrations::{MigrationDescriptor, MigrationDirective};
