//! Worker Deployment Packager
//!
//! Prepares self-contained deployment packages for edge worker scripts:
//! worker code, static asset contents, auxiliary modules, and the deploy
//! metadata descriptor (bindings, vars, compatibility settings, folded
//! actor-class migrations) assembled into one artifact a publishing
//! pipeline can commit and later submit to the platform deploy API.
//!
//! The packager never talks to the platform itself and does not validate
//! worker code; it only produces the artifact a caller transmits.

pub mod artifact;
pub mod assets;
pub mod bundle;
pub mod config;
pub mod handlers;
pub mod manifest;
pub mod migrations;
pub mod packager;

pub use packager::{AssetUpload, DeploymentPackager, PackageInputs, ENTRY_MODULE};
