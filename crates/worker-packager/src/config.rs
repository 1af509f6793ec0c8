//! Application configuration

use std::env;
use std::path::PathBuf;

/// Packager CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the deploy manifest
    pub manifest_path: PathBuf,

    /// Directory containing the worker entry module and auxiliary modules
    pub source_dir: PathBuf,

    /// Prebuilt source bundle (zip) used instead of the source directory
    pub source_bundle: Option<PathBuf>,

    /// Directory the prepared artifact is written into
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            manifest_path: env::var("WORKER_PACKAGER_MANIFEST")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./deploy.yaml")),

            source_dir: env::var("WORKER_PACKAGER_SOURCE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./src")),

            source_bundle: env::var("WORKER_PACKAGER_SOURCE_BUNDLE")
                .ok()
                .map(PathBuf::from),

            output_dir: env::var("WORKER_PACKAGER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./dist")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
