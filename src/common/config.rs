use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::exporter::manifest::BundleManifest;

/// Default suffix removed by `sweepkit sweep`
pub const DEFAULT_SWEEP_SUFFIX: &str = ".bmp";

/// Default staging directory name, relative to the source root
pub const DEFAULT_STAGING_DIR: &str = "export";

/// Default archive file name, relative to the source root
pub const DEFAULT_ARCHIVE_NAME: &str = "export.zip";

/// Settings for one sweep run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Tree to walk
    pub root: PathBuf,

    /// Case-sensitive file name suffix to delete
    #[serde(default = "default_suffix")]
    pub suffix: String,
}

fn default_suffix() -> String {
    DEFAULT_SWEEP_SUFFIX.to_string()
}

impl SweepConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            suffix: default_suffix(),
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

/// Everything one export run needs, passed explicitly instead of read from globals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Which folders and files to bundle
    #[serde(default)]
    pub manifest: BundleManifest,

    /// Directory the manifest names are looked up in
    #[serde(default = "default_source_root")]
    pub source_root: PathBuf,

    /// Transient directory assembled before compression
    #[serde(default = "default_staging_path")]
    pub staging_path: PathBuf,

    /// Output zip file, overwritten if present
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,
}

fn default_source_root() -> PathBuf {
    PathBuf::from(".")
}
fn default_staging_path() -> PathBuf {
    PathBuf::from(DEFAULT_STAGING_DIR)
}
fn default_archive_path() -> PathBuf {
    PathBuf::from(DEFAULT_ARCHIVE_NAME)
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            manifest: BundleManifest::default(),
            source_root: default_source_root(),
            staging_path: default_staging_path(),
            archive_path: default_archive_path(),
        }
    }
}

impl ExportConfig {
    /// Default manifest and file names, rooted at `source_root`
    pub fn rooted_at(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            ..Self::default()
        }
    }

    pub fn with_manifest(mut self, manifest: BundleManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Staging directory with relative paths resolved against the source root
    pub fn resolved_staging_path(&self) -> PathBuf {
        self.resolve(&self.staging_path)
    }

    /// Archive path with relative paths resolved against the source root
    pub fn resolved_archive_path(&self) -> PathBuf {
        self.resolve(&self.archive_path)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.source_root.join(path)
        }
    }
}
