use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

use crate::common::errors::ExportError;

/// Folders bundled by default, in copy order
pub const DEFAULT_DIRECTORIES: &[&str] = &["Sounds", "Textures", "Levels", "Shaders"];

/// Files bundled by default, in copy order
pub const DEFAULT_FILES: &[&str] = &[
    "SDL2.dll",
    "SDL2_ttf.dll",
    "SDL2_gpu.dll",
    "handcannon_multiplayer.exe",
    "FFFFORWA.TTF",
    "run_as_server.bat",
];

/// The folder and file names an export run tries to include.
///
/// This is a wishlist: names missing from the source root are skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Directory names, copied recursively under their own name
    #[serde(default)]
    pub directory_names: Vec<String>,

    /// File names, copied flat into the staging root
    #[serde(default)]
    pub file_names: Vec<String>,
}

impl Default for BundleManifest {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORIES, DEFAULT_FILES)
    }
}

impl BundleManifest {
    pub fn new<D, F>(directories: &[D], files: &[F]) -> Self
    where
        D: AsRef<str>,
        F: AsRef<str>,
    {
        Self {
            directory_names: directories.iter().map(|d| d.as_ref().to_string()).collect(),
            file_names: files.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    /// Check that every entry is a single plain name.
    ///
    /// Absolute paths, `..`, `.` and nested paths would let a copy escape
    /// staging or land on top of its own source.
    pub fn validate(&self) -> Result<(), ExportError> {
        for name in self.directory_names.iter().chain(&self.file_names) {
            check_entry_name(name)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.directory_names.is_empty() && self.file_names.is_empty()
    }

    /// Total number of manifest entries
    pub fn len(&self) -> usize {
        self.directory_names.len() + self.file_names.len()
    }
}

fn check_entry_name(name: &str) -> Result<(), ExportError> {
    let invalid = |reason: &str| ExportError::InvalidManifestEntry {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        (None, _) => Err(invalid("empty name")),
        (Some(Component::RootDir | Component::Prefix(_)), _) => {
            Err(invalid("absolute paths are not allowed"))
        }
        (Some(Component::ParentDir | Component::CurDir), None) => {
            Err(invalid("must name an entry inside the source root"))
        }
        _ => Err(invalid("must be a single name without separators")),
    }
}
