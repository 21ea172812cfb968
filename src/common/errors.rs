use std::path::PathBuf;

use thiserror::Error;

/// Typed failures raised by the bundle exporter.
/// We use `anyhow` at the top level for CLI error handling,
/// but these typed errors let callers tell the fatal export steps apart.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Staging path would delete the project itself or a system directory
    #[error("Refusing to use '{path}' as staging directory: {reason}")]
    UnsafeStaging { path: PathBuf, reason: String },

    /// A manifest entry is not a plain name directly under the source root
    #[error("Invalid manifest entry '{name}': {reason}")]
    InvalidManifestEntry { name: String, reason: String },

    /// A stale staging directory could not be removed
    #[error("Failed to clean stale staging directory '{path}'")]
    StagingCleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The staging directory was still present after cleaning
    #[error("Staging directory '{path}' already exists after cleanup")]
    StagingExists { path: PathBuf },

    /// The staging directory could not be created
    #[error("Failed to create staging directory '{path}'")]
    StagingCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a manifest entry into staging failed
    #[error("Failed to copy '{from}' to '{to}'")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the zip archive failed
    #[error("Failed to write archive '{path}': {message}")]
    Archive { path: PathBuf, message: String },

    /// Removing the staging directory after archiving failed
    #[error("Archive written but failed to remove staging directory '{path}'")]
    Teardown {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Wrap an I/O failure that happened while producing the archive
    pub fn archive_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        ExportError::Archive {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Wrap a zip library failure
    pub fn archive_zip(path: impl Into<PathBuf>, err: zip::result::ZipError) -> Self {
        ExportError::Archive {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
