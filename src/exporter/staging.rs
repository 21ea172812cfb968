use std::fs;
use std::path::{Path, PathBuf};

use crate::common::errors::ExportError;

/// Remove any stale staging directory and create a fresh, empty one
pub fn prepare_staging(staging: &Path) -> Result<(), ExportError> {
    if staging.symlink_metadata().is_ok() {
        tracing::debug!(path = %staging.display(), "Removing stale staging directory");
        remove_path(staging).map_err(|source| ExportError::StagingCleanup {
            path: staging.to_path_buf(),
            source,
        })?;
    }

    // Non-recursive create: a path that reappeared here is an invariant violation
    match fs::create_dir(staging) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(ExportError::StagingExists {
                path: staging.to_path_buf(),
            })
        }
        Err(source) => Err(ExportError::StagingCreate {
            path: staging.to_path_buf(),
            source,
        }),
    }
}

/// Delete the staging directory after archiving
pub fn teardown_staging(staging: &Path) -> Result<(), ExportError> {
    if staging.symlink_metadata().is_err() {
        return Ok(());
    }
    remove_path(staging).map_err(|source| ExportError::Teardown {
        path: staging.to_path_buf(),
        source,
    })
}

/// Recursively copy a directory, returning the number of files copied
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize, ExportError> {
    let copy_err = |source| ExportError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };

    fs::create_dir_all(dst).map_err(copy_err)?;

    let mut entries = fs::read_dir(src)
        .and_then(|rd| rd.collect::<std::io::Result<Vec<_>>>())
        .map_err(copy_err)?;
    entries.sort_by_key(|e| e.file_name());

    let mut copied = 0usize;
    for entry in entries {
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            copy_file(&src_path, &dst_path)?;
            copied += 1;
        }
    }

    preserve_mtime(src, dst);
    Ok(copied)
}

/// Copy a single file into `dir`, keeping only its file name
pub fn copy_file_flat(src: &Path, dir: &Path) -> Result<PathBuf, ExportError> {
    let name = src.file_name().ok_or_else(|| ExportError::Copy {
        from: src.to_path_buf(),
        to: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let dst = dir.join(name);
    copy_file(src, &dst)?;
    Ok(dst)
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), ExportError> {
    fs::copy(src, dst).map_err(|source| ExportError::Copy {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    })?;
    preserve_mtime(src, dst);
    Ok(())
}

/// Carry the source modification time over to the copy, when the platform allows it
fn preserve_mtime(src: &Path, dst: &Path) {
    let modified = match fs::metadata(src).and_then(|m| m.modified()) {
        Ok(t) => t,
        Err(_) => return,
    };

    let result = fs::File::options()
        .write(true)
        .open(dst)
        .or_else(|_| fs::File::open(dst))
        .and_then(|f| f.set_modified(modified));

    if let Err(e) = result {
        tracing::debug!(path = %dst.display(), error = %e, "Could not preserve modification time");
    }
}

fn remove_path(path: &Path) -> std::io::Result<()> {
    let metadata = path.symlink_metadata()?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
