use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A file discovered during traversal whose name carries the sweep suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
}

/// Files found under a root plus the traversal errors hit on the way
#[derive(Debug, Default)]
pub struct WalkResult {
    pub candidates: Vec<Candidate>,
    pub errors: Vec<String>,
}

/// Case-sensitive literal suffix match on the file name only
pub fn name_matches(name: &OsStr, suffix: &str) -> bool {
    !suffix.is_empty() && name.as_encoded_bytes().ends_with(suffix.as_bytes())
}

/// Walk `root` and collect every non-directory entry whose name ends with `suffix`.
///
/// Symlinks are not followed. A symlink pointing at a directory is treated
/// like a directory and never becomes a candidate.
pub fn find_candidates(root: &Path, suffix: &str) -> WalkResult {
    let mut result = WalkResult::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let location = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                tracing::warn!(path = %location, error = %e, "Skipping unreadable entry");
                result.errors.push(format!("Cannot read '{}': {}", location, e));
                continue;
            }
        };

        // Skip directories themselves (we only delete files)
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() && entry.path().is_dir() {
            continue;
        }

        if name_matches(entry.file_name(), suffix) {
            result.candidates.push(Candidate {
                path: entry.into_path(),
            });
        }
    }

    result
}
