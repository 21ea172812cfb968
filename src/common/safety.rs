use std::path::{Path, PathBuf};

/// Paths that must NEVER be recursively deleted under any circumstances.
/// The staging directory is wiped at the start and end of every export,
/// so a misconfigured staging path must not land on one of these.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/Applications",
    "/Users",
    "/Library",
    "/home",
    "/root",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/etc",
    "/opt",
    "/private",
    "/tmp",
    "/Volumes",
];

/// Paths under home that must never be deleted entirely
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Library",
    ".ssh",
    ".gnupg",
];

/// Check if a path is protected and should NEVER be deleted
pub fn is_protected(path: &Path) -> bool {
    if path.parent().is_none() {
        // Filesystem roots, including Windows drive roots
        return true;
    }

    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    if let Some(home) = dirs::home_dir() {
        for dir in PROTECTED_HOME_DIRS {
            let protected_path = if dir.is_empty() {
                home.clone()
            } else {
                home.join(dir)
            };
            if path == protected_path {
                return true;
            }
        }
    }

    false
}

/// Best-effort absolute form of a path that may not exist yet.
///
/// The deepest existing ancestor is canonicalized and the missing
/// components are re-attached unchanged.
pub fn absolute_path(path: &Path) -> PathBuf {
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut missing = Vec::new();
    let mut existing = path.as_path();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                existing = parent;
            }
            _ => return path,
        }
    }
}

/// Validate that `staging` can be wiped without touching the project.
///
/// `sources` are the manifest directories that will be copied into staging;
/// staging nested inside one of them would copy into itself.
/// Returns a human readable reason when the path is unsafe.
pub fn check_staging_path(
    staging: &Path,
    source_root: &Path,
    sources: &[PathBuf],
) -> Result<(), String> {
    let staging = absolute_path(staging);
    let root = absolute_path(source_root);

    if is_protected(&staging) {
        return Err("path is a protected system or home directory".to_string());
    }

    if staging == root {
        return Err("path is the source root itself".to_string());
    }

    if root.starts_with(&staging) {
        return Err("path contains the source root".to_string());
    }

    for source in sources {
        let source = absolute_path(source);
        if staging.starts_with(&source) || source.starts_with(&staging) {
            return Err(format!(
                "path overlaps manifest directory '{}'",
                source.display()
            ));
        }
    }

    Ok(())
}
