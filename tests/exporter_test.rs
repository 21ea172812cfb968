use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

use sweepkit::common::config::ExportConfig;
use sweepkit::common::errors::ExportError;
use sweepkit::exporter::{export, BundleManifest};

/// Read every entry of a zip into name → bytes
fn read_archive(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entries = BTreeMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.is_dir() {
            continue;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).unwrap();
        entries.insert(entry.name().to_string(), buf);
    }
    entries
}

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn config_for(root: &Path, dirs: &[&str], files: &[&str]) -> ExportConfig {
    ExportConfig::rooted_at(root).with_manifest(BundleManifest::new(dirs, files))
}

#[test]
fn test_export_sounds_and_readme() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"RIFF....WAVE");
    write(dir.path(), "readme.txt", b"read me");

    let config = config_for(dir.path(), &["Sounds"], &["readme.txt"]);
    let report = export(&config, false).unwrap();

    let archive_path = dir.path().join("export.zip");
    assert_eq!(report.archive_path, archive_path);

    let entries = read_archive(&archive_path);
    assert_eq!(
        entries.keys().cloned().collect::<Vec<_>>(),
        vec!["Sounds/a.wav".to_string(), "readme.txt".to_string()]
    );
    assert_eq!(entries["Sounds/a.wav"], b"RIFF....WAVE");
    assert_eq!(entries["readme.txt"], b"read me");

    assert!(!dir.path().join("export").exists(), "Staging must not persist");
}

#[test]
fn test_export_round_trip_nested_tree() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Levels/act1/map.lvl", b"map one");
    write(dir.path(), "Levels/act2/deep/map.lvl", b"map two");
    write(dir.path(), "Shaders/basic.frag", b"void main() {}");
    write(dir.path(), "tools/SDL2.dll", b"not at the root");
    write(dir.path(), "SDL2.dll", &[0u8, 1, 2, 3, 255]);

    let config = config_for(dir.path(), &["Levels", "Shaders"], &["SDL2.dll"]);
    let report = export(&config, false).unwrap();

    let entries = read_archive(&dir.path().join("export.zip"));
    assert_eq!(entries.len(), 4);
    assert_eq!(entries["Levels/act1/map.lvl"], b"map one");
    assert_eq!(entries["Levels/act2/deep/map.lvl"], b"map two");
    assert_eq!(entries["Shaders/basic.frag"], b"void main() {}");
    assert_eq!(entries["SDL2.dll"], vec![0u8, 1, 2, 3, 255]);

    assert!(entries.keys().all(|name| !name.starts_with('/') && !name.contains('\\')));
    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.bytes_archived, 7 + 7 + 14 + 5);
}

#[test]
fn test_export_tolerates_missing_manifest_entries() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/shot.wav", b"bang");
    write(dir.path(), "FFFFORWA.TTF", b"font");

    // Default manifest names many things this tree does not have
    let config = ExportConfig::rooted_at(dir.path());
    let report = export(&config, false).unwrap();

    let entries = read_archive(&dir.path().join("export.zip"));
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key("Sounds/shot.wav"));
    assert!(entries.contains_key("FFFFORWA.TTF"));

    assert_eq!(report.copied_dirs, vec!["Sounds"]);
    assert_eq!(report.copied_files, vec!["FFFFORWA.TTF"]);
    assert!(report.skipped.contains(&"Textures".to_string()));
    assert!(report.skipped.contains(&"SDL2.dll".to_string()));
}

#[test]
fn test_export_file_named_like_manifest_dir_is_skipped() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds", b"a file, not a folder");

    let config = config_for(dir.path(), &["Sounds"], &[]);
    let report = export(&config, false).unwrap();

    assert!(report.entries.is_empty());
    assert_eq!(report.skipped, vec!["Sounds"]);
    assert!(read_archive(&dir.path().join("export.zip")).is_empty());
}

#[test]
fn test_export_starts_from_clean_staging() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");
    write(dir.path(), "export/leftover.txt", b"stale from a crashed run");
    write(dir.path(), "export/Sounds/old.wav", b"stale");

    let config = config_for(dir.path(), &["Sounds"], &[]);
    export(&config, false).unwrap();

    let entries = read_archive(&dir.path().join("export.zip"));
    assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["Sounds/a.wav"]);
    assert!(!dir.path().join("export").exists());
}

#[test]
fn test_export_overwrites_existing_archive() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "readme.txt", b"fresh");
    write(dir.path(), "export.zip", b"this is not a zip file at all");

    let config = config_for(dir.path(), &[], &["readme.txt"]);
    export(&config, false).unwrap();

    let entries = read_archive(&dir.path().join("export.zip"));
    assert_eq!(entries["readme.txt"], b"fresh");
}

#[test]
fn test_export_custom_paths() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write(dir.path(), "Textures/wall.png", b"png");

    let mut config = config_for(dir.path(), &["Textures"], &[]);
    config.staging_path = "build-staging".into();
    config.archive_path = out.path().join("game.zip");

    let report = export(&config, false).unwrap();

    assert_eq!(report.archive_path, out.path().join("game.zip"));
    assert!(read_archive(&out.path().join("game.zip")).contains_key("Textures/wall.png"));
    assert!(!dir.path().join("build-staging").exists());
    assert!(!dir.path().join("export.zip").exists());
}

#[test]
fn test_export_sources_untouched() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");
    write(dir.path(), "readme.txt", b"r");

    let config = config_for(dir.path(), &["Sounds"], &["readme.txt"]);
    export(&config, false).unwrap();

    assert_eq!(std::fs::read(dir.path().join("Sounds/a.wav")).unwrap(), b"a");
    assert_eq!(std::fs::read(dir.path().join("readme.txt")).unwrap(), b"r");
}

#[test]
fn test_export_refuses_root_as_staging() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");

    let mut config = config_for(dir.path(), &["Sounds"], &[]);
    config.staging_path = ".".into();

    let err = export(&config, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::UnsafeStaging { .. })
    ));
    assert!(dir.path().join("Sounds/a.wav").exists(), "Project must be untouched");
}

#[test]
fn test_export_refuses_archive_inside_staging() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(dir.path(), &[], &[]);
    config.archive_path = "export/export.zip".into();

    let err = export(&config, false).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::UnsafeStaging { .. })
    ));
}

#[test]
fn test_archive_failure_still_removes_staging() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");
    // A directory where the archive should go makes the archive step fail
    std::fs::create_dir(dir.path().join("export.zip")).unwrap();

    let config = config_for(dir.path(), &["Sounds"], &[]);
    let err = export(&config, false).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::Archive { .. })
    ));
    assert!(!dir.path().join("export").exists(), "Staging is removed even on failure");
}

#[test]
fn test_empty_manifest_produces_empty_archive() {
    let dir = TempDir::new().unwrap();
    let config = config_for(dir.path(), &[], &[]);

    let report = export(&config, false).unwrap();

    assert!(report.entries.is_empty());
    assert!(read_archive(&dir.path().join("export.zip")).is_empty());
}

#[test]
fn test_absolute_manifest_dir_rejected_without_touching_source() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"precious audio");
    let absolute = dir.path().join("Sounds");

    let config = ExportConfig::rooted_at(dir.path())
        .with_manifest(BundleManifest::new(&[absolute.to_str().unwrap()], &[] as &[&str]));
    let err = export(&config, false).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::InvalidManifestEntry { .. })
    ));
    assert_eq!(
        std::fs::read(dir.path().join("Sounds/a.wav")).unwrap(),
        b"precious audio"
    );
    assert!(!dir.path().join("export").exists());
    assert!(!dir.path().join("export.zip").exists());
}

#[test]
fn test_parent_manifest_dir_rejected_without_stray_copy() {
    let outer = TempDir::new().unwrap();
    let root = outer.path().join("game");
    write(outer.path(), "Shared/common.txt", b"shared");
    write(&root, "keep.txt", b"keep");

    let config = config_for(&root, &["../Shared"], &[]);
    let err = export(&config, false).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::InvalidManifestEntry { .. })
    ));
    let mut listing: Vec<String> = std::fs::read_dir(&root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    listing.sort();
    assert_eq!(listing, vec!["keep.txt"]);
}

#[test]
fn test_nested_manifest_file_rejected() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "docs/readme.txt", b"r");

    let config = config_for(dir.path(), &[], &["docs/readme.txt"]);
    let err = export(&config, false).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::InvalidManifestEntry { .. })
    ));
}

#[cfg(unix)]
#[test]
fn test_blocked_staging_cleanup_aborts_export() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");
    write(dir.path(), "export/stale.txt", b"locked in");
    let staging = dir.path().join("export");
    std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore directory permissions; nothing to simulate then
    let check = staging.join("write-check");
    if std::fs::write(&check, b"x").is_ok() {
        std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let config = config_for(dir.path(), &["Sounds"], &[]);
    let result = export(&config, false);
    std::fs::set_permissions(&staging, std::fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::StagingCleanup { .. })
    ));
    assert!(!dir.path().join("export.zip").exists(), "No archive after a failed cleanup");
}

#[cfg(unix)]
#[test]
fn test_unreadable_source_file_aborts_export() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write(dir.path(), "Sounds/a.wav", b"a");
    write(dir.path(), "Sounds/secret.wav", b"s");
    let secret = dir.path().join("Sounds/secret.wav");
    std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can read it anyway; nothing to simulate then
    if std::fs::File::open(&secret).is_ok() {
        return;
    }

    let config = config_for(dir.path(), &["Sounds"], &[]);
    let err = export(&config, false).unwrap_err();
    std::fs::set_permissions(&secret, std::fs::Permissions::from_mode(0o644)).unwrap();

    assert!(matches!(
        err.downcast_ref::<ExportError>(),
        Some(ExportError::Copy { .. })
    ));
    assert!(!dir.path().join("export.zip").exists(), "Copy failures stop before archiving");
}
