use chrono::{Datelike, Local, Timelike};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::common::errors::ExportError;
use crate::common::format;

/// What ended up inside the archive
#[derive(Debug, Default)]
pub struct ArchiveSummary {
    /// Entry names in write order
    pub entries: Vec<String>,
    /// Uncompressed bytes written
    pub bytes: u64,
}

/// Zip entry name for `path`, relative to `base`, always `/`-separated
pub fn entry_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Convert a file's mtime to a zip timestamp; zip cannot store dates before 1980
fn zip_timestamp(modified: SystemTime) -> Option<zip::DateTime> {
    let local: chrono::DateTime<Local> = modified.into();
    let year = u16::try_from(local.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}

/// Write every regular file under `staging` into a zip at `archive_path`.
///
/// An existing archive is truncated. Entries are deflate-compressed and
/// named by their path relative to `staging`.
pub fn write_archive(
    staging: &Path,
    archive_path: &Path,
    show_progress: bool,
) -> Result<ArchiveSummary, ExportError> {
    let mut files: Vec<(PathBuf, String)> = Vec::new();
    for entry in WalkDir::new(staging).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| ExportError::Archive {
            path: archive_path.to_path_buf(),
            message: format!("failed to walk staging directory: {}", e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(name) = entry_name(staging, entry.path()) {
            files.push((entry.into_path(), name));
        }
    }

    let out = File::create(archive_path).map_err(|e| ExportError::archive_io(archive_path, e))?;
    let mut writer = ZipWriter::new(out);

    let pb = if show_progress {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} Archiving... {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let mut summary = ArchiveSummary::default();

    for (path, name) in files {
        if let Some(ref pb) = pb {
            pb.set_message(format::truncate(&name, 40));
        }

        let mut source = File::open(&path).map_err(|e| ExportError::archive_io(&path, e))?;
        let mut options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        if let Some(ts) = source
            .metadata()
            .and_then(|m| m.modified())
            .ok()
            .and_then(zip_timestamp)
        {
            options = options.last_modified_time(ts);
        }

        writer
            .start_file(name.as_str(), options)
            .map_err(|e| ExportError::archive_zip(archive_path, e))?;
        let written = std::io::copy(&mut source, &mut writer)
            .map_err(|e| ExportError::archive_io(archive_path, e))?;

        tracing::debug!(entry = %name, bytes = written, "Archived");
        summary.bytes += written;
        summary.entries.push(name);

        if let Some(ref pb) = pb {
            pb.inc(1);
        }
    }

    writer
        .finish()
        .map_err(|e| ExportError::archive_zip(archive_path, e))?;

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    Ok(summary)
}
