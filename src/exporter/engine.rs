use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use super::archive;
use super::staging;
use crate::common::config::ExportConfig;
use crate::common::errors::ExportError;
use crate::common::safety;

/// Report from a successful export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    /// Where the archive was written
    pub archive_path: PathBuf,
    /// Entry names inside the archive, relative to the staging root
    pub entries: Vec<String>,
    /// Manifest directories that were found and copied
    pub copied_dirs: Vec<String>,
    /// Manifest files that were found and copied
    pub copied_files: Vec<String>,
    /// Manifest names absent from the source root
    pub skipped: Vec<String>,
    /// Uncompressed bytes written into the archive
    pub bytes_archived: u64,
    pub duration_secs: f64,
}

/// Copy the manifest into a fresh staging directory, zip it, then remove staging.
///
/// Missing manifest entries are skipped. Any operational failure aborts the
/// run; staging is still removed if the failure happened while archiving.
pub fn export(config: &ExportConfig, show_progress: bool) -> Result<ExportReport> {
    let start = Instant::now();
    let source_root = &config.source_root;
    let staging_path = config.resolved_staging_path();
    let archive_path = config.resolved_archive_path();

    config.manifest.validate()?;
    if config.manifest.is_empty() {
        tracing::warn!("Manifest is empty, the archive will have no entries");
    } else {
        tracing::debug!(entries = config.manifest.len(), "Manifest validated");
    }

    let source_dirs: Vec<PathBuf> = config
        .manifest
        .directory_names
        .iter()
        .map(|name| source_root.join(name))
        .collect();

    safety::check_staging_path(&staging_path, source_root, &source_dirs).map_err(|reason| {
        ExportError::UnsafeStaging {
            path: staging_path.clone(),
            reason,
        }
    })?;

    if safety::absolute_path(&archive_path).starts_with(safety::absolute_path(&staging_path)) {
        return Err(ExportError::UnsafeStaging {
            path: staging_path,
            reason: "archive would be written inside the staging directory".to_string(),
        }
        .into());
    }

    tracing::info!(
        staging = %staging_path.display(),
        archive = %archive_path.display(),
        "Preparing staging directory"
    );
    staging::prepare_staging(&staging_path)?;

    let mut report = ExportReport {
        archive_path: archive_path.clone(),
        entries: Vec::new(),
        copied_dirs: Vec::new(),
        copied_files: Vec::new(),
        skipped: Vec::new(),
        bytes_archived: 0,
        duration_secs: 0.0,
    };

    for (name, src) in config.manifest.directory_names.iter().zip(&source_dirs) {
        if !src.is_dir() {
            tracing::debug!(name = %name, "Directory not present, skipping");
            report.skipped.push(name.clone());
            continue;
        }

        let copied = staging::copy_dir_recursive(src, &staging_path.join(name))
            .with_context(|| format!("Failed to stage directory '{}'", name))?;
        tracing::info!(name = %name, files = copied, "Staged directory");
        report.copied_dirs.push(name.clone());
    }

    for name in &config.manifest.file_names {
        let src = source_root.join(name);
        if !src.is_file() {
            tracing::debug!(name = %name, "File not present, skipping");
            report.skipped.push(name.clone());
            continue;
        }

        staging::copy_file_flat(&src, &staging_path)
            .with_context(|| format!("Failed to stage file '{}'", name))?;
        tracing::info!(name = %name, "Staged file");
        report.copied_files.push(name.clone());
    }

    let archived = archive::write_archive(&staging_path, &archive_path, show_progress);

    // Staging goes away whether or not the archive was written
    let teardown = staging::teardown_staging(&staging_path);

    let summary = match archived {
        Ok(summary) => summary,
        Err(e) => {
            if let Err(teardown_err) = teardown {
                tracing::warn!(error = %teardown_err, "Failed to remove staging after archive error");
            }
            return Err(e.into());
        }
    };
    teardown?;

    report.entries = summary.entries;
    report.bytes_archived = summary.bytes;
    report.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        archive = %archive_path.display(),
        entries = report.entries.len(),
        "Export complete"
    );

    Ok(report)
}
