use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::walker;

/// What happened to one matching file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepStatus {
    Deleted,
    Failed { cause: String },
}

/// Per-file record produced by a sweep
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: SweepStatus,
}

impl SweepOutcome {
    pub fn is_deleted(&self) -> bool {
        self.status == SweepStatus::Deleted
    }
}

/// Summary of a whole sweep, separate from the per-file outcomes
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub root: PathBuf,
    pub suffix: String,
    pub started_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub deleted: usize,
    pub failed: usize,
    pub outcomes: Vec<SweepOutcome>,
    /// Reasons part or all of the tree was not swept (unreadable folders, bad input)
    pub walk_errors: Vec<String>,
}

impl SweepReport {
    /// True when any deletion failed or part of the tree was unreadable
    pub fn has_failures(&self) -> bool {
        self.failed > 0 || !self.walk_errors.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SweepOutcome> {
        self.outcomes.iter().filter(|o| !o.is_deleted())
    }
}

/// Delete every file under `root` whose name ends with `suffix`.
///
/// Always runs to completion: per-file failures are recorded in the
/// report and never abort the sweep. `suffix` must not be empty; an empty
/// suffix deletes nothing and is reported as an error in `walk_errors`.
pub fn sweep(root: &Path, suffix: &str) -> SweepReport {
    sweep_with(root, suffix, |_| {})
}

/// Same as [`sweep`], calling `on_outcome` as soon as each file is handled
pub fn sweep_with<F>(root: &Path, suffix: &str, mut on_outcome: F) -> SweepReport
where
    F: FnMut(&SweepOutcome),
{
    let started_at = Utc::now();
    let start = Instant::now();

    let mut report = SweepReport {
        root: root.to_path_buf(),
        suffix: suffix.to_string(),
        started_at,
        duration_secs: 0.0,
        deleted: 0,
        failed: 0,
        outcomes: Vec::new(),
        walk_errors: Vec::new(),
    };

    if suffix.is_empty() {
        tracing::warn!(root = %root.display(), "Refusing to sweep with an empty suffix");
        report
            .walk_errors
            .push("Empty suffix would match every file; nothing swept".to_string());
        report.duration_secs = start.elapsed().as_secs_f64();
        return report;
    }

    if !root.is_dir() {
        tracing::warn!(root = %root.display(), "Sweep root is not a readable directory");
        report
            .walk_errors
            .push(format!("Not a directory: {}", root.display()));
        report.duration_secs = start.elapsed().as_secs_f64();
        return report;
    }

    tracing::debug!(root = %root.display(), suffix, "Starting sweep");

    let walked = walker::find_candidates(root, suffix);
    report.walk_errors = walked.errors;

    for candidate in walked.candidates {
        let status = match std::fs::remove_file(&candidate.path) {
            Ok(()) => {
                tracing::info!(path = %candidate.path.display(), "Deleted");
                report.deleted += 1;
                SweepStatus::Deleted
            }
            Err(e) => {
                tracing::warn!(path = %candidate.path.display(), error = %e, "Failed to delete");
                report.failed += 1;
                SweepStatus::Failed {
                    cause: e.to_string(),
                }
            }
        };

        let outcome = SweepOutcome {
            path: candidate.path,
            status,
        };
        on_outcome(&outcome);
        report.outcomes.push(outcome);
    }

    report.duration_secs = start.elapsed().as_secs_f64();

    tracing::debug!(
        deleted = report.deleted,
        failed = report.failed,
        walk_errors = report.walk_errors.len(),
        "Sweep finished"
    );

    report
}
