use colored::*;
use std::path::Path;

use crate::common::format::{self, format_count, format_size};
use crate::exporter::ExportReport;
use crate::sweeper::{SweepOutcome, SweepReport, SweepStatus};

// ─── Sweep ────────────────────────────────────────────────────────────────────

/// Print one line per handled file, as it happens
pub fn print_sweep_outcome(outcome: &SweepOutcome) {
    match &outcome.status {
        SweepStatus::Deleted => println!("Deleted: {}", outcome.path.display()),
        SweepStatus::Failed { cause } => {
            println!("Error deleting {}: {}", outcome.path.display(), cause)
        }
    }
}

/// Print the final sweep summary in human-readable format
pub fn print_sweep_summary(report: &SweepReport) {
    println!("Deletion complete.");
    println!(
        "  {} deleted  •  {} failed  •  {}",
        format_count(report.deleted).green(),
        report.failed.to_string().red(),
        format::format_duration(report.duration_secs).cyan()
    );

    if !report.walk_errors.is_empty() {
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} parts of the tree were not swept:", report.walk_errors.len()).yellow()
        );
        for error in &report.walk_errors {
            println!("    {} {}", "→".dimmed(), error.dimmed());
        }
    }
}

/// Print the sweep report as JSON
pub fn print_sweep_json(report: &SweepReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize sweep report: {}", e),
    }
}

/// One line: deleted, failed, unreadable folders
pub fn print_sweep_quiet(report: &SweepReport) {
    println!(
        "{} {} {}",
        report.deleted,
        report.failed,
        report.walk_errors.len()
    );
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Print export results in human-readable format.
///
/// `archive_name` is the archive path as configured, before it was
/// resolved against the source root.
pub fn print_export_report(report: &ExportReport, archive_name: &Path) {
    format::print_header("Export");
    format::print_kv("Folders", &display_list(&report.copied_dirs));
    format::print_kv("Files", &display_list(&report.copied_files));
    if !report.skipped.is_empty() {
        format::print_kv("Not found", &report.skipped.join(", ").dimmed().to_string());
    }
    format::print_kv(
        "Archived",
        &format!(
            "{} ({})",
            format_count(report.entries.len()),
            format_size(report.bytes_archived)
        ),
    );
    format::print_kv("Took", &format::format_duration(report.duration_secs));
    println!();
    println!(
        "Export completed successfully. {} created.",
        archive_name.display()
    );
}

/// Print the export report as JSON
pub fn print_export_json(report: &ExportReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize export report: {}", e),
    }
}

/// Just the archive path
pub fn print_export_quiet(report: &ExportReport) {
    println!("{}", report.archive_path.display());
}

fn display_list(names: &[String]) -> String {
    if names.is_empty() {
        "none".dimmed().to_string()
    } else {
        names.join(", ")
    }
}
