//! # SweepKit
//!
//! Two small filesystem chores for game projects, built on the same
//! traverse → act → report pattern:
//!
//! - **Sweep**: recursively delete every file whose name ends with a given
//!   suffix (e.g. leftover `.bmp` exports), reporting each outcome and
//!   carrying on past individual failures
//! - **Export**: copy a manifest of folders and files into a fresh staging
//!   directory, zip it into a single archive and remove the staging directory

pub mod cli;
pub mod common;
pub mod exporter;
pub mod sweeper;

pub use common::config::{ExportConfig, SweepConfig};
pub use common::errors::ExportError;
pub use exporter::{export, BundleManifest, ExportReport};
pub use sweeper::{sweep, sweep_with, SweepOutcome, SweepReport, SweepStatus};
