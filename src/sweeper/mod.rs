pub mod engine;
pub mod walker;

pub use engine::{sweep, sweep_with, SweepOutcome, SweepReport, SweepStatus};
