pub mod archive;
pub mod engine;
pub mod manifest;
pub mod staging;

pub use engine::{export, ExportReport};
pub use manifest::BundleManifest;
