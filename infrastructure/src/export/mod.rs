//! Run artifact exporters

mod sprint_export;

pub use sprint_export::{ExportError, SprintExporter};
