//! Reporting: display values for a scoring result and text output.

pub mod format;
pub mod present;

pub use format::{format_assessment, format_field_registry};
pub use present::{CategoryColor, DisplayModel, present};
