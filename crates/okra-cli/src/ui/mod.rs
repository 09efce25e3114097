//! Terminal output helpers for the okra CLI.

mod color;
mod format;

pub use color::ColorMode;
pub use format::{confidence_badge, priority_label, section, sources_table};
