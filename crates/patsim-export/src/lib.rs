//! patsim-export
//!
//! Renders evaluation reports to Markdown for download or display.

pub mod error;
pub mod render;
