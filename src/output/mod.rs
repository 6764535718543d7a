//! Output writers for trace summaries.
//!
//! This module handles:
//! - JSON reports (written to disk or rendered to a string)
//! - Text summaries for the terminal

pub mod json;
pub mod text;

// Re-export main functions
pub use json::{build_report, read_report, report_to_string, write_report};
pub use text::{human_duration, render_summary, to_percent};
