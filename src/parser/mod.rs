//! Trace parsing and schema definitions.
//!
//! This module handles:
//! - Parsing raw trace JSON into a `TraceEvent` forest
//! - Normalising upstream field names and id types
//! - Defining the summary and report schema

pub mod schema;
pub mod trace;

// Re-export main types
pub use schema::{TraceEvent, TraceId, TraceReport, TraceSummary};
pub use trace::{count_events, parse_trace, parse_trace_str, read_trace_file};
