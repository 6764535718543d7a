//! Trace Info
//!
//! Summary statistics for distributed traces: how many projects and
//! transactions a trace touches, when it starts and ends, and how deep
//! it goes.
//!
//! The core is a single pass over the trace tree (`aggregator`). Around it
//! sit a JSON loader for trace payloads (`parser`), report writers
//! (`output`) and the commands behind the `trace-info` CLI (`commands`).
//!
//! ```ignore
//! use trace_info::aggregator::compute_trace_info;
//! use trace_info::parser::read_trace_file;
//!
//! let trace = read_trace_file("trace.json")?;
//! let summary = compute_trace_info(&trace);
//! if let Some((start, end)) = summary.time_range() {
//!     println!("{} transactions over {}s", summary.total_transactions, end - start);
//! }
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
