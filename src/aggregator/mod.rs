//! Aggregation of trace trees into summary statistics.
//!
//! This module provides:
//! - A generic fold over a trace forest (any traversal order)
//! - The trace-info summary: distinct projects and transactions,
//!   time bounds and deepest generation
//! - Partial accumulators that merge, for parallel aggregation

pub mod fold;
pub mod trace_info;

// Re-export main types and functions
pub use fold::{fold_trace, TraversalOrder, Walk};
pub use trace_info::{
    compute_trace_info, compute_trace_info_in_order, compute_trace_info_parallel,
    compute_trace_info_with, TraceInfoAccumulator,
};
