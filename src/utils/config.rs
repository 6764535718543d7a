//! Configuration and constants for the library and CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Seed for `start_timestamp` before any event has been folded in.
///
/// This is the largest integer an `f64` represents exactly (2^53 - 1), so it
/// survives a JSON round trip unchanged.
pub const EMPTY_START_TIMESTAMP: f64 = 9_007_199_254_740_991.0;

/// Worker count used by the CLI when `--workers` is not given
pub const DEFAULT_WORKERS: usize = 1;

// Field names that may wrap the root transactions (different producers use different names)
pub const TRACE_FIELD_NAMES: &[&str] = &["transactions", "trace", "events", "data"];
