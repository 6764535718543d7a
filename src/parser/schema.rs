//! Trace input model and report schema definitions.
//!
//! `TraceEvent` mirrors the per-transaction payload produced by the trace
//! query endpoint. `TraceSummary` and `TraceReport` are what we hand back
//! to callers and write to disk. The report schema is versioned to allow
//! future evolution.

use crate::utils::config::EMPTY_START_TIMESTAMP;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque identifier for a project or an event.
///
/// Upstream payloads use integers for project ids and hex strings for event
/// ids. Both are normalised to their string form so `1` and `"1"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "RawId")]
pub struct TraceId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Unsigned(u64),
    Signed(i64),
}

impl From<RawId> for TraceId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => TraceId(s),
            RawId::Unsigned(n) => TraceId(n.to_string()),
            RawId::Signed(n) => TraceId(n.to_string()),
        }
    }
}

impl Serialize for TraceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TraceId {
    fn from(s: &str) -> Self {
        TraceId(s.to_string())
    }
}

impl From<String> for TraceId {
    fn from(s: String) -> Self {
        TraceId(s)
    }
}

impl From<u64> for TraceId {
    fn from(n: u64) -> Self {
        TraceId(n.to_string())
    }
}

/// One transaction in a trace tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    /// Owning project
    #[serde(alias = "projectId")]
    pub project_id: TraceId,

    /// Unique event id of the transaction
    #[serde(alias = "eventId")]
    pub event_id: TraceId,

    #[serde(alias = "startTimestamp")]
    pub start_timestamp: f64,

    /// Upstream calls this plain `timestamp`
    #[serde(alias = "timestamp", alias = "endTimestamp")]
    pub end_timestamp: f64,

    /// Depth in the trace, root = 0. Orphans may carry `null`.
    #[serde(default, deserialize_with = "null_as_zero")]
    pub generation: u64,

    #[serde(default)]
    pub children: Vec<TraceEvent>,
}

fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

impl TraceEvent {
    /// Create a leaf event
    pub fn new(
        project_id: impl Into<TraceId>,
        event_id: impl Into<TraceId>,
        start_timestamp: f64,
        end_timestamp: f64,
        generation: u64,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            event_id: event_id.into(),
            start_timestamp,
            end_timestamp,
            generation,
            children: Vec::new(),
        }
    }

    /// Attach children, replacing any existing ones
    pub fn with_children(mut self, children: Vec<TraceEvent>) -> Self {
        self.children = children;
        self
    }
}

// Drops iteratively: derived drop glue would recurse once per generation.
impl Drop for TraceEvent {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// Summary statistics folded out of a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub total_projects: u64,
    pub relevant_projects: u64,
    pub total_transactions: u64,
    pub relevant_transactions: u64,

    /// Earliest start seen, or `EMPTY_START_TIMESTAMP` if nothing was visited
    pub start_timestamp: f64,

    /// Latest end seen, or 0 if nothing was visited
    pub end_timestamp: f64,

    pub max_generation: u64,
}

impl Default for TraceSummary {
    fn default() -> Self {
        Self {
            total_projects: 0,
            relevant_projects: 0,
            total_transactions: 0,
            relevant_transactions: 0,
            start_timestamp: EMPTY_START_TIMESTAMP,
            end_timestamp: 0.0,
            max_generation: 0,
        }
    }
}

impl TraceSummary {
    /// True when no transaction was folded in.
    ///
    /// Prefer this over comparing `start_timestamp` against the sentinel.
    pub fn is_empty(&self) -> bool {
        self.total_transactions == 0
    }

    /// `(start, end)` bounds, or `None` for an empty trace
    pub fn time_range(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            None
        } else {
            Some((self.start_timestamp, self.end_timestamp))
        }
    }

    /// Span of the trace in seconds, or `None` for an empty trace
    pub fn duration(&self) -> Option<f64> {
        self.time_range().map(|(start, end)| end - start)
    }
}

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Where the trace came from (usually the input file path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    pub summary: TraceSummary,

    /// Explicit emptiness flag so consumers never have to test the sentinel
    pub empty: bool,

    /// Timestamp when the report was generated
    pub generated_at: String,
}
