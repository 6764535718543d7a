//! Fold a trace into its `TraceSummary`.
//!
//! The accumulator carries the de-duplication sets next to the running
//! summary. Every update is either set-gated or a min/max, so the result
//! does not depend on visiting order, and two accumulators built over
//! disjoint parts of a trace can be merged.

use super::fold::{fold_trace, TraversalOrder};
use crate::parser::schema::{TraceEvent, TraceId, TraceSummary};
use log::{debug, warn};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::collections::HashSet;

/// Running state for one aggregation
#[derive(Debug, Clone, Default)]
pub struct TraceInfoAccumulator {
    seen_projects: HashSet<TraceId>,
    relevant_projects: HashSet<TraceId>,
    seen_events: HashSet<TraceId>,
    relevant_events: HashSet<TraceId>,
    summary: TraceSummary,
}

impl TraceInfoAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one transaction in
    ///
    /// `relevant` is the caller's verdict on this event. Relevant projects
    /// are projects with at least one relevant transaction; an event id is
    /// relevant if any visit of it was.
    pub fn visit(&mut self, event: &TraceEvent, relevant: bool) {
        if self.seen_projects.insert(event.project_id.clone()) {
            self.summary.total_projects += 1;
        }
        if relevant && self.relevant_projects.insert(event.project_id.clone()) {
            self.summary.relevant_projects += 1;
        }

        if self.seen_events.insert(event.event_id.clone()) {
            self.summary.total_transactions += 1;
        }
        if relevant && self.relevant_events.insert(event.event_id.clone()) {
            self.summary.relevant_transactions += 1;
        }

        if self.summary.start_timestamp > event.start_timestamp {
            self.summary.start_timestamp = event.start_timestamp;
        }
        if self.summary.end_timestamp < event.end_timestamp {
            self.summary.end_timestamp = event.end_timestamp;
        }
        if self.summary.max_generation < event.generation {
            self.summary.max_generation = event.generation;
        }
    }

    /// Combine two partial aggregations
    ///
    /// Counts come from the unioned sets, so ids seen on both sides are
    /// counted once.
    pub fn merge(mut self, other: TraceInfoAccumulator) -> Self {
        self.seen_projects.extend(other.seen_projects);
        self.relevant_projects.extend(other.relevant_projects);
        self.seen_events.extend(other.seen_events);
        self.relevant_events.extend(other.relevant_events);

        self.summary.total_projects = self.seen_projects.len() as u64;
        self.summary.relevant_projects = self.relevant_projects.len() as u64;
        self.summary.total_transactions = self.seen_events.len() as u64;
        self.summary.relevant_transactions = self.relevant_events.len() as u64;
        self.summary.start_timestamp =
            self.summary.start_timestamp.min(other.summary.start_timestamp);
        self.summary.end_timestamp = self.summary.end_timestamp.max(other.summary.end_timestamp);
        self.summary.max_generation =
            self.summary.max_generation.max(other.summary.max_generation);
        self
    }

    /// Summary so far
    pub fn summary(&self) -> TraceSummary {
        self.summary
    }

    pub fn finish(self) -> TraceSummary {
        self.summary
    }
}

/// Summarise a trace
///
/// **Public** - main entry point for trace aggregation
///
/// Every transaction is relevant. An empty trace yields
/// `TraceSummary::default()`, check `is_empty()` before using the bounds.
pub fn compute_trace_info(trace: &[TraceEvent]) -> TraceSummary {
    compute_trace_info_in_order(trace, TraversalOrder::default())
}

/// Summarise a trace walking it in the given order
///
/// The result is the same for every order.
pub fn compute_trace_info_in_order(trace: &[TraceEvent], order: TraversalOrder) -> TraceSummary {
    compute_trace_info_with(trace, order, |_| true)
}

/// Summarise a trace, counting only transactions accepted by `is_relevant`
/// towards the `relevant_*` fields
///
/// **Public** - relevance hook; totals are unaffected by the predicate
pub fn compute_trace_info_with<P>(
    trace: &[TraceEvent],
    order: TraversalOrder,
    is_relevant: P,
) -> TraceSummary
where
    P: Fn(&TraceEvent) -> bool,
{
    let summary = accumulate(trace, order, &is_relevant).finish();

    debug!(
        "Trace info ({}): {} projects, {} transactions, max generation {}",
        order, summary.total_projects, summary.total_transactions, summary.max_generation
    );

    summary
}

/// Summarise a trace with up to `workers` threads
///
/// **Public** - for very large traces
///
/// Roots are split into contiguous chunks, each chunk is folded into its own
/// accumulator on a rayon pool sized to `workers`, and the partial
/// accumulators are reduced with `merge`. Same result as `compute_trace_info`.
pub fn compute_trace_info_parallel(trace: &[TraceEvent], workers: usize) -> TraceSummary {
    let workers = workers.max(1);

    if workers == 1 || trace.len() < 2 {
        return compute_trace_info(trace);
    }

    let pool = match ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            warn!("Failed to build a {}-thread pool ({}); aggregating sequentially", workers, e);
            return compute_trace_info(trace);
        }
    };

    let chunk_size = trace.len().div_ceil(workers);
    debug!(
        "Aggregating {} roots on {} workers (chunk size {})",
        trace.len(),
        workers,
        chunk_size
    );

    let always = |_: &TraceEvent| true;
    pool.install(|| {
        trace
            .par_chunks(chunk_size)
            .map(|chunk| accumulate(chunk, TraversalOrder::PreOrder, &always))
            .reduce(TraceInfoAccumulator::new, TraceInfoAccumulator::merge)
    })
    .finish()
}

/// Run the visitor over a forest
///
/// **Private** - shared by the sequential and parallel entry points
fn accumulate<P>(
    trace: &[TraceEvent],
    order: TraversalOrder,
    is_relevant: &P,
) -> TraceInfoAccumulator
where
    P: Fn(&TraceEvent) -> bool,
{
    fold_trace(trace, order, TraceInfoAccumulator::new(), |mut acc, event| {
        acc.visit(event, is_relevant(event));
        acc
    })
}
