//! Summarize command implementation.
//!
//! The summarize command:
//! 1. Loads the trace JSON
//! 2. Folds it into a summary
//! 3. Prints the summary and optionally writes a JSON report

use super::models::SummarizeArgs;
use crate::aggregator::{compute_trace_info_in_order, compute_trace_info_parallel, TraversalOrder};
use crate::output::{build_report, render_summary, report_to_string, write_report};
use crate::parser::{count_events, read_trace_file, TraceSummary};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Upper bound on `--workers`
const MAX_WORKERS: usize = 256;

/// Execute the summarize command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Trace file missing or malformed
/// * Report file cannot be written
pub fn execute_summarize(args: SummarizeArgs) -> Result<TraceSummary> {
    let start_time = Instant::now();

    info!("Summarizing trace: {}", args.input.display());

    // Step 1: Load trace
    info!("Step 1/3: Loading trace...");
    let trace = read_trace_file(&args.input)
        .with_context(|| format!("Failed to load trace from {}", args.input.display()))?;

    debug!("Loaded {} roots, {} transactions", trace.len(), count_events(&trace));

    // Step 2: Aggregate
    info!("Step 2/3: Aggregating ({}, {} worker(s))...", args.order, args.workers);
    let summary = if args.workers > 1 {
        if args.order != TraversalOrder::PreOrder {
            debug!("Traversal order is ignored for parallel aggregation");
        }
        compute_trace_info_parallel(&trace, args.workers)
    } else {
        compute_trace_info_in_order(&trace, args.order)
    };

    if summary.is_empty() {
        warn!("Trace contains no transactions");
    }

    // Step 3: Output
    info!("Step 3/3: Writing output...");
    let report = build_report(summary, Some(args.input.display().to_string()));

    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }

    if args.print_json {
        println!("{}", report_to_string(&report)?);
    } else {
        println!("\n{}", "=".repeat(60));
        println!("TRACE SUMMARY");
        println!("{}", "=".repeat(60));
        println!("{}", render_summary(&summary));
        println!("{}", "=".repeat(60));
    }

    info!("Summarize completed in {:.2}s", start_time.elapsed().as_secs_f64());

    Ok(summary)
}

/// Validate summarize arguments
///
/// **Public** - can be called before execute_summarize for early validation
pub fn validate_args(args: &SummarizeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    if !args.input.exists() {
        anyhow::bail!("Trace file not found: {}", args.input.display());
    }

    if args.workers == 0 {
        anyhow::bail!("workers must be greater than 0");
    }

    if args.workers > MAX_WORKERS {
        anyhow::bail!("workers is too large (max {})", MAX_WORKERS);
    }

    if let Some(output) = &args.output_json {
        if output == &args.input {
            anyhow::bail!("Output path must differ from the input trace");
        }
    }

    Ok(())
}
