use anyhow::Result;
use std::path::PathBuf;
use crate::output::{read_report, render_summary};
use crate::utils::config::SCHEMA_VERSION;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)?;

    if report.version != SCHEMA_VERSION {
        anyhow::bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    if report.empty != report.summary.is_empty() {
        anyhow::bail!("Report 'empty' flag disagrees with its summary");
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    if let Some(source) = &report.source {
        println!("  Source: {}", source);
    }
    println!("  Generated: {}", report.generated_at);
    println!("{}", render_summary(&report.summary));

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Trace Info Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string              - Schema version (e.g., '1.0.0')");
        println!("  source: string?              - Trace the report was built from");
        println!("  summary: object              - Trace statistics");
        println!("    total_projects: number     - Distinct projects in the trace");
        println!("    relevant_projects: number  - Distinct projects matching the filter");
        println!("    total_transactions: number - Distinct transactions in the trace");
        println!("    relevant_transactions: number - Distinct transactions matching the filter");
        println!("    start_timestamp: number    - Earliest start (sentinel if empty)");
        println!("    end_timestamp: number      - Latest end (0 if empty)");
        println!("    max_generation: number     - Deepest generation, root = 0");
        println!("  empty: boolean               - True when the trace had no transactions");
        println!("  generated_at: string         - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Trace Info v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Summary statistics for distributed traces.");
}
