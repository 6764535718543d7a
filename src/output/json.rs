//! JSON report output writer.
//!
//! Writes `TraceReport`s to JSON files with proper formatting.

use crate::parser::schema::{TraceReport, TraceSummary};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use chrono::{SecondsFormat, Utc};
use log::{debug, info};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Wrap a summary into a versioned report stamped with the current time
///
/// **Public** - used by the summarize command
pub fn build_report(summary: TraceSummary, source: Option<String>) -> TraceReport {
    TraceReport {
        version: SCHEMA_VERSION.to_string(),
        source,
        empty: summary.is_empty(),
        summary,
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Write a report to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `report` - Report data to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// let report = build_report(compute_trace_info(&trace), None);
/// write_report(&report, "summary.json")?;
/// ```
pub fn write_report(
    report: &TraceReport,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing report to: {}", output_path.display());

    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)?;

    // BufWriter swallows errors on drop
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Report written successfully ({} bytes)", calculate_file_size(output_path));

    Ok(())
}

/// Serialize a report to a pretty JSON string
///
/// **Public** - used for `--json` output and tests
pub fn report_to_string(report: &TraceReport) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Refuse to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a report from a JSON file
///
/// **Public** - used by the validate command and tests
///
/// # Errors
/// * `OutputError::ReadFailed` - File read error
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_report(input_path: impl AsRef<Path>) -> Result<TraceReport, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading report from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::ReadFailed)?;
    let report: TraceReport = serde_json::from_reader(BufReader::new(file))?;

    debug!("Report loaded: version {}, generated at {}", report.version, report.generated_at);

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_test_report() -> TraceReport {
        let summary = TraceSummary {
            total_projects: 2,
            relevant_projects: 2,
            total_transactions: 5,
            relevant_transactions: 5,
            start_timestamp: 1_600_000_000.25,
            end_timestamp: 1_600_000_003.5,
            max_generation: 3,
        };
        TraceReport {
            version: "1.0.0".to_string(),
            source: Some("trace.json".to_string()),
            summary,
            empty: false,
            generated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_write_and_read_report() {
        let report = create_test_report();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path();

        write_report(&report, path).unwrap();
        let loaded = read_report(path).unwrap();

        assert_eq!(loaded, report);
    }

    #[test]
    fn test_build_report_marks_empty() {
        let report = build_report(TraceSummary::default(), None);
        assert!(report.empty);
        assert_eq!(report.version, SCHEMA_VERSION);
        assert!(report.generated_at.ends_with('Z'));
    }

    #[test]
    fn test_report_to_string_skips_missing_source() {
        let mut report = create_test_report();
        report.source = None;
        let json = report_to_string(&report).unwrap();
        assert!(!json.contains("source"));
        assert!(json.contains("\"max_generation\": 3"));
    }

    #[test]
    fn test_validate_output_path_empty() {
        let result = validate_output_path(Path::new(""));
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_output_path_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = validate_output_path(temp_dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/summary.json");

        write_report(&create_test_report(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_to_full_device_fails() {
        let result = write_report(&create_test_report(), "/dev/full");
        assert!(matches!(result, Err(OutputError::WriteFailed(_))));
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_report("/definitely/not/here.json");
        assert!(matches!(result, Err(OutputError::ReadFailed(_))));
    }
}
