//! Plain text rendering of a trace summary for the terminal.

use crate::parser::schema::TraceSummary;
use chrono::{DateTime, SecondsFormat};

/// Render a summary as a short block of text
///
/// **Public** - used by the summarize command
///
/// An empty summary renders as a single "no trace data" line instead of
/// showing sentinel bounds.
pub fn render_summary(summary: &TraceSummary) -> String {
    let Some((start, end)) = summary.time_range() else {
        return "  No trace data".to_string();
    };

    let mut lines = Vec::new();

    lines.push(format!(
        "  {} {}, {} {}",
        summary.total_projects,
        plural(summary.total_projects, "project", "projects"),
        summary.total_transactions,
        plural(summary.total_transactions, "transaction", "transactions"),
    ));

    if summary.relevant_projects != summary.total_projects
        || summary.relevant_transactions != summary.total_transactions
    {
        lines.push(format!(
            "  Relevant: {} of {} projects, {} of {} transactions",
            summary.relevant_projects,
            summary.total_projects,
            summary.relevant_transactions,
            summary.total_transactions
        ));
    }

    lines.push(format!("  Start:    {}", format_timestamp(start)));
    lines.push(format!("  End:      {}", format_timestamp(end)));
    lines.push(format!("  Duration: {}", human_duration(end - start)));
    lines.push(format!("  Max generation: {}", summary.max_generation));

    lines.join("\n")
}

/// Format a duration in seconds as milliseconds with two decimals
///
/// Thousands are grouped: `1234.5678` -> `"1,234,567.80ms"`.
pub fn human_duration(seconds: f64) -> String {
    if !seconds.is_finite() {
        return format!("{}ms", seconds * 1000.0);
    }

    let millis = format!("{:.2}", seconds * 1000.0);
    let (sign, digits) = match millis.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", millis.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    format!("{}{}.{}ms", sign, group_thousands(whole), fraction)
}

/// Format a ratio as a percentage with three decimals (`0.5` -> `"50.000%"`)
pub fn to_percent(ratio: f64) -> String {
    format!("{:.3}%", ratio * 100.0)
}

/// RFC 3339 when the value is a plausible epoch timestamp, raw seconds otherwise
///
/// **Private** - internal helper for render_summary
fn format_timestamp(seconds: f64) -> String {
    let secs = seconds.floor();
    let nanos = ((seconds - secs) * 1e9).round().min(999_999_999.0) as u32;

    if secs.is_finite() && secs >= i64::MIN as f64 && secs <= i64::MAX as f64 {
        if let Some(dt) = DateTime::from_timestamp(secs as i64, nanos) {
            return dt.to_rfc3339_opts(SecondsFormat::Millis, true);
        }
    }

    format!("{}s", seconds)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn plural<'a>(n: u64, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!(human_duration(0.0), "0.00ms");
        assert_eq!(human_duration(0.0125), "12.50ms");
        assert_eq!(human_duration(1234.5678), "1,234,567.80ms");
        assert_eq!(human_duration(-1.5), "-1,500.00ms");
    }

    #[test]
    fn test_human_duration_non_finite() {
        assert_eq!(human_duration(f64::NAN), "NaNms");
        assert_eq!(human_duration(f64::INFINITY), "infms");
        assert_eq!(human_duration(f64::NEG_INFINITY), "-infms");
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(0.5), "50.000%");
        assert_eq!(to_percent(0.12345), "12.345%");
    }

    #[test]
    fn test_format_timestamp_epoch() {
        assert_eq!(format_timestamp(0.5), "1970-01-01T00:00:00.500Z");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_summary(&TraceSummary::default()), "  No trace data");
    }

    #[test]
    fn test_render_single() {
        let summary = TraceSummary {
            total_projects: 1,
            relevant_projects: 1,
            total_transactions: 2,
            relevant_transactions: 2,
            start_timestamp: 10.0,
            end_timestamp: 20.0,
            max_generation: 1,
        };

        let text = render_summary(&summary);
        assert!(text.contains("1 project, 2 transactions"));
        assert!(text.contains("Duration: 10,000.00ms"));
        assert!(text.contains("Max generation: 1"));
        assert!(!text.contains("Relevant"));
    }
}
