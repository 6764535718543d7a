//! Trace loader.
//!
//! Turns raw JSON from the trace endpoint (or a file saved from it) into a
//! forest of `TraceEvent`s. No integrity checks beyond shape: the
//! aggregator folds whatever values are present.

use super::schema::TraceEvent;
use crate::aggregator::fold::{fold_trace, TraversalOrder};
use crate::utils::config::TRACE_FIELD_NAMES;
use crate::utils::error::ParseError;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::de::{IoRead, Read, StrRead};
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Parse a trace from raw JSON
///
/// **Public** - main entry point for parsing
///
/// Accepted shapes:
/// - an array of root transactions
/// - a single root transaction object
/// - an object wrapping the roots under one of `TRACE_FIELD_NAMES`
///
/// The value is consumed, nested transactions are moved out of it rather
/// than cloned. Nesting depth is not limited.
///
/// # Errors
/// * `ParseError::JsonError` - a transaction is missing fields or has wrong types
/// * `ParseError::InvalidFormat` - the top-level value is none of the above
pub fn parse_trace(raw_trace: Value) -> Result<Vec<TraceEvent>, ParseError> {
    let roots = locate_roots(raw_trace)?;

    let trace = roots
        .into_iter()
        .map(|root| TraceEvent::deserialize(serde_stacker::Deserializer::new(root)))
        .collect::<Result<Vec<TraceEvent>, serde_json::Error>>()?;

    let (events, inverted) =
        fold_trace(&trace, TraversalOrder::PreOrder, (0usize, 0usize), |(n, bad), e| {
            (n + 1, bad + usize::from(e.start_timestamp > e.end_timestamp))
        });

    if inverted > 0 {
        warn!("{} transaction(s) end before they start; keeping them as-is", inverted);
    }

    debug!("Parsed trace: {} roots, {} transactions", trace.len(), events);

    Ok(trace)
}

/// Parse a trace from a JSON string
///
/// **Public** - same as `read_trace_file` for in-memory payloads
pub fn parse_trace_str(json: &str) -> Result<Vec<TraceEvent>, ParseError> {
    parse_trace(read_value(StrRead::new(json))?)
}

/// Find the array of root transactions inside the raw value
///
/// **Private** - internal helper for parse_trace
fn locate_roots(raw_trace: Value) -> Result<Vec<Value>, ParseError> {
    match raw_trace {
        Value::Array(items) => Ok(items),

        Value::Object(mut obj) => {
            for field in TRACE_FIELD_NAMES {
                if let Some(value) = obj.remove(*field) {
                    debug!("Found root transactions under '{}'", field);
                    return match value {
                        Value::Array(items) => Ok(items),
                        Value::Object(_) => Ok(vec![value]),
                        _ => Err(ParseError::InvalidFormat(format!(
                            "Field '{}' must be an array or object",
                            field
                        ))),
                    };
                }
            }

            // Bare transaction object
            if obj.contains_key("event_id") || obj.contains_key("eventId") {
                return Ok(vec![Value::Object(obj)]);
            }

            Err(ParseError::InvalidFormat(format!(
                "Object has no transaction fields; expected one of: {}",
                TRACE_FIELD_NAMES.join(", ")
            )))
        }

        _ => Err(ParseError::InvalidFormat(
            "Trace must be a JSON object or array".to_string(),
        )),
    }
}

/// Deserialize a JSON value without serde_json's recursion limit
///
/// **Private** - the stack grows on demand, so nesting is bounded by memory only
fn read_value<'de, R: Read<'de>>(read: R) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::new(read);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// Read and parse a trace file
///
/// **Public** - used by the CLI
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<TraceEvent>, ParseError> {
    let path = path.as_ref();

    debug!("Reading trace from: {}", path.display());

    let file = File::open(path)?;
    let raw = read_value(IoRead::new(BufReader::new(file)))?;

    parse_trace(raw)
}

/// Number of transactions in the forest, counting every node
pub fn count_events(trace: &[TraceEvent]) -> usize {
    fold_trace(trace, TraversalOrder::PreOrder, 0, |n, _| n + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_array_of_roots() {
        let raw = json!([
            {"project_id": 1, "event_id": "a", "start_timestamp": 1.0, "timestamp": 2.0},
            {"project_id": 2, "event_id": "b", "start_timestamp": 3.0, "timestamp": 4.0}
        ]);

        let trace = parse_trace(raw).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[1].project_id.as_str(), "2");
        assert_eq!(trace[1].end_timestamp, 4.0);
    }

    #[test]
    fn test_parse_wrapped_roots() {
        let raw = json!({
            "transactions": [
                {"project_id": 1, "event_id": "a", "start_timestamp": 1.0, "timestamp": 2.0}
            ]
        });

        let trace = parse_trace(raw).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(trace[0].generation, 0);
    }

    #[test]
    fn test_parse_rejects_scalar() {
        let result = parse_trace(json!(42));
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_rejects_unknown_object() {
        let result = parse_trace(json!({"foo": 1}));
        assert!(matches!(result, Err(ParseError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_missing_field() {
        let raw = json!([{"project_id": 1, "start_timestamp": 1.0, "timestamp": 2.0}]);
        assert!(matches!(parse_trace(raw), Err(ParseError::JsonError(_))));
    }

    #[test]
    fn test_count_events() {
        let trace = vec![TraceEvent::new("p", "a", 0.0, 1.0, 0).with_children(vec![
            TraceEvent::new("p", "b", 0.0, 1.0, 1),
            TraceEvent::new("p", "c", 0.0, 1.0, 1),
        ])];
        assert_eq!(count_events(&trace), 3);
        assert_eq!(count_events(&[]), 0);
    }

    #[test]
    fn test_parse_str_nesting_past_default_limit() {
        // 100 generations is 200 levels of JSON nesting
        let depth = 100;
        let mut json = String::new();
        for i in 0..depth {
            json.push_str(&format!(r#"{{"project_id": 1, "event_id": "e{}", "#, i));
            json.push_str(r#""start_timestamp": 0, "timestamp": 1, "children": ["#);
        }
        json.push_str(&"]}".repeat(depth));

        let trace = parse_trace_str(&json).unwrap();
        assert_eq!(trace.len(), 1);
        assert_eq!(count_events(&trace), depth);
    }

    #[test]
    fn test_parse_str_trailing_garbage() {
        let result = parse_trace_str("[] []");
        assert!(matches!(result, Err(ParseError::JsonError(_))));
    }
}
