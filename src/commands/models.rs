use crate::aggregator::TraversalOrder;
use crate::utils::config::DEFAULT_WORKERS;
use std::path::PathBuf;

/// Arguments for the summarize command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct SummarizeArgs {
    /// Path to the trace JSON file
    pub input: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Traversal order for the fold
    pub order: TraversalOrder,

    /// Number of worker threads (1 = sequential)
    pub workers: usize,

    /// Print the report as JSON on stdout instead of text
    pub print_json: bool,
}

impl Default for SummarizeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::from("trace.json"),
            output_json: None,
            order: TraversalOrder::default(),
            workers: DEFAULT_WORKERS,
            print_json: false,
        }
    }
}
