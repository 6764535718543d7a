//! Trace Info CLI
//!
//! Summarizes distributed traces: projects and transactions involved,
//! time bounds and deepest generation.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use std::path::PathBuf;

use trace_info::aggregator::TraversalOrder;
use trace_info::commands::{
    display_schema, display_version, execute_summarize, validate_args, validate_report_file,
    SummarizeArgs,
};

/// Trace Info - summary statistics for distributed traces
#[derive(Parser, Debug)]
#[command(name = "trace-info")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Traversal order accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Pre,
    Post,
    Breadth,
}

impl From<OrderArg> for TraversalOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Pre => TraversalOrder::PreOrder,
            OrderArg::Post => TraversalOrder::PostOrder,
            OrderArg::Breadth => TraversalOrder::BreadthFirst,
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a trace JSON file
    Summarize {
        /// Path to trace JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Output path for the JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Traversal order
        #[arg(long, value_enum, default_value = "pre")]
        order: OrderArg,

        /// Worker threads for large traces
        #[arg(short, long, default_value = "1", env = "TRACE_INFO_WORKERS")]
        workers: usize,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Summarize {
            file,
            output,
            order,
            workers,
            json,
        } => {
            let args = SummarizeArgs {
                input: file,
                output_json: output,
                order: order.into(),
                workers,
                print_json: json,
            };

            validate_args(&args)?;
            execute_summarize(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
