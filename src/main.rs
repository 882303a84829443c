//! idlat CLI
//!
//! Estimates, per CPU idle episode, the latency between the event that
//! should have woken the CPU and the moment it actually left idle.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use idlat::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs, TraceInput,
};
use idlat::utils::config::{DEFAULT_TRACE_CMD, DEFAULT_TRACE_FILE, TRACE_CMD_ENV};

/// idlat - idle exit latency from kernel traces
#[derive(Parser, Debug)]
#[command(name = "idlat")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a trace and report idle episodes
    Analyze {
        /// trace-cmd data file to render with `trace-cmd report`
        #[arg(short, long, default_value = DEFAULT_TRACE_FILE, conflicts_with = "text")]
        input: PathBuf,

        /// Already rendered report text ("-" for stdin)
        #[arg(short, long)]
        text: Option<PathBuf>,

        /// trace-cmd executable
        #[arg(long, env = TRACE_CMD_ENV, default_value = DEFAULT_TRACE_CMD)]
        trace_cmd: PathBuf,

        /// Output path for JSON report (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output path for CSV episode table (optional)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
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
        Commands::Analyze {
            input,
            text,
            trace_cmd,
            output,
            csv,
            summary,
        } => {
            let input = match text {
                Some(path) => TraceInput::Text(path),
                None => TraceInput::Data(input),
            };

            let args = AnalyzeArgs {
                input,
                trace_cmd,
                output_json: output,
                output_csv: csv,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_analyze(&args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(&file)?;
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
