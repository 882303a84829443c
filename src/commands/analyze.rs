//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Collects trace lines (trace-cmd or text)
//! 2. Parses and orders events
//! 3. Runs the idle/wake estimator
//! 4. Writes output files

use super::models::{AnalyzeArgs, TraceInput};
use crate::collect::{read_text_lines, TraceCmd};
use crate::estimator::{estimate_idle_latency, generate_text_summary};
use crate::output::{write_episodes_csv, write_report, LatencyReport};
use crate::parser::assemble_events;
use crate::utils::diagnostics::LogSink;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The report that was (optionally) written
///
/// # Errors
/// * trace-cmd or input file failures
/// * output invariant violations (logic defects)
/// * file write errors
pub fn execute_analyze(args: &AnalyzeArgs) -> Result<LatencyReport> {
    let start_time = Instant::now();

    info!("Starting idle latency analysis of {}", args.input);

    info!("Step 1/4: Collecting trace lines...");
    let lines = collect_lines(args).context("Failed to collect trace lines")?;
    debug!("Collected {} lines", lines.len());

    let report = analyze_lines(args.input.to_string(), &lines)?;

    info!("Step 4/4: Writing output files...");
    if let Some(path) = &args.output_json {
        write_report(&report, path).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", path.display());
    }
    if let Some(path) = &args.output_csv {
        write_episodes_csv(&report.episodes, path).context("Failed to write episode CSV")?;
        info!("✓ Episodes written to: {}", path.display());
    }

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("IDLE LATENCY SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Source:      {}", report.source);
        println!("Diagnostics: {}", report.diagnostics.summary());
        println!("\n{}", generate_text_summary(&report.episodes));
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

/// Parse, order and estimate over already collected lines
///
/// **Public** - the collection-independent part of the command
pub fn analyze_lines<S: AsRef<str>>(source: impl Into<String>, lines: &[S]) -> Result<LatencyReport> {
    let mut sink = LogSink::new();

    info!("Step 2/4: Parsing {} lines...", lines.len());
    let events = assemble_events(lines, &mut sink);

    info!("Step 3/4: Estimating idle latency over {} events...", events.len());
    let episodes = estimate_idle_latency(&events, &mut sink).context("Idle latency estimation failed")?;

    let counts = sink.counts();
    info!("{} idle episodes | {}", episodes.len(), counts.summary());

    let report = LatencyReport::new(source, episodes, counts);
    for stats in &report.by_state {
        debug!("state {}", stats.summary());
    }

    Ok(report)
}

/// Validate analyze arguments
///
/// **Public** - called before `execute_analyze`
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    match &args.input {
        input if input.is_stdin() => {}
        TraceInput::Data(path) | TraceInput::Text(path) => {
            if !path.exists() {
                bail!("Trace input not found: {}", path.display());
            }
        }
    }

    if args.output_json.is_some() && args.output_json == args.output_csv {
        bail!("JSON and CSV outputs must be different files");
    }

    Ok(())
}

fn collect_lines(args: &AnalyzeArgs) -> Result<Vec<String>> {
    let lines = match &args.input {
        TraceInput::Data(path) => TraceCmd::new(&args.trace_cmd).report_lines(path)?,
        TraceInput::Text(path) => read_text_lines(path)?,
    };
    Ok(lines)
}
