use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{bail, Result};
use std::path::Path;

/// Validate a report JSON file
pub fn validate_report_file(file_path: &Path) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(file_path)?;

    if report.version != SCHEMA_VERSION {
        bail!(
            "Unsupported report version {} (expected {})",
            report.version,
            SCHEMA_VERSION
        );
    }

    let incomplete = report
        .episodes
        .iter()
        .filter(|e| e.wake_ts.is_none() || e.exit_ts.is_none())
        .count();

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Generated: {}", report.generated_at);
    println!("  Episodes: {}", report.episodes.len());
    println!("  Episodes missing wake or exit: {}", incomplete);
    println!("  Idle states: {}", report.by_state.len());
    println!("  Diagnostics: {}", report.diagnostics.summary());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("idlat Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Trace file or 'stdin'");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  diagnostics: object        - Counts of skipped lines and dropped episodes");
        println!("  by_state: array            - Latency statistics per idle state");
        println!("  episodes: array            - Completed idle episodes");
        println!("    cpu: integer             - CPU id");
        println!("    state: integer           - Idle state entered");
        println!("    state_attempt: integer   - Idle state requested");
        println!("    wake_src: string         - Wake source label (may be empty)");
        println!("    enter_ts: number         - Idle entry, seconds");
        println!("    wake_ts: number?         - Earliest wake event, seconds");
        println!("    exit_ts: number?         - Idle exit, seconds");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("idlat v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Idle exit latency estimation from kernel trace logs.");
}
