use crate::utils::config::{DEFAULT_TRACE_CMD, DEFAULT_TRACE_FILE};
use std::fmt;
use std::path::PathBuf;

/// Where trace lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceInput {
    /// Binary trace data rendered through `trace-cmd report`
    Data(PathBuf),
    /// Already rendered report text; `-` is stdin
    Text(PathBuf),
}

impl TraceInput {
    pub fn is_stdin(&self) -> bool {
        matches!(self, Self::Text(path) if path.as_os_str() == "-")
    }
}

impl fmt::Display for TraceInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            _ if self.is_stdin() => f.write_str("stdin"),
            Self::Data(path) | Self::Text(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Trace to analyze
    pub input: TraceInput,

    /// trace-cmd executable used for `TraceInput::Data`
    pub trace_cmd: PathBuf,

    /// Output path for the JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for the CSV episode table (optional)
    pub output_csv: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: TraceInput::Data(PathBuf::from(DEFAULT_TRACE_FILE)),
            trace_cmd: PathBuf::from(DEFAULT_TRACE_CMD),
            output_json: None,
            output_csv: None,
            print_summary: false,
        }
    }
}
