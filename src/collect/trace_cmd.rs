//! Trace line producers: `trace-cmd report` and pre-rendered text.

use crate::utils::config::DEFAULT_TRACE_CMD;
use crate::utils::error::CollectError;
use log::{debug, info};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runner for the `trace-cmd` executable
#[derive(Debug, Clone)]
pub struct TraceCmd {
    program: PathBuf,
}

impl Default for TraceCmd {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_CMD)
    }
}

impl TraceCmd {
    /// Create a runner for the given executable name or path
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed for a report of `trace_file`
    ///
    /// `-t` asks for full-precision timestamps.
    pub fn report_args(trace_file: &Path) -> Vec<&std::ffi::OsStr> {
        vec!["report".as_ref(), "-t".as_ref(), trace_file.as_os_str()]
    }

    /// Render a trace data file and return its lines
    ///
    /// # Errors
    /// * `CollectError::SpawnFailed` - the executable could not be started
    /// * `CollectError::ToolFailed` - trace-cmd exited unsuccessfully
    pub fn report_lines(&self, trace_file: &Path) -> Result<Vec<String>, CollectError> {
        let program = self.program.display().to_string();

        info!("Running {} report on {}", program, trace_file.display());

        let output = Command::new(&self.program)
            .args(Self::report_args(trace_file))
            .output()
            .map_err(|source| CollectError::SpawnFailed {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CollectError::ToolFailed {
                program,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let lines = read_lines(output.stdout.as_slice())?;
        debug!("{} produced {} lines", program, lines.len());
        Ok(lines)
    }
}

/// Read pre-rendered report lines from a file, or stdin for `-`
///
/// # Errors
/// * `CollectError::IoError` - the file cannot be opened or read
pub fn read_text_lines(path: &Path) -> Result<Vec<String>, CollectError> {
    if path.as_os_str() == "-" {
        debug!("Reading trace text from stdin");
        return read_lines(std::io::stdin().lock());
    }

    debug!("Reading trace text from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_lines(file)
}

/// Split a byte stream into lines, replacing invalid UTF-8
pub fn read_lines(reader: impl Read) -> Result<Vec<String>, CollectError> {
    let mut reader = BufReader::new(reader);
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    while reader.read_until(b'\n', &mut buf)? > 0 {
        let line = String::from_utf8_lossy(&buf);
        lines.push(line.trim_end_matches(['\r', '\n']).to_string());
        buf.clear();
    }

    Ok(lines)
}
