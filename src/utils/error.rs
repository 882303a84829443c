//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while matching a raw trace line
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("line matches no known trace layout")]
    UnknownLayout,

    #[error("invalid timestamp token: {0}")]
    InvalidTimestamp(String),

    #[error("invalid integer field {field}: {value}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Errors that can occur while decoding a tracepoint payload
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("payload does not match the {tracepoint} grammar")]
    GrammarMismatch { tracepoint: String },

    #[error("{tracepoint}: invalid {field} value {value:?}")]
    InvalidField {
        tracepoint: String,
        field: &'static str,
        value: String,
    },
}

/// Errors raised by the idle/wake state machine.
///
/// These indicate a logic defect, never bad input, and abort the run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("output invariant violated on cpu {cpu}: {reason}")]
    InvariantViolation { cpu: u32, reason: String },
}

/// Errors that can occur while collecting trace lines
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("failed to run {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    ToolFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
