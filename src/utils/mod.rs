//! Utility modules for configuration, error handling, and diagnostics.

pub mod config;
pub mod diagnostics;
pub mod error;

// Re-export commonly used types for convenience
pub use diagnostics::{Diagnostic, DiagnosticCounts, DiagnosticSink, LogSink};
pub use error::{CollectError, DecodeError, EstimatorError, OutputError, ParseError};
