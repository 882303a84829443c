//! Collection of raw trace lines.
//!
//! Lines come either from running `trace-cmd report` on a recorded data file
//! or from an already rendered text report.

pub mod trace_cmd;

pub use trace_cmd::{read_lines, read_text_lines, TraceCmd};
