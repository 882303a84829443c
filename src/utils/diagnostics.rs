//! Diagnostic reporting for non-fatal trace problems.
//!
//! The parser and the state machine never log directly. They report into a
//! [`DiagnosticSink`] handed to them by the caller, which decides whether to
//! collect, count, or forward to the `log` facade.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A non-fatal observation made while processing a trace
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("unmatched line {line_no}: {line:?}")]
    UnparseableLine { line_no: usize, line: String },

    #[error("line {line_no}: failed to decode {tracepoint} payload {payload:?} ({reason})")]
    UndecodablePayload {
        line_no: usize,
        tracepoint: String,
        payload: String,
        reason: String,
    },

    #[error("cpu {cpu}: idle episode entered at {enter_ts:.6} overwritten at {ts:.6}")]
    EpisodeOverwritten { cpu: u32, enter_ts: f64, ts: f64 },

    #[error("cpu {cpu}: idle entry failed at {ts:.6}, episode discarded")]
    EpisodeAborted { cpu: u32, ts: f64 },

    #[error("cpu {cpu}: idle episode entered at {enter_ts:.6} still open at end of trace")]
    OpenAtEndOfStream { cpu: u32, enter_ts: f64 },
}

/// Destination for diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Per-kind diagnostic tally, carried into the written report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticCounts {
    pub unparseable_lines: u64,
    pub undecodable_payloads: u64,
    pub overwritten_episodes: u64,
    pub aborted_episodes: u64,
    pub open_at_end: u64,
}

impl DiagnosticCounts {
    pub fn record(&mut self, diagnostic: &Diagnostic) {
        let counter = match diagnostic {
            Diagnostic::UnparseableLine { .. } => &mut self.unparseable_lines,
            Diagnostic::UndecodablePayload { .. } => &mut self.undecodable_payloads,
            Diagnostic::EpisodeOverwritten { .. } => &mut self.overwritten_episodes,
            Diagnostic::EpisodeAborted { .. } => &mut self.aborted_episodes,
            Diagnostic::OpenAtEndOfStream { .. } => &mut self.open_at_end,
        };
        *counter += 1;
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "Unmatched lines: {} | Bad payloads: {} | Overwritten: {} | Aborted: {} | Open at end: {}",
            self.unparseable_lines,
            self.undecodable_payloads,
            self.overwritten_episodes,
            self.aborted_episodes,
            self.open_at_end
        )
    }
}

/// Sink forwarding to the `log` facade while counting each kind
#[derive(Debug, Default)]
pub struct LogSink {
    counts: DiagnosticCounts,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> DiagnosticCounts {
        self.counts
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.counts.record(&diagnostic);
        match diagnostic {
            Diagnostic::UnparseableLine { .. } | Diagnostic::UndecodablePayload { .. } => {
                log::warn!("{}", diagnostic)
            }
            _ => log::debug!("{}", diagnostic),
        }
    }
}
