//! Event stream assembly.
//!
//! Turns raw text lines into one chronologically ordered event sequence.
//! Bad lines and bad payloads are reported to the diagnostic sink and never
//! abort the stream.

use super::event::RawEvent;
use super::line::match_line;
use super::payload::{decode_payload, Tracepoint};
use crate::utils::diagnostics::{Diagnostic, DiagnosticSink};
use log::debug;

/// Parse a single trace line into an event
///
/// **Public** - building block for [`assemble_events`]
///
/// # Arguments
/// * `line_no` - 1-based line number, used in diagnostics
/// * `line` - raw line text
/// * `sink` - receives unparseable-line and undecodable-payload reports
///
/// # Returns
/// `None` if the line matches no layout. An event whose payload failed to
/// decode is still returned, with `payload: None`.
pub fn parse_event(line_no: usize, line: &str, sink: &mut dyn DiagnosticSink) -> Option<RawEvent> {
    let matched = match match_line(line) {
        Ok(m) => m,
        Err(_) => {
            sink.report(Diagnostic::UnparseableLine {
                line_no,
                line: line.trim_end().to_string(),
            });
            return None;
        }
    };

    // Infallible
    let tracepoint: Tracepoint = matched.tracepoint.parse().unwrap_or_else(|e| match e {});

    let payload = match decode_payload(&tracepoint, matched.payload) {
        Ok(payload) => payload,
        Err(e) => {
            sink.report(Diagnostic::UndecodablePayload {
                line_no,
                tracepoint: tracepoint.to_string(),
                payload: matched.payload.to_string(),
                reason: e.to_string(),
            });
            None
        }
    };

    Some(RawEvent {
        comm: matched.comm.to_string(),
        pid: matched.pid,
        cpu: matched.cpu,
        timestamp: matched.timestamp,
        tracepoint,
        payload,
    })
}

/// Parse every line and order the result chronologically
///
/// **Public** - main entry point for the parsing stage
///
/// The sort is stable: events sharing a timestamp keep their input order.
pub fn assemble_events<I, S>(lines: I, sink: &mut dyn DiagnosticSink) -> Vec<RawEvent>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut events: Vec<RawEvent> = lines
        .into_iter()
        .enumerate()
        .filter_map(|(index, line)| parse_event(index + 1, line.as_ref(), sink))
        .collect();

    sort_chronologically(&mut events);

    debug!("Assembled {} events", events.len());

    events
}

/// Stable sort by ascending timestamp
pub fn sort_chronologically(events: &mut [RawEvent]) {
    events.sort_by(|a, b| a.timestamp.total_cmp(&b.timestamp));
}
