//! Trace line parsing.
//!
//! This module handles:
//! - Normalizing the different timestamp encodings
//! - Matching lines against the live and dump layouts
//! - Decoding per-tracepoint payloads
//! - Assembling a chronologically ordered event stream

pub mod event;
pub mod line;
pub mod payload;
pub mod stream;
pub mod timestamp;

// Re-export main types
pub use event::{CpuMask, RawEvent};
pub use line::{match_line, LineLayout, LineMatch};
pub use payload::{decode_payload, IdleStatePayload, Payload, Tracepoint};
pub use stream::{assemble_events, parse_event, sort_chronologically};
pub use timestamp::normalize_timestamp;
