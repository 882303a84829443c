//! Matching of raw trace lines against the supported layouts.
//!
//! Two layouts are recognized:
//! - live `trace-cmd report` output:
//!   `<comm>-<pid> [<cpu>] <sec>.<frac>: <tracepoint>: <payload>`
//! - ftrace dump output:
//!   `<comm>-<pid> <cpu> <usec>us : <tracepoint>: <payload>`

use super::timestamp::normalize_timestamp;
use crate::utils::error::ParseError;
use regex::{Captures, Regex};
use std::str::FromStr;
use std::sync::LazyLock;

static LIVE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<comm>.*)-(?P<pid>[0-9]+)\s+\[(?P<cpu>[0-9]+)\]\s+(?P<timestamp>[0-9.]+): (?P<tracepoint>[a-z_0-9]+): (?P<payload>.*)$",
    )
    .unwrap()
});

static DUMP_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*(?P<comm>.*)-(?P<pid>[0-9]+)\s+(?P<cpu>[0-9]+)\s+(?P<timestamp>[0-9]+us) : (?P<tracepoint>[a-z_0-9]+): (?P<payload>.*)$",
    )
    .unwrap()
});

/// Which layout a line matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLayout {
    Live,
    Dump,
}

/// Common fields of a matched line, borrowed from the input
#[derive(Debug, Clone, PartialEq)]
pub struct LineMatch<'a> {
    pub layout: LineLayout,
    pub comm: &'a str,
    pub pid: u64,
    pub cpu: u32,
    /// Seconds
    pub timestamp: f64,
    pub tracepoint: &'a str,
    /// Whitespace-trimmed payload text
    pub payload: &'a str,
}

/// Match a line against the live layout, then the dump layout
///
/// **Public** - first stage of event parsing
///
/// # Errors
/// * `ParseError::UnknownLayout` - neither layout matches
/// * `ParseError::InvalidTimestamp` / `ParseError::InvalidInteger` - a layout
///   matched but a numeric field is malformed
pub fn match_line(line: &str) -> Result<LineMatch<'_>, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);

    if let Some(caps) = LIVE_LINE_REGEX.captures(line) {
        return extract(LineLayout::Live, &caps);
    }
    if let Some(caps) = DUMP_LINE_REGEX.captures(line) {
        return extract(LineLayout::Dump, &caps);
    }

    Err(ParseError::UnknownLayout)
}

fn extract<'a>(layout: LineLayout, caps: &Captures<'a>) -> Result<LineMatch<'a>, ParseError> {
    Ok(LineMatch {
        layout,
        comm: field(caps, "comm"),
        pid: parse_integer("pid", field(caps, "pid"))?,
        cpu: parse_integer("cpu", field(caps, "cpu"))?,
        timestamp: normalize_timestamp(field(caps, "timestamp"))?,
        tracepoint: field(caps, "tracepoint"),
        payload: field(caps, "payload").trim(),
    })
}

fn field<'a>(caps: &Captures<'a>, name: &str) -> &'a str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn parse_integer<T: FromStr>(field: &'static str, value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidInteger {
        field,
        value: value.to_string(),
    })
}
