//! Tracepoint kinds and their payload decoders.
//!
//! Each recognized tracepoint has a fixed textual grammar for the part of the
//! line after `<tracepoint>: `. Decoders are prefix matches, so trailing
//! fields added by newer kernels are tolerated.

use super::event::CpuMask;
use super::timestamp::nanos_to_seconds;
use crate::utils::config::{CLOCK_EVENT_HANDLE_PREFIX, CLOCK_EVENT_PREFIX, NO_IDLE_STATE, NO_IDLE_STATE_RAW};
use crate::utils::error::DecodeError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Example: "state=2 cpu_id=0" or "state=4294967295 cpu_id=3"
static CPU_IDLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^state=(-?[0-9]+) cpu_id=([0-9]+)").unwrap());

/// Example: "target_mask=00000000,00000005 (Function call interrupts)"
static IPI_RAISE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^target_mask=([0-9a-f,]+) \(([a-zA-Z ]+)\)").unwrap());

/// Example: "(Rescheduling interrupts)"
static IPI_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(([a-zA-Z ]+)\)").unwrap());

/// Example: "irq=27 name=arch_timer"
static IRQ_HANDLER_ENTRY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^irq=([0-9]+) name=(.*)").unwrap());

/// Example: "clock_event_device=0xffff0000bd0a1200 time=4321000123000"
static CLOCK_EVENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^clock_event_device=(0x[0-9a-f]+) time=([0-9]+)").unwrap()
});

/// Tracepoint kind of a trace line
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tracepoint {
    CpuIdle,
    CpuIdleExit,
    IpiRaise,
    IpiEnter,
    IpiExit,
    IrqHandlerEntry,
    IrqHandlerExit,
    /// Any `clock_event*` tracepoint; the full name is kept
    ClockEvent(String),
    /// Anything else, carried through unmodified
    Other(String),
}

impl std::str::FromStr for Tracepoint {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "cpu_idle" => Self::CpuIdle,
            "cpu_idle_exit" => Self::CpuIdleExit,
            "ipi_raise" => Self::IpiRaise,
            "ipi_enter" => Self::IpiEnter,
            "ipi_exit" => Self::IpiExit,
            "irq_handler_entry" => Self::IrqHandlerEntry,
            "irq_handler_exit" => Self::IrqHandlerExit,
            name if name.starts_with(CLOCK_EVENT_PREFIX) => Self::ClockEvent(name.to_string()),
            name => Self::Other(name.to_string()),
        })
    }
}

impl Tracepoint {
    pub fn name(&self) -> &str {
        match self {
            Self::CpuIdle => "cpu_idle",
            Self::CpuIdleExit => "cpu_idle_exit",
            Self::IpiRaise => "ipi_raise",
            Self::IpiEnter => "ipi_enter",
            Self::IpiExit => "ipi_exit",
            Self::IrqHandlerEntry => "irq_handler_entry",
            Self::IrqHandlerExit => "irq_handler_exit",
            Self::ClockEvent(name) | Self::Other(name) => name,
        }
    }

    /// Clock event handler invocations count as wake candidates
    pub fn is_clock_event_handle(&self) -> bool {
        matches!(self, Self::ClockEvent(name) if name.starts_with(CLOCK_EVENT_HANDLE_PREFIX))
    }
}

impl fmt::Display for Tracepoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Idle state as reported by `cpu_idle` / `cpu_idle_exit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleStatePayload {
    /// Requested or entered state; negative means "none"
    pub state: i64,
    pub cpu_id: u32,
}

/// Structured fields extracted from a tracepoint payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    CpuIdle(IdleStatePayload),
    CpuIdleExit(IdleStatePayload),
    IpiRaise { target_mask: CpuMask, ipi_name: String },
    IpiEnter { ipi_name: String },
    IpiExit { ipi_name: String },
    IrqHandlerEntry { irq: u32, name: String },
    ClockEvent { device: String, event_time: f64 },
}

/// Decode a payload according to its tracepoint kind
///
/// **Public** - called by the line parser for every matched line
///
/// # Returns
/// `Ok(None)` for kinds without a payload grammar
///
/// # Errors
/// * `DecodeError::GrammarMismatch` - payload text does not fit the grammar
/// * `DecodeError::InvalidField` - a field matched but is out of range
pub fn decode_payload(tracepoint: &Tracepoint, text: &str) -> Result<Option<Payload>, DecodeError> {
    let payload = match tracepoint {
        Tracepoint::CpuIdle => Payload::CpuIdle(decode_idle_state(tracepoint, text)?),
        Tracepoint::CpuIdleExit => Payload::CpuIdleExit(decode_idle_state(tracepoint, text)?),
        Tracepoint::IpiRaise => {
            let caps = captures(&IPI_RAISE_REGEX, tracepoint, text)?;
            let target_mask = CpuMask::from_hex(&caps[1])
                .ok_or_else(|| invalid_field(tracepoint, "target_mask", &caps[1]))?;
            Payload::IpiRaise {
                target_mask,
                ipi_name: caps[2].to_string(),
            }
        }
        Tracepoint::IpiEnter => Payload::IpiEnter {
            ipi_name: captures(&IPI_NAME_REGEX, tracepoint, text)?[1].to_string(),
        },
        Tracepoint::IpiExit => Payload::IpiExit {
            ipi_name: captures(&IPI_NAME_REGEX, tracepoint, text)?[1].to_string(),
        },
        Tracepoint::IrqHandlerEntry => {
            let caps = captures(&IRQ_HANDLER_ENTRY_REGEX, tracepoint, text)?;
            Payload::IrqHandlerEntry {
                irq: parse_field(tracepoint, "irq", &caps[1])?,
                name: caps[2].to_string(),
            }
        }
        Tracepoint::ClockEvent(_) => {
            let caps = captures(&CLOCK_EVENT_REGEX, tracepoint, text)?;
            let event_time = nanos_to_seconds(&caps[2])
                .ok_or_else(|| invalid_field(tracepoint, "time", &caps[2]))?;
            Payload::ClockEvent {
                device: caps[1].to_string(),
                event_time,
            }
        }
        Tracepoint::IrqHandlerExit | Tracepoint::Other(_) => return Ok(None),
    };

    Ok(Some(payload))
}

fn decode_idle_state(tracepoint: &Tracepoint, text: &str) -> Result<IdleStatePayload, DecodeError> {
    let caps = captures(&CPU_IDLE_REGEX, tracepoint, text)?;

    let state = if &caps[1] == NO_IDLE_STATE_RAW {
        NO_IDLE_STATE
    } else {
        parse_field(tracepoint, "state", &caps[1])?
    };

    Ok(IdleStatePayload {
        state,
        cpu_id: parse_field(tracepoint, "cpu_id", &caps[2])?,
    })
}

fn captures<'t>(
    regex: &Regex,
    tracepoint: &Tracepoint,
    text: &'t str,
) -> Result<regex::Captures<'t>, DecodeError> {
    regex.captures(text).ok_or_else(|| DecodeError::GrammarMismatch {
        tracepoint: tracepoint.to_string(),
    })
}

fn parse_field<T: std::str::FromStr>(
    tracepoint: &Tracepoint,
    field: &'static str,
    value: &str,
) -> Result<T, DecodeError> {
    value.parse().map_err(|_| invalid_field(tracepoint, field, value))
}

fn invalid_field(tracepoint: &Tracepoint, field: &'static str, value: &str) -> DecodeError {
    DecodeError::InvalidField {
        tracepoint: tracepoint.to_string(),
        field,
        value: value.to_string(),
    }
}
