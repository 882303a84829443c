//! Configuration and constants for the CLI.

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// `cpu_idle` reports "no idle state" as (u32)-1
pub const NO_IDLE_STATE_RAW: &str = "4294967295";

/// Normalized value of the "no idle state" sentinel
pub const NO_IDLE_STATE: i64 = -1;

/// Default trace-cmd executable
pub const DEFAULT_TRACE_CMD: &str = "trace-cmd";

/// Default trace data file written by `trace-cmd record`
pub const DEFAULT_TRACE_FILE: &str = "trace.dat";

/// Environment variable overriding the trace-cmd executable
pub const TRACE_CMD_ENV: &str = "IDLAT_TRACE_CMD";

// Wake source labels
pub const IPI_WAKE_LABEL: &str = "ipi";
pub const IRQ_WAKE_PREFIX: &str = "irq";

// Tracepoint name prefixes
pub const CLOCK_EVENT_PREFIX: &str = "clock_event";
pub const CLOCK_EVENT_HANDLE_PREFIX: &str = "clock_event_handle";
