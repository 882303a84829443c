//! idlat
//!
//! Idle exit latency estimation from kernel trace logs.
//!
//! Reads `trace-cmd` output containing `cpu_idle`, `cpu_idle_exit`, IPI,
//! IRQ and clock event tracepoints, and reconstructs for every idle episode
//! the earliest event that should have woken the CPU and when it actually
//! left idle.
//!
//! ## Getting Started
//!
//! ```bash
//! trace-cmd record -e power:cpu_idle -e ipi -e irq:irq_handler_entry \
//!     -e irq:irq_handler_exit -e timer:clock_event_handle_entry
//! idlat analyze --input trace.dat --summary
//! ```

pub mod collect;
pub mod commands;
pub mod estimator;
pub mod output;
pub mod parser;
pub mod utils;
