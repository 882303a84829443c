//! Idle episode reconstruction.
//!
//! This module transforms the chronological event stream into:
//! - Per-CPU idle episode state
//! - Completed idle episode records with their wake source
//! - Latency statistics for display

pub mod episode;
pub mod machine;
pub mod metrics;
pub mod state;

// Re-export main types and functions
pub use episode::{CompletedIdleEpisode, WakeSource};
pub use machine::{estimate_idle_latency, IdleLatencyEstimator};
pub use metrics::{generate_text_summary, latency_by_state, latency_by_wake_source, LatencyStats};
pub use state::CpuState;
