//! Output JSON schema definitions for latency reports.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::estimator::{latency_by_state, CompletedIdleEpisode, LatencyStats};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::diagnostics::DiagnosticCounts;
use serde::{Deserialize, Serialize};

/// Top-level report structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Trace the report was built from (file path or `stdin`)
    pub source: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Non-fatal problems met while processing the trace
    pub diagnostics: DiagnosticCounts,

    /// Latency statistics per idle state
    pub by_state: Vec<LatencyStats>,

    /// Every completed idle episode, in completion order
    pub episodes: Vec<CompletedIdleEpisode>,
}

impl LatencyReport {
    /// Build a report stamped with the current time
    pub fn new(
        source: impl Into<String>,
        episodes: Vec<CompletedIdleEpisode>,
        diagnostics: DiagnosticCounts,
    ) -> Self {
        use chrono::Utc;

        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            generated_at: Utc::now().to_rfc3339(),
            diagnostics,
            by_state: latency_by_state(&episodes),
            episodes,
        }
    }
}
