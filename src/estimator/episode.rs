//! Completed idle episode records.

use crate::utils::config::{IPI_WAKE_LABEL, IRQ_WAKE_PREFIX};
use crate::utils::error::EstimatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event kind credited with waking a CPU
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WakeSource {
    /// Inter-processor interrupt, raised remotely or entered locally
    Ipi,
    /// Hardware interrupt handler
    Irq { irq: u32, name: String },
    /// Clock event handler, labelled with its tracepoint name
    ClockEvent(String),
}

impl fmt::Display for WakeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ipi => f.write_str(IPI_WAKE_LABEL),
            Self::Irq { irq, name } => write!(f, "{}_{}_{}", IRQ_WAKE_PREFIX, irq, name),
            Self::ClockEvent(tracepoint) => f.write_str(tracepoint),
        }
    }
}

/// One finished idle episode
///
/// Missing timestamps serialize as `null` in JSON and as empty cells in CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedIdleEpisode {
    pub cpu: u32,

    /// State actually entered, after any `cpu_idle_exit` correction
    pub state: i64,

    /// State requested on entry
    pub state_attempt: i64,

    /// Wake source label, empty if no wake event was seen
    pub wake_src: String,

    pub enter_ts: f64,
    pub wake_ts: Option<f64>,
    pub exit_ts: Option<f64>,
}

impl CompletedIdleEpisode {
    /// Build an episode, checking the output contract
    ///
    /// # Errors
    /// * `EstimatorError::InvariantViolation` - a timestamp is NaN or infinite
    pub fn new(
        cpu: u32,
        state: i64,
        state_attempt: i64,
        wake_src: Option<&WakeSource>,
        enter_ts: f64,
        wake_ts: Option<f64>,
        exit_ts: Option<f64>,
    ) -> Result<Self, EstimatorError> {
        let timestamps = [
            ("enter_ts", Some(enter_ts)),
            ("wake_ts", wake_ts),
            ("exit_ts", exit_ts),
        ];
        for (field, value) in timestamps {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(EstimatorError::InvariantViolation {
                    cpu,
                    reason: format!("{} is not finite ({})", field, value),
                });
            }
        }

        Ok(Self {
            cpu,
            state,
            state_attempt,
            wake_src: wake_src.map(ToString::to_string).unwrap_or_default(),
            enter_ts,
            wake_ts,
            exit_ts,
        })
    }

    /// Time from the wake event to the idle exit, when both are known
    pub fn exit_latency(&self) -> Option<f64> {
        match (self.wake_ts, self.exit_ts) {
            (Some(wake), Some(exit)) => Some(exit - wake),
            _ => None,
        }
    }

    /// Time spent idle, when the exit is known
    pub fn residency(&self) -> Option<f64> {
        self.exit_ts.map(|exit| exit - self.enter_ts)
    }

    /// Whether the entered state differs from the requested one
    pub fn was_demoted(&self) -> bool {
        self.state != self.state_attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wake_source_labels() {
        assert_eq!(WakeSource::Ipi.to_string(), "ipi");
        assert_eq!(
            WakeSource::Irq {
                irq: 5,
                name: "x".to_string()
            }
            .to_string(),
            "irq_5_x"
        );
        assert_eq!(
            WakeSource::ClockEvent("clock_event_handle_entry".to_string()).to_string(),
            "clock_event_handle_entry"
        );
    }

    #[test]
    fn test_new_rejects_nan() {
        let err = CompletedIdleEpisode::new(1, 2, 2, None, 1.0, Some(f64::NAN), None).unwrap_err();
        assert!(matches!(err, EstimatorError::InvariantViolation { cpu: 1, .. }));
    }

    #[test]
    fn test_latency_and_residency() {
        let episode =
            CompletedIdleEpisode::new(0, 1, 2, Some(&WakeSource::Ipi), 10.0, Some(12.0), Some(12.5))
                .unwrap();
        assert_eq!(episode.wake_src, "ipi");
        assert_eq!(episode.exit_latency(), Some(0.5));
        assert_eq!(episode.residency(), Some(2.5));
        assert!(episode.was_demoted());
    }

    #[test]
    fn test_missing_values_are_none() {
        let episode = CompletedIdleEpisode::new(0, 1, 1, None, 10.0, None, None).unwrap();
        assert_eq!(episode.wake_src, "");
        assert_eq!(episode.exit_latency(), None);
        assert_eq!(episode.residency(), None);
    }
}
