//! Per-CPU idle episode state.

use super::episode::{CompletedIdleEpisode, WakeSource};
use crate::utils::error::EstimatorError;

/// Idle bookkeeping for a single CPU
///
/// `idle_state == None` means the CPU is not in a tracked idle episode; all
/// other fields are then stale and ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuState {
    pub idle_state: Option<i64>,
    pub idle_state_attempt: i64,
    pub idle_enter_ts: f64,
    pub idle_wake_ts: Option<f64>,
    pub idle_exit_ts: Option<f64>,
    pub idle_wake_src: Option<WakeSource>,
}

impl CpuState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.idle_state.is_some()
    }

    /// Start a new idle episode
    ///
    /// An episode still open is replaced without being emitted; its entry
    /// timestamp is returned so the caller can report it.
    pub fn begin(&mut self, state: i64, ts: f64) -> Option<f64> {
        let overwritten = self.is_idle().then_some(self.idle_enter_ts);

        self.idle_state = Some(state);
        self.idle_state_attempt = state;
        self.idle_enter_ts = ts;
        self.idle_wake_ts = None;
        self.idle_wake_src = None;
        self.idle_exit_ts = None;

        overwritten
    }

    /// Record the idle exit without closing the episode
    pub fn mark_exit(&mut self, ts: f64) {
        self.idle_exit_ts = Some(ts);
    }

    /// Drop the current episode; returns whether one was active
    pub fn abort(&mut self) -> bool {
        self.idle_state.take().is_some()
    }

    /// Replace the attempted state with the one the driver actually entered
    pub fn correct_state(&mut self, state: i64) {
        if self.is_idle() {
            self.idle_state = Some(state);
        }
    }

    /// Consider an event as the wake trigger of the current episode
    ///
    /// Only events inside `[enter, exit]` (or `[enter, inf)` while the exit is
    /// unknown) qualify, and the earliest one wins.
    pub fn on_wake_event(&mut self, ts: f64, source: WakeSource) {
        if !self.is_idle() {
            return;
        }

        let before_enter = ts < self.idle_enter_ts;
        let after_exit = self.idle_exit_ts.is_some_and(|exit| ts > exit);
        if before_enter || after_exit {
            return;
        }

        if self.idle_wake_ts.map_or(true, |wake| ts < wake) {
            self.idle_wake_ts = Some(ts);
            self.idle_wake_src = Some(source);
        }
    }

    /// Close the current episode, if any
    ///
    /// # Errors
    /// * `EstimatorError::InvariantViolation` - the record breaks the output contract
    pub fn flush(&mut self, cpu: u32) -> Result<Option<CompletedIdleEpisode>, EstimatorError> {
        let Some(state) = self.idle_state else {
            return Ok(None);
        };

        let episode = CompletedIdleEpisode::new(
            cpu,
            state,
            self.idle_state_attempt,
            self.idle_wake_src.as_ref(),
            self.idle_enter_ts,
            self.idle_wake_ts,
            self.idle_exit_ts,
        )?;

        self.idle_state = None;

        Ok(Some(episode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn irq(n: u32) -> WakeSource {
        WakeSource::Irq {
            irq: n,
            name: "dev".to_string(),
        }
    }

    #[test]
    fn test_wake_ignored_when_not_idle() {
        let mut state = CpuState::new();
        state.on_wake_event(1.0, WakeSource::Ipi);
        assert_eq!(state.idle_wake_ts, None);
    }

    #[test]
    fn test_wake_window() {
        let mut state = CpuState::new();
        state.begin(1, 10.0);
        state.mark_exit(20.0);

        state.on_wake_event(9.0, irq(1));
        state.on_wake_event(21.0, irq(2));
        assert_eq!(state.idle_wake_ts, None);

        state.on_wake_event(20.0, irq(3));
        assert_eq!(state.idle_wake_ts, Some(20.0));
        assert_eq!(state.idle_wake_src, Some(irq(3)));
    }

    #[test]
    fn test_earliest_wake_wins() {
        let mut state = CpuState::new();
        state.begin(1, 10.0);

        state.on_wake_event(12.0, irq(1));
        state.on_wake_event(11.0, irq(2));
        state.on_wake_event(13.0, irq(3));

        assert_eq!(state.idle_wake_ts, Some(11.0));
        assert_eq!(state.idle_wake_src, Some(irq(2)));
    }

    #[test]
    fn test_begin_reports_overwrite() {
        let mut state = CpuState::new();
        assert_eq!(state.begin(1, 10.0), None);
        assert_eq!(state.begin(2, 11.0), Some(10.0));
        assert_eq!(state.idle_state, Some(2));
    }

    #[test]
    fn test_correct_state_requires_active_episode() {
        let mut state = CpuState::new();
        state.correct_state(3);
        assert_eq!(state.idle_state, None);

        state.begin(2, 1.0);
        state.correct_state(1);
        assert_eq!(state.idle_state, Some(1));
        assert_eq!(state.idle_state_attempt, 2);
    }

    #[test]
    fn test_flush_clears_episode() {
        let mut state = CpuState::new();
        assert_eq!(state.flush(0).unwrap(), None);

        state.begin(2, 1.0);
        let episode = state.flush(0).unwrap().unwrap();
        assert_eq!(episode.state, 2);
        assert!(!state.is_idle());
        assert_eq!(state.flush(0).unwrap(), None);
    }
}
