//! Idle/wake state machine.
//!
//! Consumes the chronological event stream once and pairs every idle episode
//! with the earliest wake-triggering event seen inside it. Events must be fed
//! in global timestamp order: `ipi_raise` mutates a CPU other than the one it
//! was recorded on.

use super::episode::{CompletedIdleEpisode, WakeSource};
use super::state::CpuState;
use crate::parser::{Payload, RawEvent, Tracepoint};
use crate::utils::diagnostics::{Diagnostic, DiagnosticSink};
use crate::utils::error::EstimatorError;
use log::debug;
use std::collections::BTreeMap;

/// Per-CPU idle latency estimator
#[derive(Debug, Default)]
pub struct IdleLatencyEstimator {
    cpus: BTreeMap<u32, CpuState>,
    episodes: Vec<CompletedIdleEpisode>,
}

impl IdleLatencyEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event
    ///
    /// **Public** - events must arrive in ascending timestamp order
    ///
    /// Events without a decoded payload only reach the arms that need none
    /// (`irq_handler_exit`); everything else falls through to the no-op arm.
    ///
    /// # Errors
    /// * `EstimatorError::InvariantViolation` - a flushed record broke the output contract
    pub fn handle_event(
        &mut self,
        event: &RawEvent,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<(), EstimatorError> {
        let cpu = event.cpu;
        let ts = event.timestamp;

        match (&event.tracepoint, &event.payload) {
            (Tracepoint::CpuIdle, Some(Payload::CpuIdle(idle))) => {
                if idle.state >= 0 {
                    if let Some(enter_ts) = self.cpu_mut(cpu).begin(idle.state, ts) {
                        sink.report(Diagnostic::EpisodeOverwritten { cpu, enter_ts, ts });
                    }
                } else {
                    self.cpu_mut(cpu).mark_exit(ts);
                }
            }

            (Tracepoint::CpuIdleExit, Some(Payload::CpuIdleExit(idle))) => {
                if idle.state < 0 {
                    if self.cpu_mut(cpu).abort() {
                        sink.report(Diagnostic::EpisodeAborted { cpu, ts });
                    }
                } else {
                    self.cpu_mut(cpu).correct_state(idle.state);
                }
            }

            (Tracepoint::IpiRaise, Some(Payload::IpiRaise { target_mask, .. })) => {
                for target in target_mask.iter_set_bits() {
                    self.cpu_mut(target).on_wake_event(ts, WakeSource::Ipi);
                }
            }

            (Tracepoint::IpiEnter, Some(Payload::IpiEnter { .. })) => {
                self.cpu_mut(cpu).on_wake_event(ts, WakeSource::Ipi);
            }

            (Tracepoint::IpiExit, Some(Payload::IpiExit { .. })) => self.flush(cpu)?,

            (Tracepoint::IrqHandlerEntry, Some(Payload::IrqHandlerEntry { irq, name })) => {
                let source = WakeSource::Irq {
                    irq: *irq,
                    name: name.clone(),
                };
                self.cpu_mut(cpu).on_wake_event(ts, source);
            }

            (Tracepoint::IrqHandlerExit, _) => self.flush(cpu)?,

            (Tracepoint::ClockEvent(name), Some(Payload::ClockEvent { event_time, .. }))
                if event.tracepoint.is_clock_event_handle() =>
            {
                let source = WakeSource::ClockEvent(name.clone());
                self.cpu_mut(cpu).on_wake_event(*event_time, source);
            }

            _ => {}
        }

        Ok(())
    }

    /// Episodes completed so far, in flush order
    pub fn episodes(&self) -> &[CompletedIdleEpisode] {
        &self.episodes
    }

    /// Current state of a CPU, if it has been referenced
    pub fn cpu_state(&self, cpu: u32) -> Option<&CpuState> {
        self.cpus.get(&cpu)
    }

    /// Finish processing and hand over the completed episodes
    ///
    /// Episodes still open are dropped; each one is reported to the sink.
    pub fn finish(self, sink: &mut dyn DiagnosticSink) -> Vec<CompletedIdleEpisode> {
        for (cpu, state) in &self.cpus {
            if state.is_idle() {
                sink.report(Diagnostic::OpenAtEndOfStream {
                    cpu: *cpu,
                    enter_ts: state.idle_enter_ts,
                });
            }
        }

        debug!(
            "Estimator finished: {} episodes across {} cpus",
            self.episodes.len(),
            self.cpus.len()
        );

        self.episodes
    }

    fn cpu_mut(&mut self, cpu: u32) -> &mut CpuState {
        self.cpus.entry(cpu).or_default()
    }

    fn flush(&mut self, cpu: u32) -> Result<(), EstimatorError> {
        if let Some(episode) = self.cpu_mut(cpu).flush(cpu)? {
            self.episodes.push(episode);
        }
        Ok(())
    }
}

/// Run the estimator over an already ordered event sequence
///
/// **Public** - main entry point for the estimation stage
///
/// # Arguments
/// * `events` - chronologically sorted events (see `parser::assemble_events`)
/// * `sink` - receives episode lifecycle diagnostics
///
/// # Errors
/// * `EstimatorError::InvariantViolation` - fatal, indicates a logic defect
pub fn estimate_idle_latency(
    events: &[RawEvent],
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<CompletedIdleEpisode>, EstimatorError> {
    let mut estimator = IdleLatencyEstimator::new();
    for event in events {
        estimator.handle_event(event, sink)?;
    }
    Ok(estimator.finish(sink))
}
