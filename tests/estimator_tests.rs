use idlat::estimator::{estimate_idle_latency, CompletedIdleEpisode, IdleLatencyEstimator};
use idlat::parser::{assemble_events, CpuMask, IdleStatePayload, Payload, RawEvent, Tracepoint};
use idlat::utils::Diagnostic;
use pretty_assertions::assert_eq;

fn run(lines: &[&str]) -> (Vec<CompletedIdleEpisode>, Vec<Diagnostic>) {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let events = assemble_events(lines, &mut diags);
    let episodes = estimate_idle_latency(&events, &mut diags).unwrap();
    (episodes, diags)
}

fn event(cpu: u32, ts: f64, tracepoint: Tracepoint, payload: Option<Payload>) -> RawEvent {
    RawEvent {
        comm: "<idle>".to_string(),
        pid: 0,
        cpu,
        timestamp: ts,
        tracepoint,
        payload,
    }
}

fn cpu_idle(cpu: u32, ts: f64, state: i64) -> RawEvent {
    event(
        cpu,
        ts,
        Tracepoint::CpuIdle,
        Some(Payload::CpuIdle(IdleStatePayload { state, cpu_id: cpu })),
    )
}

fn irq_entry(cpu: u32, ts: f64, irq: u32, name: &str) -> RawEvent {
    event(
        cpu,
        ts,
        Tracepoint::IrqHandlerEntry,
        Some(Payload::IrqHandlerEntry {
            irq,
            name: name.to_string(),
        }),
    )
}

fn irq_exit(cpu: u32, ts: f64) -> RawEvent {
    event(cpu, ts, Tracepoint::IrqHandlerExit, None)
}

#[test]
fn test_idle_episode_lifecycle() {
    let events = vec![cpu_idle(0, 10.0, 2), irq_entry(0, 12.0, 5, "x"), irq_exit(0, 13.0)];
    let mut diags: Vec<Diagnostic> = Vec::new();

    let episodes = estimate_idle_latency(&events, &mut diags).unwrap();

    assert_eq!(
        episodes,
        vec![CompletedIdleEpisode {
            cpu: 0,
            state: 2,
            state_attempt: 2,
            wake_src: "irq_5_x".to_string(),
            enter_ts: 10.0,
            wake_ts: Some(12.0),
            exit_ts: None,
        }]
    );
}

#[test]
fn test_wake_before_entry_is_rejected() {
    let events = vec![irq_entry(0, 9.0, 5, "x"), cpu_idle(0, 10.0, 2), irq_exit(0, 13.0)];
    let mut diags: Vec<Diagnostic> = Vec::new();

    let episodes = estimate_idle_latency(&events, &mut diags).unwrap();

    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].wake_ts, None);
    assert_eq!(episodes[0].wake_src, "");
}

#[test]
fn test_earliest_wake_wins_regardless_of_arrival() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let mut est = IdleLatencyEstimator::new();

    est.handle_event(&cpu_idle(0, 10.0, 1), &mut diags).unwrap();
    est.handle_event(&irq_entry(0, 12.0, 1, "late"), &mut diags).unwrap();
    est.handle_event(&irq_entry(0, 11.0, 2, "early"), &mut diags).unwrap();
    est.handle_event(&irq_exit(0, 13.0), &mut diags).unwrap();

    let episodes = est.finish(&mut diags);
    assert_eq!(episodes[0].wake_ts, Some(11.0));
    assert_eq!(episodes[0].wake_src, "irq_2_early");
}

#[test]
fn test_ipi_raise_mask_selects_cpus_zero_and_two() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let mut est = IdleLatencyEstimator::new();

    for cpu in 0..3 {
        est.handle_event(&cpu_idle(cpu, 1.0, 1), &mut diags).unwrap();
    }
    let raise = event(
        3,
        2.0,
        Tracepoint::IpiRaise,
        Some(Payload::IpiRaise {
            target_mask: CpuMask::from_bits(5),
            ipi_name: "Function call interrupts".to_string(),
        }),
    );
    est.handle_event(&raise, &mut diags).unwrap();
    for cpu in 0..3 {
        est.handle_event(&irq_exit(cpu, 3.0), &mut diags).unwrap();
    }

    let episodes = est.finish(&mut diags);
    let wakes: Vec<(u32, &str)> = episodes.iter().map(|e| (e.cpu, e.wake_src.as_str())).collect();
    assert_eq!(wakes, vec![(0, "ipi"), (1, ""), (2, "ipi")]);
}

#[test]
fn test_failed_idle_entry_emits_nothing() {
    let (episodes, diags) = run(&[
        "  <idle>-0 [001] 1.000000: cpu_idle: state=3 cpu_id=1",
        "  <idle>-0 [001] 1.000010: cpu_idle_exit: state=4294967295 cpu_id=1",
        "  <idle>-0 [001] 1.000020: irq_handler_entry: irq=27 name=arch_timer",
        "  <idle>-0 [001] 1.000030: irq_handler_exit: irq=27 ret=handled",
    ]);

    assert!(episodes.is_empty());
    assert_eq!(diags, vec![Diagnostic::EpisodeAborted { cpu: 1, ts: 1.00001 }]);
}

#[test]
fn test_open_episode_at_end_is_dropped() {
    let (episodes, diags) = run(&[
        "  <idle>-0 [000] 1.0: cpu_idle: state=1 cpu_id=0",
        "  <idle>-0 [000] 1.5: irq_handler_entry: irq=3 name=eth0",
    ]);

    assert!(episodes.is_empty());
    assert_eq!(
        diags,
        vec![Diagnostic::OpenAtEndOfStream {
            cpu: 0,
            enter_ts: 1.0
        }]
    );
}

#[test]
fn test_full_cycle_with_exit_and_correction() {
    let (episodes, _) = run(&[
        "  <idle>-0 [000] 10.000000: cpu_idle: state=2 cpu_id=0",
        "  <idle>-0 [000] 10.000001: cpu_idle_exit: state=1 cpu_id=0",
        "  <idle>-0 [000] 10.004000: clock_event_handle_entry: clock_event_device=0xffff00003fe08a00 time=10003000000",
        "  <idle>-0 [000] 10.003500: cpu_idle: state=4294967295 cpu_id=0",
        "  <idle>-0 [000] 10.004100: irq_handler_entry: irq=11 name=arch_timer",
        "  <idle>-0 [000] 10.004200: irq_handler_exit: irq=11 ret=handled",
    ]);

    assert_eq!(episodes.len(), 1);
    let episode = &episodes[0];
    assert_eq!(episode.state, 1);
    assert_eq!(episode.state_attempt, 2);
    assert_eq!(episode.wake_src, "clock_event_handle_entry");
    assert_eq!(episode.wake_ts, Some(10.003));
    assert_eq!(episode.exit_ts, Some(10.0035));
    assert!(episode.exit_latency().unwrap() > 0.0);
}

#[test]
fn test_ipi_exit_flushes_and_resets() {
    let (episodes, _) = run(&[
        "  <idle>-0 [002] 1.0: cpu_idle: state=1 cpu_id=2",
        "  kworker-9 [000] 1.1: ipi_raise: target_mask=00000000,00000004 (Function call interrupts)",
        "  <idle>-0 [002] 1.2: cpu_idle: state=4294967295 cpu_id=2",
        "  <idle>-0 [002] 1.3: ipi_entry_unknown: whatever",
        "  <idle>-0 [002] 1.4: ipi_exit: (Function call interrupts)",
        "  <idle>-0 [002] 1.5: ipi_exit: (Function call interrupts)",
    ]);

    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].cpu, 2);
    assert_eq!(episodes[0].wake_src, "ipi");
    assert_eq!(episodes[0].wake_ts, Some(1.1));
    assert_eq!(episodes[0].exit_ts, Some(1.2));
}

#[test]
fn test_reentry_overwrites_without_emitting() {
    let (episodes, diags) = run(&[
        "  <idle>-0 [000] 1.0: cpu_idle: state=1 cpu_id=0",
        "  <idle>-0 [000] 2.0: cpu_idle: state=2 cpu_id=0",
        "  <idle>-0 [000] 3.0: irq_handler_exit: irq=1 ret=handled",
    ]);

    assert_eq!(episodes.len(), 1);
    assert_eq!(episodes[0].enter_ts, 2.0);
    assert!(matches!(diags[0], Diagnostic::EpisodeOverwritten { cpu: 0, .. }));
}
