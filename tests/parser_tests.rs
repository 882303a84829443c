use idlat::parser::{
    assemble_events, match_line, normalize_timestamp, parse_event, IdleStatePayload, LineLayout,
    Payload, Tracepoint,
};
use idlat::utils::Diagnostic;
use pretty_assertions::assert_eq;

#[test]
fn test_timestamp_encodings() {
    assert_eq!(normalize_timestamp("123us").unwrap(), 0.000123);
    assert_eq!(normalize_timestamp("1.5").unwrap(), 1.5);
    assert_eq!(normalize_timestamp("1500000000").unwrap(), 1.5);
}

#[test]
fn test_layouts_agree_on_equivalent_data() {
    let live = match_line("          <idle>-0     [001]     0.001500: cpu_idle: state=1 cpu_id=1").unwrap();
    let dump = match_line("<idle>-0       1 1500us : cpu_idle: state=1 cpu_id=1").unwrap();

    assert_eq!(live.layout, LineLayout::Live);
    assert_eq!(dump.layout, LineLayout::Dump);
    assert_eq!(live.cpu, dump.cpu);
    assert_eq!(live.tracepoint, dump.tracepoint);
    assert_eq!(live.timestamp, dump.timestamp);
    assert_eq!(live.payload, dump.payload);
}

#[test]
fn test_parse_event_decodes_payload() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let event = parse_event(
        1,
        "     swapper/2-0     [002]   100.250000: cpu_idle_exit: state=4294967295 cpu_id=2",
        &mut diags,
    )
    .unwrap();

    assert_eq!(event.comm, "swapper/2");
    assert_eq!(event.cpu, 2);
    assert_eq!(event.timestamp, 100.25);
    assert_eq!(event.tracepoint, Tracepoint::CpuIdleExit);
    assert_eq!(
        event.payload,
        Some(Payload::CpuIdleExit(IdleStatePayload { state: -1, cpu_id: 2 }))
    );
    assert!(diags.is_empty());
}

#[test]
fn test_unknown_tracepoint_is_kept_without_payload() {
    let mut diags: Vec<Diagnostic> = Vec::new();
    let event = parse_event(
        1,
        "  kworker/0:1-42 [000] 5.0: sched_switch: prev_comm=kworker/0:1 prev_pid=42",
        &mut diags,
    )
    .unwrap();

    assert_eq!(event.tracepoint, Tracepoint::Other("sched_switch".to_string()));
    assert_eq!(event.payload, None);
    assert!(diags.is_empty());
}

#[test]
fn test_bad_lines_do_not_stop_the_stream() {
    let lines = vec![
        "CPU 3 is empty".to_string(),
        "  <idle>-0 [000] 2.0: ipi_enter: (Rescheduling interrupts)".to_string(),
        "  <idle>-0 [000] 1.0: ipi_raise: target_mask=zz (Function call interrupts)".to_string(),
        "".to_string(),
    ];
    let mut diags: Vec<Diagnostic> = Vec::new();

    let events = assemble_events(&lines, &mut diags);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].tracepoint, Tracepoint::IpiRaise);
    assert_eq!(events[0].payload, None);
    assert_eq!(events[1].tracepoint, Tracepoint::IpiEnter);

    let unparseable = diags
        .iter()
        .filter(|d| matches!(d, Diagnostic::UnparseableLine { .. }))
        .count();
    let undecodable = diags
        .iter()
        .filter(|d| matches!(d, Diagnostic::UndecodablePayload { line_no: 3, .. }))
        .count();
    assert_eq!(unparseable, 2);
    assert_eq!(undecodable, 1);
}
