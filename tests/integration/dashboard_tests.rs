//! Integration tests for the dashboard: routing, drain-then-render and
//! manual override.

use std::sync::Arc;
use std::time::{Duration, Instant};

use smartgarden::app::commands::{Command, OperatorAction};
use smartgarden::app::dashboard::{DashboardService, IngestRouter};
use smartgarden::app::events::AppEvent;
use smartgarden::app::service::ActuationService;
use smartgarden::config::{SystemConfig, TELEMETRY_LOG_CAP};
use smartgarden::handoff::HandoffBuffer;

use crate::mock_ports::{
    RecordingDisplay, RecordingPublisher, RecordingSink, RuleClassifier, payload, reading,
};

fn setup() -> (Arc<HandoffBuffer>, IngestRouter, DashboardService, SystemConfig) {
    let config = SystemConfig::default();
    let buffer = Arc::new(HandoffBuffer::new(Command::Standby));
    let router = IngestRouter::new(
        config.data_topic.as_str(),
        config.control_topic.as_str(),
        Arc::clone(&buffer),
    );
    let service = DashboardService::new(Arc::clone(&buffer));
    (buffer, router, service, config)
}

#[test]
fn tick_drains_before_rendering() {
    let (buffer, router, mut svc, config) = setup();
    let mut sink = RecordingSink::new();
    let mut display = RecordingDisplay::new();

    router.route(&config.data_topic, &payload(30.0, 50.0, 20.0, 1, "2025-03-01 08:30:00"), &mut sink);
    router.route(&config.data_topic, &payload(31.0, 51.0, 21.0, 0, "2025-03-01 08:30:05"), &mut sink);
    router.route(&config.control_topic, b"POMPA_ON", &mut sink);

    let report = svc.tick(&mut display);

    assert_eq!(report.drained, 2);
    assert_eq!(buffer.pending_len(), 0);
    let frame = display.last().unwrap();
    assert_eq!(frame.status, Command::Watering);
    assert_eq!(frame.readings.len(), 2);
    assert_eq!(frame.readings[1].temperature(), 31.0);
}

#[test]
fn rejected_payload_never_reaches_buffer_or_log() {
    let (buffer, router, mut svc, config) = setup();
    let mut sink = RecordingSink::new();
    let mut display = RecordingDisplay::new();

    router.route(&config.data_topic, br#"{"suhu":30}"#, &mut sink);
    router.route(&config.data_topic, b"\xff\xfe", &mut sink);

    assert_eq!(buffer.pending_len(), 0);
    svc.tick(&mut display);
    assert!(svc.log().is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::ReadingRejected(_))), 2);
}

#[test]
fn log_is_capped_across_ticks() {
    let (buffer, _router, mut svc, _config) = setup();
    let mut display = RecordingDisplay::new();

    for i in 0..150 {
        buffer.push(reading(i as f32, 50.0, 50.0, true));
        if i % 40 == 39 {
            svc.tick(&mut display);
        }
    }
    let report = svc.tick(&mut display);

    assert_eq!(report.drained, 30);
    let frame = display.last().unwrap();
    assert_eq!(frame.readings.len(), TELEMETRY_LOG_CAP);
    assert_eq!(frame.readings[0].temperature(), 50.0);
    assert_eq!(frame.readings[99].temperature(), 149.0);
}

#[test]
fn override_updates_local_status_before_echo() {
    let (buffer, _router, mut svc, _config) = setup();
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();
    let mut display = RecordingDisplay::new();

    let keep_going = svc.apply(
        OperatorAction::SetCommand(Command::Alarm),
        &mut publisher,
        &mut sink,
    );

    assert!(keep_going);
    assert_eq!(publisher.published, vec![Command::Alarm]);
    assert_eq!(svc.status(), Command::Alarm);
    assert_eq!(buffer.read_control(), Command::Alarm);
    assert_eq!(svc.tick(&mut display).status, Command::Alarm);
    assert!(sink.events.contains(&AppEvent::OverrideApplied(Command::Alarm)));
}

#[test]
fn refused_override_leaves_status_unchanged() {
    let (_buffer, _router, mut svc, _config) = setup();
    let mut publisher = RecordingPublisher {
        refuse: 1,
        ..Default::default()
    };
    let mut sink = RecordingSink::new();

    svc.apply(OperatorAction::SetCommand(Command::Watering), &mut publisher, &mut sink);

    assert_eq!(svc.status(), Command::Standby);
    assert_eq!(
        sink.count(|e| matches!(e, AppEvent::PublishFailed { command: Command::Watering, .. })),
        1
    );
}

#[test]
fn controller_overwrites_override_last_publish_wins() {
    let (_buffer, router, mut dash, config) = setup();
    let mut broker = RecordingPublisher::new();
    let mut sink = RecordingSink::new();
    let mut display = RecordingDisplay::new();
    let mut controller = ActuationService::new(Duration::from_secs(2));
    let t0 = Instant::now();
    let dry = reading(25.0, 60.0, 20.0, true);

    controller.handle_reading(&dry, t0, &RuleClassifier, &mut broker, &mut sink);
    dash.apply(OperatorAction::SetCommand(Command::Standby), &mut broker, &mut sink);
    controller.handle_reading(&dry, t0 + Duration::from_secs(5), &RuleClassifier, &mut broker, &mut sink);

    // The controller still believes WATERING was last sent, so it stays
    // quiet; the operator's STANDBY is the retained value.
    assert_eq!(broker.published, vec![Command::Watering, Command::Standby]);

    // Echo of the retained value reaches the dashboard.
    router.route(&config.control_topic, broker.last().unwrap().as_wire().as_bytes(), &mut sink);
    assert_eq!(dash.tick(&mut display).status, Command::Standby);
}

#[test]
fn annotation_flags_entry_and_rejects_out_of_range() {
    let (buffer, _router, mut svc, _config) = setup();
    let mut publisher = RecordingPublisher::new();
    let mut sink = RecordingSink::new();
    let mut display = RecordingDisplay::new();

    buffer.push(reading(20.0, 50.0, 50.0, true));
    buffer.push(reading(21.0, 50.0, 50.0, true));
    svc.tick(&mut display);

    svc.apply(OperatorAction::MarkAnomaly { index: 1, flagged: true }, &mut publisher, &mut sink);
    svc.apply(OperatorAction::MarkAnomaly { index: 5, flagged: true }, &mut publisher, &mut sink);
    svc.tick(&mut display);

    let frame = display.last().unwrap();
    assert!(!frame.readings[0].anomaly_flag());
    assert!(frame.readings[1].anomaly_flag());
    assert!(sink.events.contains(&AppEvent::AnnotationRejected { index: 5, len: 2 }));
    assert!(publisher.published.is_empty());
}
