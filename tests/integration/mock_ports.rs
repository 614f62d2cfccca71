//! Mock port adapters for integration tests.
//!
//! Each mock records what the services asked of it so tests can assert
//! on the full call history without a broker, model file or terminal.

use std::cell::RefCell;
use std::collections::VecDeque;

use chrono::{DateTime, NaiveDateTime};
use smartgarden::app::commands::Command;
use smartgarden::app::events::AppEvent;
use smartgarden::app::ports::{
    Classifier, CommandPublisher, DashboardView, DisplaySurface, EventSink,
};
use smartgarden::error::{ClassifierError, CommsError};
use smartgarden::telemetry::{Features, SensorReading};

// ── Publisher ─────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Vec<Command>,
    /// Refuse this many upcoming publishes.
    pub refuse: usize,
}

#[allow(dead_code)]
impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<Command> {
        self.published.last().copied()
    }
}

impl CommandPublisher for RecordingPublisher {
    fn publish(&mut self, command: Command) -> Result<(), CommsError> {
        if self.refuse > 0 {
            self.refuse -= 1;
            return Err(CommsError::PublishFailed("mock refused".to_string()));
        }
        self.published.push(command);
        Ok(())
    }
}

// ── Classifiers ───────────────────────────────────────────────

/// Dry soil waters, heat alarms, otherwise standby.
pub struct RuleClassifier;

impl Classifier for RuleClassifier {
    fn predict(&self, f: &Features) -> Result<u8, ClassifierError> {
        f.validate()?;
        Ok(if f.temperature > 35.0 {
            2
        } else if f.soil_humidity <= 40.0 {
            1
        } else {
            0
        })
    }
}

/// Returns pre-scripted labels in order, then fails.
pub struct ScriptedClassifier {
    labels: RefCell<VecDeque<u8>>,
}

#[allow(dead_code)]
impl ScriptedClassifier {
    pub fn new(labels: impl IntoIterator<Item = u8>) -> Self {
        Self {
            labels: RefCell::new(labels.into_iter().collect()),
        }
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&self, _features: &Features) -> Result<u8, ClassifierError> {
        self.labels
            .borrow_mut()
            .pop_front()
            .ok_or(ClassifierError::ArtifactInvalid("script exhausted".to_string()))
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── Display ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub status: Command,
    pub readings: Vec<SensorReading>,
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub frames: Vec<Frame>,
}

#[allow(dead_code)]
impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }
}

impl DisplaySurface for RecordingDisplay {
    fn render(&mut self, view: &DashboardView<'_>) {
        self.frames.push(Frame {
            status: view.status,
            readings: view.readings.to_vec(),
        });
    }
}

// ── Fixtures ──────────────────────────────────────────────────

#[allow(dead_code)]
pub fn ts(offset_secs: i64) -> NaiveDateTime {
    DateTime::from_timestamp(1_740_817_800 + offset_secs, 0)
        .unwrap()
        .naive_utc()
}

#[allow(dead_code)]
pub fn reading(temp: f32, air: f32, soil: f32, light: bool) -> SensorReading {
    SensorReading::new(ts(0), temp, air, soil, light)
}

#[allow(dead_code)]
pub fn payload(temp: f32, air: f32, soil: f32, ldr: u8, waktu: &str) -> Vec<u8> {
    format!(
        r#"{{"suhu":{temp},"kelembaban_udara":{air},"kelembaban_tanah":{soil},"ldr":{ldr},"waktu":"{waktu}"}}"#
    )
    .into_bytes()
}
