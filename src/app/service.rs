//! Actuation service: the controller's hexagonal core.
//!
//! [`ActuationService`] owns the [`ActuationMachine`] and runs the full
//! per-reading pipeline synchronously: classify, decide, maybe publish.
//! All I/O flows through port traits injected at call sites, making the
//! service testable with mock adapters.
//!
//! ```text
//!  Classifier ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │    ActuationService     │
//!                 │  decode · classify ·    │
//!                 │  decide · commit        │
//!                 └───────────┬────────────┘
//!                             ▼
//!                     CommandPublisher
//! ```

use core::time::Duration;
use std::time::Instant;

use log::info;

use crate::error::ClassifierError;
use crate::fsm::{ActuationMachine, ActuationState, Decision};
use crate::telemetry::{self, Features, SensorReading};

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{Classifier, CommandPublisher, EventSink};

/// What happened to one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Published(Command),
    Stable,
    Debounced,
    /// Decode or classification failed; nothing else was attempted.
    Skipped,
    /// The transport refused the publish; state unchanged.
    PublishFailed,
}

// ───────────────────────────────────────────────────────────────
// ActuationService
// ───────────────────────────────────────────────────────────────

pub struct ActuationService {
    machine: ActuationMachine,
    readings_processed: u64,
    publishes: u64,
}

impl ActuationService {
    pub fn new(dwell: Duration) -> Self {
        Self {
            machine: ActuationMachine::new(dwell),
            readings_processed: 0,
            publishes: 0,
        }
    }

    pub fn start(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            dwell: self.machine.dwell(),
        });
        info!("ActuationService started, dwell={:?}", self.machine.dwell());
    }

    // ── Per-message processing ────────────────────────────────

    /// Decode a raw data-topic payload and process it.
    pub fn handle_payload(
        &mut self,
        payload: &[u8],
        now: Instant,
        classifier: &impl Classifier,
        publisher: &mut impl CommandPublisher,
        sink: &mut impl EventSink,
    ) -> Outcome {
        match telemetry::decode(payload) {
            Ok(reading) => self.handle_reading(&reading, now, classifier, publisher, sink),
            Err(e) => {
                sink.emit(&AppEvent::ReadingRejected(e));
                Outcome::Skipped
            }
        }
    }

    /// Run one reading through classify → decide → publish → commit.
    pub fn handle_reading(
        &mut self,
        reading: &SensorReading,
        now: Instant,
        classifier: &impl Classifier,
        publisher: &mut impl CommandPublisher,
        sink: &mut impl EventSink,
    ) -> Outcome {
        self.readings_processed += 1;

        let desired = match classify(reading, classifier) {
            Ok(cmd) => cmd,
            Err(e) => {
                sink.emit(&AppEvent::ClassificationFailed(e));
                return Outcome::Skipped;
            }
        };

        match self.machine.decide(desired, now) {
            Decision::Stable => {
                sink.emit(&AppEvent::Stable(desired));
                Outcome::Stable
            }
            Decision::Debounced { elapsed } => {
                sink.emit(&AppEvent::Debounced {
                    current: self.machine.state().last_command_sent,
                    desired,
                    elapsed,
                });
                Outcome::Debounced
            }
            Decision::Transition { from } => match publisher.publish(desired) {
                Ok(()) => {
                    self.machine.commit(desired, now);
                    self.publishes += 1;
                    sink.emit(&AppEvent::Published { from, to: desired });
                    Outcome::Published(desired)
                }
                Err(error) => {
                    sink.emit(&AppEvent::PublishFailed {
                        command: desired,
                        error,
                    });
                    Outcome::PublishFailed
                }
            },
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Commanded state (`Standby` before the first publish).
    pub fn current(&self) -> Command {
        self.machine.current()
    }

    pub fn state(&self) -> ActuationState {
        self.machine.state()
    }

    pub fn readings_processed(&self) -> u64 {
        self.readings_processed
    }

    pub fn publishes(&self) -> u64 {
        self.publishes
    }
}

fn classify(reading: &SensorReading, classifier: &impl Classifier) -> Result<Command, ClassifierError> {
    let features = Features::from_reading(reading)?;
    let label = classifier.predict(&features)?;
    Command::from_label(label).ok_or(ClassifierError::UnknownLabel(label))
}
