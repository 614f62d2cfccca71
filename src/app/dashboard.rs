//! Dashboard service, consumer side of the hand-off buffer.
//!
//! Two entry points run in different execution contexts:
//!
//! - [`IngestRouter::route`] runs in the network-receive task.  It only
//!   decodes and deposits into the shared [`HandoffBuffer`]; it never
//!   touches the history or the display.
//! - [`DashboardService::tick`] runs on the refresh timer and performs
//!   `read control → drain → append → trim → render`, in that order.
//!
//! Operator actions are applied between ticks via [`DashboardService::apply`].

use std::sync::Arc;

use log::debug;

use crate::handoff::HandoffBuffer;
use crate::telemetry::{self, TelemetryLog};

use super::commands::{Command, OperatorAction};
use super::events::AppEvent;
use super::ports::{CommandPublisher, DashboardView, DisplaySurface, EventSink};

/// Summary of one refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub drained: usize,
    pub evicted: usize,
    pub status: Command,
}

// ───────────────────────────────────────────────────────────────
// Consumer tick + manual override
// ───────────────────────────────────────────────────────────────

pub struct DashboardService {
    buffer: Arc<HandoffBuffer>,
    log: TelemetryLog,
    status: Command,
}

impl DashboardService {
    pub fn new(buffer: Arc<HandoffBuffer>) -> Self {
        let status = buffer.read_control();
        Self {
            buffer,
            log: TelemetryLog::new(),
            status,
        }
    }

    /// One refresh: never renders before draining.
    pub fn tick(&mut self, display: &mut impl DisplaySurface) -> TickReport {
        self.status = self.buffer.read_control();
        let batch = self.buffer.drain();
        let drained = batch.len();
        let evicted = self.log.append_all(batch);
        if drained > 0 {
            debug!("tick: drained {drained}, evicted {evicted}, log={}", self.log.len());
        }

        let readings = self.log.snapshot();
        display.render(&DashboardView {
            status: self.status,
            readings: &readings,
        });

        TickReport {
            drained,
            evicted,
            status: self.status,
        }
    }

    /// Apply one operator action.  Returns `false` when the operator asked
    /// to quit.
    ///
    /// A manual override publishes exactly like the controller does and,
    /// once the transport accepts it, updates the local status without
    /// waiting for the broker echo.  Whichever process publishes last wins.
    pub fn apply(
        &mut self,
        action: OperatorAction,
        publisher: &mut impl CommandPublisher,
        sink: &mut impl EventSink,
    ) -> bool {
        match action {
            OperatorAction::SetCommand(command) => {
                match publisher.publish(command) {
                    Ok(()) => {
                        self.buffer.set_control(command);
                        self.status = command;
                        sink.emit(&AppEvent::OverrideApplied(command));
                    }
                    Err(error) => sink.emit(&AppEvent::PublishFailed { command, error }),
                }
                true
            }
            OperatorAction::MarkAnomaly { index, flagged } => {
                if self.log.mark_anomaly(index, flagged) {
                    sink.emit(&AppEvent::AnomalyMarked { index, flagged });
                } else {
                    sink.emit(&AppEvent::AnnotationRejected {
                        index,
                        len: self.log.len(),
                    });
                }
                true
            }
            OperatorAction::Quit => false,
        }
    }

    /// Status shown on the last render (or set by the last override).
    pub fn status(&self) -> Command {
        self.status
    }

    pub fn log(&self) -> &TelemetryLog {
        &self.log
    }
}

// ───────────────────────────────────────────────────────────────
// Receive-side routing
// ───────────────────────────────────────────────────────────────

/// Routes inbound broker messages into the hand-off buffer.
pub struct IngestRouter {
    data_topic: String,
    control_topic: String,
    buffer: Arc<HandoffBuffer>,
}

impl IngestRouter {
    pub fn new(data_topic: impl Into<String>, control_topic: impl Into<String>, buffer: Arc<HandoffBuffer>) -> Self {
        Self {
            data_topic: data_topic.into(),
            control_topic: control_topic.into(),
            buffer,
        }
    }

    pub fn route(&self, topic: &str, payload: &[u8], sink: &mut impl EventSink) {
        if topic == self.data_topic {
            match telemetry::decode(payload) {
                Ok(reading) => self.buffer.push(reading),
                Err(e) => sink.emit(&AppEvent::ReadingRejected(e)),
            }
        } else if topic == self.control_topic {
            let text = String::from_utf8_lossy(payload);
            match text.parse::<Command>() {
                Ok(command) => self.buffer.set_control(command),
                Err(e) => sink.emit(&AppEvent::UnknownControl(e.0)),
            }
        } else {
            debug!("ignoring message on unsubscribed topic {topic}");
        }
    }
}
