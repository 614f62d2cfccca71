//! Outbound application events.
//!
//! The services emit these through the [`EventSink`](super::ports::EventSink)
//! port.  Policy outcomes (stable, debounced, override) and recoverable
//! failures are separate variants so adapters can log them at different
//! levels.

use core::time::Duration;

use super::commands::Command;
use crate::error::{ClassifierError, CommsError, DecodeError};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The controller is ready to process readings.
    Started { dwell: Duration },

    /// A new command was published and is now the commanded state.
    Published { from: Option<Command>, to: Command },

    /// The classifier agrees with the last published command.
    Stable(Command),

    /// A state change was desired but the dwell time has not elapsed.
    Debounced {
        current: Option<Command>,
        desired: Command,
        elapsed: Duration,
    },

    /// A data-topic payload was discarded.
    ReadingRejected(DecodeError),

    /// Feature extraction or prediction failed; the reading was skipped.
    ClassificationFailed(ClassifierError),

    /// The transport refused a publish; state was left unchanged.
    PublishFailed { command: Command, error: CommsError },

    /// The operator published a command from the dashboard.
    OverrideApplied(Command),

    /// A control-topic payload was not a known command.
    UnknownControl(String),

    /// The operator toggled the anomaly flag on a history entry.
    AnomalyMarked { index: usize, flagged: bool },

    /// The operator referenced a history entry that does not exist.
    AnnotationRejected { index: usize, len: usize },
}
