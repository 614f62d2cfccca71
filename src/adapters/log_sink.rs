//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the `log`
//! facade.  Policy outcomes go out at `info`, recoverable failures at
//! `warn`, so a suppressed transition never reads like an error.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { dwell } => {
                info!("START | dwell={dwell:?}");
            }
            AppEvent::Published { from, to } => match from {
                Some(from) => info!("PUBLISH | {from} -> {to}"),
                None => info!("PUBLISH | (initial) -> {to}"),
            },
            AppEvent::Stable(command) => {
                info!("STABLE | {command}");
            }
            AppEvent::Debounced {
                current,
                desired,
                elapsed,
            } => {
                let current = current.map_or("(none)", |c| c.as_wire());
                info!(
                    "DEBOUNCE | {current} -> {desired} suppressed, {:.1}s since last change",
                    elapsed.as_secs_f32()
                );
            }
            AppEvent::OverrideApplied(command) => {
                info!("OVERRIDE | operator set {command}");
            }
            AppEvent::AnomalyMarked { index, flagged } => {
                info!("ANNOTATE | entry {index} anomaly={flagged}");
            }
            AppEvent::ReadingRejected(e) => {
                warn!("DECODE | payload discarded: {e}");
            }
            AppEvent::ClassificationFailed(e) => {
                warn!("CLASSIFY | reading skipped: {e}");
            }
            AppEvent::PublishFailed { command, error } => {
                warn!("PUBLISH | {command} not sent: {error}");
            }
            AppEvent::UnknownControl(payload) => {
                warn!("CONTROL | ignoring unknown command {payload:?}");
            }
            AppEvent::AnnotationRejected { index, len } => {
                warn!("ANNOTATE | no entry {index} (history has {len})");
            }
        }
    }
}
