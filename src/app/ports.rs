//! Port traits, the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ActuationService / DashboardService (domain)
//! ```
//!
//! Driven adapters (classifier artifact, MQTT publisher, log output,
//! config file, terminal display) implement these traits.  The services
//! consume them via generics, so the domain core never touches the
//! network or the filesystem directly.

use crate::config::SystemConfig;
use crate::error::{ClassifierError, CommsError, ConfigError};
use crate::telemetry::{Features, SensorReading};

use super::commands::Command;

// ───────────────────────────────────────────────────────────────
// Classifier port (domain → model)
// ───────────────────────────────────────────────────────────────

/// Opaque regime classifier loaded once at startup.
pub trait Classifier {
    /// Predict the class label (`0` = standby, `1` = watering, `2` = alarm).
    fn predict(&self, features: &Features) -> Result<u8, ClassifierError>;
}

// ───────────────────────────────────────────────────────────────
// Command publisher port (domain → control topic)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget retained publish onto the control topic.
///
/// `Ok(())` means the transport accepted the request, not that any
/// subscriber received it.  Implementations never retry.
pub trait CommandPublisher {
    fn publish(&mut self, command: Command) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Display port (domain → presentation surface)
// ───────────────────────────────────────────────────────────────

/// What the dashboard hands to the presentation layer on each tick.
#[derive(Debug, Clone, Copy)]
pub struct DashboardView<'a> {
    /// Current command as last seen on (or sent to) the control topic.
    pub status: Command,
    /// History snapshot, oldest first.
    pub readings: &'a [SensorReading],
}

pub trait DisplaySurface {
    fn render(&mut self, view: &DashboardView<'_>);
}

// ───────────────────────────────────────────────────────────────
// Configuration port
// ───────────────────────────────────────────────────────────────

/// Loads system configuration.
///
/// Implementations MUST validate before returning; invalid values are
/// rejected with [`ConfigError::ValidationFailed`], not clamped.
pub trait ConfigPort {
    /// Returns [`ConfigError::NotFound`] when no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;
}
