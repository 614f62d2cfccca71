//! Telemetry subsystem.
//!
//! ```text
//!  data topic ──▶ decoder ──▶ SensorReading ──▶ HandoffBuffer ──▶ TelemetryLog
//!                                   │
//!                                   └──────────▶ Features ──▶ Classifier
//! ```

pub mod decoder;
pub mod history;
pub mod reading;

pub use decoder::decode;
pub use history::TelemetryLog;
pub use reading::{Features, SensorReading};
