//! System configuration parameters
//!
//! All tunable parameters for both smart garden processes.
//! Values can be overridden by a JSON file loaded through the
//! [`ConfigPort`](crate::app::ports::ConfigPort).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of readings kept in the dashboard history.
pub const TELEMETRY_LOG_CAP: usize = 100;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Broker ---
    /// MQTT broker hostname
    pub broker_host: String,
    /// MQTT broker TCP port
    pub broker_port: u16,
    /// MQTT keep-alive interval (seconds)
    pub keep_alive_secs: u64,
    /// Client id used by the automatic controller
    pub controller_client_id: String,
    /// Client id used by the dashboard
    pub dashboard_client_id: String,

    // --- Topics ---
    /// Sensor node -> world telemetry topic
    pub data_topic: String,
    /// Retained command topic
    pub control_topic: String,

    // --- Controller ---
    /// Path to the classifier artifact
    pub model_path: String,
    /// Minimum dwell between published transitions (seconds, inclusive)
    pub dwell_secs: u64,

    // --- Dashboard ---
    /// Drain/render tick period (milliseconds)
    pub refresh_interval_ms: u64,

    // --- Reconnect ---
    /// First reconnect delay after losing the broker (milliseconds)
    pub reconnect_initial_ms: u64,
    /// Upper bound for the doubling reconnect delay (milliseconds)
    pub reconnect_max_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Broker
            broker_host: "broker.hivemq.com".to_string(),
            broker_port: 1883,
            keep_alive_secs: 60,
            controller_client_id: "smartgarden-controller".to_string(),
            dashboard_client_id: "smartgarden-dashboard".to_string(),

            // Topics
            data_topic: "iot/sensor/tralalilo_trolia/data".to_string(),
            control_topic: "iot/sensor/tralalilo_trolia/control".to_string(),

            // Controller
            model_path: "models/smart_garden_model.json".to_string(),
            dwell_secs: 2,

            // Dashboard
            refresh_interval_ms: 2000,

            // Reconnect
            reconnect_initial_ms: 500,
            reconnect_max_ms: 30_000,
        }
    }
}

impl SystemConfig {
    /// Reject values that would make either process misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.broker_host.trim().is_empty() {
            return Err(ConfigError::ValidationFailed("broker_host is empty"));
        }
        if self.broker_port == 0 {
            return Err(ConfigError::ValidationFailed("broker_port must be non-zero"));
        }
        if self.keep_alive_secs == 0 {
            return Err(ConfigError::ValidationFailed("keep_alive_secs must be non-zero"));
        }
        if self.data_topic.is_empty() || self.control_topic.is_empty() {
            return Err(ConfigError::ValidationFailed("topics must not be empty"));
        }
        if self.data_topic == self.control_topic {
            return Err(ConfigError::ValidationFailed(
                "data_topic and control_topic must differ",
            ));
        }
        if self.controller_client_id == self.dashboard_client_id {
            return Err(ConfigError::ValidationFailed("client ids must differ"));
        }
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "refresh_interval_ms must be non-zero",
            ));
        }
        if self.reconnect_initial_ms == 0 || self.reconnect_initial_ms > self.reconnect_max_ms {
            return Err(ConfigError::ValidationFailed(
                "reconnect_initial_ms must be in 1..=reconnect_max_ms",
            ));
        }
        Ok(())
    }
}
