//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter       | Implements        | Connects to                |
//! |---------------|-------------------|----------------------------|
//! | `mqtt`        | CommandPublisher  | MQTT broker (rumqttc)      |
//! | `log_sink`    | EventSink         | `log` facade               |
//! | `config_file` | ConfigPort        | JSON file on disk          |
//! | `console`     | DisplaySurface    | Terminal (stdout / stdin)  |
//!
//! The `Classifier` port is implemented by
//! [`DecisionForest`](crate::classifier::DecisionForest).

pub mod config_file;
pub mod console;
pub mod log_sink;
pub mod mqtt;
