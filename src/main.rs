//! Smart garden controller: automatic actuation process.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  MqttSession       MqttPublisher       LogEventSink          │
//! │  (data topic in)   (control topic out) (EventSink)           │
//! │  JsonFileConfig    DecisionForest                            │
//! │  (ConfigPort)      (Classifier)                              │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ───────────────────    │
//! │                                                              │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │        ActuationService (pure logic)                 │    │
//! │  │  decode · classify · debounce · publish              │    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every inbound reading is handled to completion before the next one is
//! polled, so the actuation state is only ever touched from this task.

#![deny(unused_must_use)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{info, warn};

use smartgarden::adapters::config_file::{JsonFileConfig, load_or_default};
use smartgarden::adapters::log_sink::LogEventSink;
use smartgarden::adapters::mqtt::MqttSession;
use smartgarden::app::service::ActuationService;
use smartgarden::classifier::DecisionForest;
use smartgarden::config::SystemConfig;

/// Configuration, then the classifier artifact.  Either failing aborts startup.
fn load_startup() -> smartgarden::error::Result<(SystemConfig, DecisionForest)> {
    let config = load_or_default(&JsonFileConfig::from_args(std::env::args()))?;
    let classifier = DecisionForest::load(&config.model_path)?;
    Ok((config, classifier))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("smart garden controller v{}", env!("CARGO_PKG_VERSION"));

    // ── Configuration + classifier (fatal if missing) ─────────
    let (config, classifier) = load_startup().context("controller startup")?;

    // ── Broker ────────────────────────────────────────────────
    let mut session = MqttSession::new(
        &config,
        &config.controller_client_id,
        &[config.data_topic.as_str()],
    );
    let mut publisher = session.publisher(&config.control_topic);

    let mut sink = LogEventSink::new();
    let mut service = ActuationService::new(Duration::from_secs(config.dwell_secs));
    service.start(&mut sink);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    // ── Main loop ─────────────────────────────────────────────
    loop {
        tokio::select! {
            message = session.next_message() => {
                let message = message.context("broker connection")?;
                if message.topic != config.data_topic {
                    warn!("unexpected message on {}", message.topic);
                    continue;
                }
                service.handle_payload(
                    &message.payload,
                    Instant::now(),
                    &classifier,
                    &mut publisher,
                    &mut sink,
                );
            }
            _ = &mut ctrl_c => {
                info!("shutdown requested");
                break;
            }
        }
    }

    session.disconnect();
    info!(
        "controller stopped: {} readings, {} publishes, last command {}",
        service.readings_processed(),
        service.publishes(),
        service.current()
    );
    Ok(())
}
