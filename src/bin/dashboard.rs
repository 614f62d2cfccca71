//! Smart garden dashboard: display and manual override process.
//!
//! ```text
//! ┌────────────────┐ route  ┌───────────────┐ tick (drain → render) ┌────────────┐
//! │ receive task   │───────▶│ HandoffBuffer │◀──────────────────────│ main loop  │
//! │ (MqttSession)  │        └───────────────┘                       │            │
//! └────────────────┘                                                │ apply ◀────┼── stdin thread
//!                                                                   └────────────┘
//! ```
//!
//! The receive task only decodes and deposits.  The main loop owns the
//! history and the display, and publishes operator overrides.  Stdin is read
//! on a detached OS thread so every exit path (broker failure, `quit`,
//! Ctrl-C) ends the process without waiting for another input line.

#![deny(unused_must_use)]

use std::io::BufReader;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use log::{error, info, warn};
use tokio::sync::mpsc;

use smartgarden::adapters::config_file::{JsonFileConfig, load_or_default};
use smartgarden::adapters::console::{ConsoleDisplay, spawn_operator_input};
use smartgarden::adapters::log_sink::LogEventSink;
use smartgarden::adapters::mqtt::MqttSession;
use smartgarden::app::commands::{Command, OperatorAction};
use smartgarden::app::dashboard::{DashboardService, IngestRouter};
use smartgarden::handoff::HandoffBuffer;

const OPERATOR_QUEUE: usize = 8;

/// Session → router until the connection fails for good.
async fn receive_loop(mut session: MqttSession, router: IngestRouter) -> smartgarden::error::Result<()> {
    let mut sink = LogEventSink::new();
    loop {
        let message = session.next_message().await?;
        router.route(&message.topic, &message.payload, &mut sink);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("smart garden dashboard v{}", env!("CARGO_PKG_VERSION"));

    let config = load_or_default(&JsonFileConfig::from_args(std::env::args()))
        .context("loading configuration")?;

    let buffer = Arc::new(HandoffBuffer::new(Command::Standby));

    // ── Receive task ──────────────────────────────────────────
    let session = MqttSession::new(
        &config,
        &config.dashboard_client_id,
        &[config.data_topic.as_str(), config.control_topic.as_str()],
    );
    let client = session.client();
    let mut publisher = session.publisher(&config.control_topic);
    let router = IngestRouter::new(
        config.data_topic.as_str(),
        config.control_topic.as_str(),
        Arc::clone(&buffer),
    );
    let mut receive = tokio::spawn(receive_loop(session, router));

    // ── Operator input thread ─────────────────────────────────
    let (action_tx, mut action_rx) = mpsc::channel::<OperatorAction>(OPERATOR_QUEUE);
    spawn_operator_input(BufReader::new(std::io::stdin()), action_tx)
        .context("starting operator input")?;

    // ── Render loop ───────────────────────────────────────────
    let mut service = DashboardService::new(Arc::clone(&buffer));
    let mut display = ConsoleDisplay::new(std::io::stdout());
    let mut sink = LogEventSink::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(config.refresh_interval_ms));

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let result = loop {
        tokio::select! {
            _ = ticker.tick() => {
                service.tick(&mut display);
            }
            Some(action) = action_rx.recv() => {
                if !service.apply(action, &mut publisher, &mut sink) {
                    info!("operator quit");
                    break Ok(());
                }
                service.tick(&mut display);
            }
            joined = &mut receive => {
                let err = match joined {
                    Ok(Ok(())) => anyhow!("receive task ended"),
                    Ok(Err(e)) => anyhow::Error::new(e).context("broker connection"),
                    Err(e) => anyhow::Error::new(e).context("receive task panicked"),
                };
                error!("{err:#}");
                break Err(err);
            }
            _ = &mut ctrl_c => {
                info!("shutdown requested");
                break Ok(());
            }
        }
    };

    receive.abort();
    if let Err(e) = client.try_disconnect() {
        warn!("mqtt disconnect request failed: {e}");
    }
    result
}
