//! MQTT broker adapter (rumqttc).
//!
//! [`MqttSession`] owns the event loop: it resubscribes on every ConnAck,
//! surfaces inbound publishes, and retries with capped exponential backoff
//! once the first connection has succeeded.  A failure before the first
//! ConnAck is returned to the caller as fatal.
//!
//! [`MqttPublisher`] implements [`CommandPublisher`] with a non-blocking
//! retained publish onto the control topic.

use core::time::Duration;

use log::{error, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};

use crate::app::commands::Command;
use crate::app::ports::CommandPublisher;
use crate::config::SystemConfig;
use crate::error::CommsError;

/// Depth of the rumqttc request channel shared by client and event loop.
const REQUEST_CAPACITY: usize = 32;

pub fn mqtt_options(config: &SystemConfig, client_id: &str) -> MqttOptions {
    let mut options = MqttOptions::new(client_id, config.broker_host.as_str(), config.broker_port);
    options.set_keep_alive(Duration::from_secs(config.keep_alive_secs));
    options
}

// ---------------------------------------------------------------------------
// Inbound message
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Backoff
// ---------------------------------------------------------------------------

/// Doubling delay, capped at `max`, reset on successful connect.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    current: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            current: initial,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reconnect_initial_ms),
            Duration::from_millis(config.reconnect_max_ms),
        )
    }

    /// Delay to wait now; the following call returns double, up to `max`.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }

    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct MqttSession {
    client: AsyncClient,
    eventloop: EventLoop,
    subscriptions: Vec<String>,
    backoff: Backoff,
    connected_once: bool,
}

impl MqttSession {
    pub fn new(config: &SystemConfig, client_id: &str, subscriptions: &[&str]) -> Self {
        let (client, eventloop) = AsyncClient::new(mqtt_options(config, client_id), REQUEST_CAPACITY);
        info!(
            "mqtt session {client_id} -> {}:{}",
            config.broker_host, config.broker_port
        );
        Self {
            client,
            eventloop,
            subscriptions: subscriptions.iter().map(|s| (*s).to_string()).collect(),
            backoff: Backoff::from_config(config),
            connected_once: false,
        }
    }

    /// Handle for publishing through this session.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }

    pub fn publisher(&self, topic: &str) -> MqttPublisher {
        MqttPublisher::new(self.client(), topic)
    }

    /// Drive the event loop until the next inbound publish.
    pub async fn next_message(&mut self) -> Result<InboundMessage, CommsError> {
        loop {
            match self.eventloop.poll().await {
                Ok(Event::Incoming(Packet::Publish(p))) => {
                    return Ok(InboundMessage {
                        topic: p.topic,
                        payload: p.payload.to_vec(),
                    });
                }
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("mqtt connected");
                    self.connected_once = true;
                    self.backoff.reset();
                    self.subscribe_all()?;
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    warn!("mqtt disconnected by broker");
                }
                Ok(_) => {}
                Err(e) if !self.connected_once => {
                    return Err(CommsError::ConnectFailed(e.to_string()));
                }
                Err(e) => {
                    let delay = self.backoff.next_delay();
                    error!("mqtt connection lost: {e}; retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn subscribe_all(&self) -> Result<(), CommsError> {
        for topic in &self.subscriptions {
            self.client
                .try_subscribe(topic.as_str(), QoS::AtLeastOnce)
                .map_err(|e| CommsError::SubscribeFailed(format!("{topic}: {e}")))?;
            info!("subscribed to {topic}");
        }
        Ok(())
    }

    pub fn disconnect(&self) {
        if let Err(e) = self.client.try_disconnect() {
            warn!("mqtt disconnect request failed: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Retained, fire-and-forget publish onto the control topic.
#[derive(Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
    topic: String,
}

impl MqttPublisher {
    pub fn new(client: AsyncClient, topic: &str) -> Self {
        Self {
            client,
            topic: topic.to_string(),
        }
    }
}

impl CommandPublisher for MqttPublisher {
    fn publish(&mut self, command: Command) -> Result<(), CommsError> {
        self.client
            .try_publish(
                self.topic.as_str(),
                QoS::AtLeastOnce,
                true,
                command.as_wire().as_bytes().to_vec(),
            )
            .map_err(|e| CommsError::PublishFailed(e.to_string()))
    }
}
