//! Broker link over the network bridge
//!
//! Implements the core's `MessageChannel` on top of the bridge tasks:
//! commands are encoded into frames for the TX task, and answers arrive
//! through the channels filled by the RX task.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_time::{with_timeout, Duration};
use heapless::{String, Vec};

use screwcount_core::channel::{
    ConnectionStatus, Credentials, InboundMessage, MessageChannel, MAX_TOPIC_LEN,
};
use screwcount_protocol::LinkCommand;

use crate::channels::{BRIDGE_OUT, CONNACK, INBOUND, LINK_UP};

/// Most topics tracked as subscribed per session
const MAX_SUBSCRIPTIONS: usize = 4;

/// `MessageChannel` backed by the bridge UART
pub struct BridgeChannel {
    connect_timeout: Duration,
    /// Topics subscribed since the last accepted connect
    subscribed: Vec<String<MAX_TOPIC_LEN>, MAX_SUBSCRIPTIONS>,
}

impl BridgeChannel {
    pub fn new(connect_timeout_ms: u32) -> Self {
        Self {
            connect_timeout: Duration::from_millis(u64::from(connect_timeout_ms)),
            subscribed: Vec::new(),
        }
    }

    fn is_subscribed(&self, topic: &str) -> bool {
        self.subscribed.iter().any(|t| t.as_str() == topic)
    }

    async fn send(&mut self, cmd: LinkCommand<'_>) {
        match cmd.to_frame() {
            Ok(frame) => BRIDGE_OUT.send(frame).await,
            Err(e) => warn!("Failed to encode bridge command: {:?}", e),
        }
    }
}

impl MessageChannel for BridgeChannel {
    async fn connect(&mut self, credentials: &Credentials<'_>) -> bool {
        CONNACK.reset();
        self.send(LinkCommand::Connect {
            uri: credentials.uri,
            username: credentials.username,
            password: credentials.password,
            client_id: credentials.client_id,
            keepalive_s: credentials.keepalive_s,
        })
        .await;

        let accepted = match with_timeout(self.connect_timeout, CONNACK.wait()).await {
            Ok(accepted) => accepted,
            Err(_) => {
                warn!("Broker connect timed out");
                false
            }
        };

        if accepted {
            info!("Broker connected as {}", credentials.client_id);
            self.subscribed.clear();
        } else {
            debug!("Broker connect refused");
        }
        LINK_UP.store(accepted, Ordering::Release);
        accepted
    }

    fn status(&self) -> ConnectionStatus {
        LINK_UP.load(Ordering::Acquire).into()
    }

    async fn subscribe(&mut self, topic: &str) {
        if self.is_subscribed(topic) {
            return;
        }

        self.send(LinkCommand::Subscribe { topic }).await;

        let mut owned = String::new();
        if owned.push_str(topic).is_err() || self.subscribed.push(owned).is_err() {
            // Untracked topics are re-sent on every request
            warn!("Subscription table full, not tracking {}", topic);
        } else {
            debug!("Subscribed to {}", topic);
        }
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) {
        debug!("Publish {}: {=[u8]:a}", topic, payload);
        self.send(LinkCommand::Publish { topic, payload }).await;
    }

    fn poll_message(&mut self) -> Option<InboundMessage> {
        let msg = INBOUND.try_receive().ok()?;
        debug!("Inbound message on {}", msg.topic());
        Some(msg)
    }
}
