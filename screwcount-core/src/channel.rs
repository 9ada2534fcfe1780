//! Publish/subscribe message channel abstraction
//!
//! The core never talks to a broker directly. It drives an implementation
//! of [`MessageChannel`], which hides the transport (TLS, MQTT framing, a
//! network co-processor, or a test fake).

use heapless::String;

use crate::payload::{payload_from_bytes, Payload};

/// Topic carrying the count target for the next session
pub const TOPIC_COUNT_TARGET: &str = "count-target";
/// Topic that aborts the current session
pub const TOPIC_RESET: &str = "reset";
/// Topic receiving the running count after every pulse
pub const TOPIC_CURRENT_COUNT: &str = "current-count";
/// Topic receiving a completion notice per finished session
pub const TOPIC_SUCCESS: &str = "success";

/// Topics the controller listens on while Ready
pub const COMMAND_TOPICS: [&str; 2] = [TOPIC_COUNT_TARGET, TOPIC_RESET];

/// Maximum topic length accepted from the channel
pub const MAX_TOPIC_LEN: usize = 64;

/// Broker link state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionStatus {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }
}

impl From<bool> for ConnectionStatus {
    fn from(connected: bool) -> Self {
        if connected {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        }
    }
}

/// Meaning of an inbound topic
///
/// Only the first byte of the topic is inspected: anything starting with
/// `c` is a count target and anything starting with `r` is a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TopicKind {
    CountTarget,
    Reset,
    Other,
}

impl TopicKind {
    pub fn classify(topic: &str) -> Self {
        match topic.as_bytes().first() {
            Some(b'c') => TopicKind::CountTarget,
            Some(b'r') => TopicKind::Reset,
            _ => TopicKind::Other,
        }
    }
}

/// A message received from the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    topic: String<MAX_TOPIC_LEN>,
    payload: Payload,
}

impl InboundMessage {
    /// Build a message, truncating the topic and payload to capacity
    pub fn new(topic: &str, payload: &[u8]) -> Self {
        let mut bounded: String<MAX_TOPIC_LEN> = String::new();
        for ch in topic.chars() {
            if bounded.push(ch).is_err() {
                break;
            }
        }
        Self {
            topic: bounded,
            payload: payload_from_bytes(payload),
        }
    }

    pub fn topic(&self) -> &str {
        self.topic.as_str()
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn kind(&self) -> TopicKind {
        TopicKind::classify(self.topic())
    }
}

/// Credentials for a broker connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials<'a> {
    pub uri: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub client_id: &'a str,
    pub keepalive_s: u16,
}

/// Publish/subscribe link to the broker
///
/// None of the operations surface transport errors: a failed connect is
/// `false`, a failed subscribe or publish is silently lost.
#[allow(async_fn_in_trait)]
pub trait MessageChannel {
    /// Attempt to connect, returning whether the link is up afterwards
    ///
    /// May be retried indefinitely by the caller.
    async fn connect(&mut self, credentials: &Credentials<'_>) -> bool;

    /// Current link state
    fn status(&self) -> ConnectionStatus;

    /// Register interest in a topic
    ///
    /// Must be idempotent: subscribing twice has the same effect as once.
    async fn subscribe(&mut self, topic: &str);

    /// Fire-and-forget publish
    async fn publish(&mut self, topic: &str, payload: &[u8]);

    /// Take at most one buffered inbound message without blocking
    fn poll_message(&mut self) -> Option<InboundMessage>;
}
