//! Network bridge link messages
//!
//! Message types are divided into two categories:
//! - Controller → Bridge: connect, subscribe and publish requests
//! - Bridge → Controller: connect acknowledgements, broker messages and
//!   link loss notices
//!
//! Strings inside payloads are length-prefixed with a single byte.

use heapless::{String, Vec};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};

// Message type IDs: Controller → Bridge
pub const MSG_CONNECT: u8 = 0x40;
pub const MSG_SUBSCRIBE: u8 = 0x41;
pub const MSG_PUBLISH: u8 = 0x42;

// Message type IDs: Bridge → Controller
pub const MSG_CONNACK: u8 = 0x50;
pub const MSG_MESSAGE: u8 = 0x51;
pub const MSG_LINK_DOWN: u8 = 0x52;

/// Longest topic kept from an inbound message
pub const MAX_TOPIC_LEN: usize = 64;

/// Largest broker payload carried by a message
pub const MAX_MESSAGE_PAYLOAD: usize = 1024;

/// Requests from the controller to the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkCommand<'a> {
    /// Open a broker session
    Connect {
        uri: &'a str,
        username: &'a str,
        password: &'a str,
        client_id: &'a str,
        keepalive_s: u16,
    },
    /// Subscribe to a topic
    Subscribe { topic: &'a str },
    /// Publish a payload to a topic
    Publish { topic: &'a str, payload: &'a [u8] },
}

fn push_bytes(payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>, bytes: &[u8]) -> Result<(), FrameError> {
    payload
        .extend_from_slice(bytes)
        .map_err(|_| FrameError::PayloadTooLarge)
}

fn push_prefixed(payload: &mut Vec<u8, MAX_PAYLOAD_SIZE>, text: &str) -> Result<(), FrameError> {
    let len = u8::try_from(text.len()).map_err(|_| FrameError::PayloadTooLarge)?;
    push_bytes(payload, &[len])?;
    push_bytes(payload, text.as_bytes())
}

impl<'a> LinkCommand<'a> {
    /// Encode this command into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let mut payload = Vec::<u8, MAX_PAYLOAD_SIZE>::new();

        match self {
            LinkCommand::Connect {
                uri,
                username,
                password,
                client_id,
                keepalive_s,
            } => {
                // Payload: [keepalive:2][uri][username][password][client_id]
                push_bytes(&mut payload, &keepalive_s.to_le_bytes())?;
                for field in [uri, username, password, client_id] {
                    push_prefixed(&mut payload, field)?;
                }
                Frame::new(MSG_CONNECT, &payload)
            }
            LinkCommand::Subscribe { topic } => Frame::new(MSG_SUBSCRIBE, topic.as_bytes()),
            LinkCommand::Publish {
                topic,
                payload: body,
            } => {
                // Payload: [topic_len][topic][body...]
                push_prefixed(&mut payload, topic)?;
                push_bytes(&mut payload, body)?;
                Frame::new(MSG_PUBLISH, &payload)
            }
        }
    }
}

/// Events reported by the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkEvent {
    /// Answer to a connect request
    ConnAck { accepted: bool },
    /// Message received on a subscribed topic
    Message {
        topic: String<MAX_TOPIC_LEN>,
        payload: Vec<u8, MAX_MESSAGE_PAYLOAD>,
    },
    /// Broker session lost
    LinkDown,
}

impl LinkEvent {
    /// Parse an event from a frame
    ///
    /// Topics and payloads longer than their capacity are truncated.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_CONNACK => {
                let status = frame.payload.first().ok_or(FrameError::InvalidFrame)?;
                Ok(LinkEvent::ConnAck {
                    accepted: *status == 0,
                })
            }
            MSG_MESSAGE => {
                let (&topic_len, rest) = frame
                    .payload
                    .split_first()
                    .ok_or(FrameError::InvalidFrame)?;
                let topic_len = usize::from(topic_len);
                if rest.len() < topic_len {
                    return Err(FrameError::InvalidFrame);
                }
                let (topic_bytes, body) = rest.split_at(topic_len);
                let topic_str =
                    core::str::from_utf8(topic_bytes).map_err(|_| FrameError::InvalidFrame)?;

                let mut topic = String::new();
                for ch in topic_str.chars() {
                    if topic.push(ch).is_err() {
                        break;
                    }
                }
                let mut payload = Vec::new();
                let keep = body.len().min(MAX_MESSAGE_PAYLOAD);
                // Cannot fail: keep is bounded by capacity
                let _ = payload.extend_from_slice(&body[..keep]);

                Ok(LinkEvent::Message { topic, payload })
            }
            MSG_LINK_DOWN => Ok(LinkEvent::LinkDown),
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this event into a frame (for testing or simulation)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            LinkEvent::ConnAck { accepted } => {
                Frame::new(MSG_CONNACK, &[if *accepted { 0 } else { 1 }])
            }
            LinkEvent::Message { topic, payload } => {
                let mut out = Vec::<u8, MAX_PAYLOAD_SIZE>::new();
                push_prefixed(&mut out, topic)?;
                push_bytes(&mut out, payload)?;
                Frame::new(MSG_MESSAGE, &out)
            }
            LinkEvent::LinkDown => Ok(Frame::empty(MSG_LINK_DOWN)),
        }
    }
}
