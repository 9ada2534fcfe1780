//! Screwcount UART protocol
//!
//! The controller talks to two peripherals over UART: a text display and a
//! network bridge (a co-processor that owns Wi-Fi, TLS and the MQTT
//! session). Both links share one binary frame format:
//! ```text
//! ┌───────┬────────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LEN_LO │ LEN_HI │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B     │ 1B   │ 0–1152B     │ 1B       │
//! └───────┴────────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The display is a "dumb terminal" that only draws text. The bridge
//! forwards connect, subscribe and publish requests and reports broker
//! messages back.

#![no_std]
#![deny(unsafe_code)]

pub mod bridge;
pub mod display;
pub mod frame;

pub use bridge::{LinkCommand, LinkEvent};
pub use display::DisplayMessage;
pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_PAYLOAD_SIZE};
