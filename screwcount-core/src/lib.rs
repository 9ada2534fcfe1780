//! Board-agnostic core logic for the screw counter firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Counting session state machine
//! - Sensor pulse detection and button decoding
//! - Message channel abstraction and payload codec
//! - Tick controller with connect retry pacing
//! - Configuration types and parser

#![no_std]
#![deny(unsafe_code)]

pub mod backoff;
pub mod channel;
pub mod config;
pub mod controller;
pub mod input;
pub mod payload;
pub mod sensor;
pub mod session;

pub use controller::{Controller, RenderSink, TickOutcome};
pub use session::{SessionState, SessionStateMachine};
