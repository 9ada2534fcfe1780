//! Screwcount Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the counting core consumes. Chip
//! specific crates (currently RP2040) implement them, and host tests
//! implement them with fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  screwcount-core / screwcount-firmware  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  screwcount-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌───────────────────┐
//!           │ screwcount-hal-   │
//!           │     rp2040        │
//!           └───────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::InputPin`] - Digital input (the proximity sensor)
//! - [`buttons::ButtonSource`] - Raw button codes, with [`buttons::PinButtons`]
//!   building them from two GPIO inputs

#![no_std]
#![deny(unsafe_code)]

pub mod buttons;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use buttons::{
    ButtonSource, PinButtons, PressEdge, BUTTON_CODE_MENU, BUTTON_CODE_NONE, BUTTON_CODE_START,
};
pub use gpio::InputPin;
