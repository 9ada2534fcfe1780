//! RP2040-specific HAL for the screw counter firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `screwcount-hal` traits:
//!
//! - GPIO inputs for the proximity sensor and the buttons
//! - The board's button pair as a `ButtonSource`

#![no_std]

pub mod gpio;

pub use gpio::{board_buttons, BoardButtons, RpInput};

// Re-export shared traits from screwcount-hal for convenience
pub use screwcount_hal::{ButtonSource, InputPin};
