//! Display abstraction and UI layouts for the screw counter
//!
//! This crate provides:
//! - `DisplayBackend` trait for different display types
//! - A character screen buffer that renders to any backend
//! - `UiPresenter`, which lays out a session snapshot on the screen
//!
//! # Architecture
//!
//! The controller never draws directly. Each render request from the
//! session machine is laid out into a [`Screen`]; the screen is then pushed
//! to the display hardware through a [`DisplayBackend`] only when its
//! content changed.
//!
//! On the RP2040 board the display is an external text terminal driven over
//! UART using the screwcount-protocol frames.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod presenter;
pub mod screen;

pub use backend::{DisplayBackend, DisplayError};
pub use presenter::{layout, UiPresenter};
pub use screen::{Screen, SCREEN_COLS, SCREEN_ROWS};
