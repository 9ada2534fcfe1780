//! Button decoding
//!
//! Maps raw button codes to the two logical actions the session machine
//! understands.

use screwcount_hal::ButtonSource;
pub use screwcount_hal::BUTTON_CODE_MENU;

/// Logical button action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonAction {
    /// Start (or restart) a session
    Start,
    /// Leave the counter and return to the host menu
    Menu,
}

/// Decode a raw button code
///
/// `0` is no press, the menu code is [`ButtonAction::Menu`], and every
/// other non-zero code is [`ButtonAction::Start`].
pub fn decode(code: u8) -> Option<ButtonAction> {
    match code {
        0 => None,
        BUTTON_CODE_MENU => Some(ButtonAction::Menu),
        _ => Some(ButtonAction::Start),
    }
}

/// Polls a [`ButtonSource`] and decodes its codes
pub struct InputDecoder<B> {
    source: B,
}

impl<B: ButtonSource> InputDecoder<B> {
    pub fn new(source: B) -> Self {
        Self { source }
    }

    /// Read the buttons once and decode the result
    pub fn poll(&mut self) -> Option<ButtonAction> {
        decode(self.source.read_code())
    }
}
