//! GPIO inputs
//!
//! The sensor and both buttons are active-low with the internal pull-up
//! enabled, so an unconnected pin reads as idle.

use embassy_rp::gpio::{Input, Pin, Pull};
use embassy_rp::Peri;
use screwcount_hal::{InputPin, PinButtons};

/// An RP2040 GPIO configured as a pulled-up input
pub struct RpInput<'d> {
    input: Input<'d>,
}

impl<'d> RpInput<'d> {
    /// Configure `pin` as an input with the pull-up enabled
    pub fn pull_up(pin: Peri<'d, impl Pin>) -> Self {
        Self {
            input: Input::new(pin, Pull::Up),
        }
    }
}

impl InputPin for RpInput<'_> {
    fn is_high(&self) -> bool {
        self.input.is_high()
    }
}

/// Start and menu buttons of the fixture
pub type BoardButtons<'d> = PinButtons<RpInput<'d>, RpInput<'d>>;

/// Build the button source from the start and menu pins
pub fn board_buttons<'d>(start: Peri<'d, impl Pin>, menu: Peri<'d, impl Pin>) -> BoardButtons<'d> {
    PinButtons::new(RpInput::pull_up(start), RpInput::pull_up(menu))
}
