//! Button input abstraction
//!
//! The fixture exposes its buttons as a single byte code per poll, the way
//! the handheld it was designed around reports them. Decoding the code into
//! a logical action is the core's job; this module only produces the byte.

use crate::gpio::InputPin;

/// Code reported when no button is pressed
pub const BUTTON_CODE_NONE: u8 = 0;
/// Code reported for the start button
pub const BUTTON_CODE_START: u8 = 1;
/// Code reported for the menu button
pub const BUTTON_CODE_MENU: u8 = 4;

/// Source of raw button codes
pub trait ButtonSource {
    /// Poll the buttons, returning the current code
    ///
    /// Returns [`BUTTON_CODE_NONE`] when nothing is pressed. Must not block.
    fn read_code(&mut self) -> u8;
}

impl<T: ButtonSource + ?Sized> ButtonSource for &mut T {
    fn read_code(&mut self) -> u8 {
        (**self).read_code()
    }
}

/// Press-edge detector for one active-low button
#[derive(Debug, Clone, Copy, Default)]
pub struct PressEdge {
    was_down: bool,
}

impl PressEdge {
    pub const fn new() -> Self {
        Self { was_down: false }
    }

    /// Feed the current level; returns `true` only on the poll where the
    /// button goes down
    pub fn sample(&mut self, down: bool) -> bool {
        let pressed = down && !self.was_down;
        self.was_down = down;
        pressed
    }
}

/// Start and menu buttons on two active-low GPIO inputs
///
/// Reports a code only on the press edge, so a held button is seen once.
/// Menu wins if both go down on the same poll.
pub struct PinButtons<S, M> {
    start: S,
    menu: M,
    start_edge: PressEdge,
    menu_edge: PressEdge,
}

impl<S: InputPin, M: InputPin> PinButtons<S, M> {
    pub fn new(start: S, menu: M) -> Self {
        Self {
            start,
            menu,
            start_edge: PressEdge::new(),
            menu_edge: PressEdge::new(),
        }
    }
}

impl<S: InputPin, M: InputPin> ButtonSource for PinButtons<S, M> {
    fn read_code(&mut self) -> u8 {
        let start = self.start_edge.sample(self.start.is_low());
        let menu = self.menu_edge.sample(self.menu.is_low());

        if menu {
            BUTTON_CODE_MENU
        } else if start {
            BUTTON_CODE_START
        } else {
            BUTTON_CODE_NONE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Level<'a>(&'a Cell<bool>);

    impl InputPin for Level<'_> {
        fn is_high(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_press_edge() {
        let mut edge = PressEdge::new();
        assert!(!edge.sample(false));
        assert!(edge.sample(true));
        assert!(!edge.sample(true));
        assert!(!edge.sample(false));
        assert!(edge.sample(true));
    }

    #[test]
    fn test_held_start_reports_once() {
        let start = Cell::new(true);
        let menu = Cell::new(true);
        let mut buttons = PinButtons::new(Level(&start), Level(&menu));

        assert_eq!(buttons.read_code(), BUTTON_CODE_NONE);
        start.set(false);
        assert_eq!(buttons.read_code(), BUTTON_CODE_START);
        assert_eq!(buttons.read_code(), BUTTON_CODE_NONE);
        start.set(true);
        assert_eq!(buttons.read_code(), BUTTON_CODE_NONE);
    }

    #[test]
    fn test_menu_wins_on_same_poll() {
        let start = Cell::new(false);
        let menu = Cell::new(false);
        let mut buttons = PinButtons::new(Level(&start), Level(&menu));

        assert_eq!(buttons.read_code(), BUTTON_CODE_MENU);
        assert_eq!(buttons.read_code(), BUTTON_CODE_NONE);
    }
}
