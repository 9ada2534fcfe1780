//! Display link messages
//!
//! The controller only ever writes to the display. A redraw is a `Clear`
//! followed by one `Text` per non-empty row.

use crate::frame::{Frame, FrameError};

pub const MSG_CLEAR: u8 = 0x20;
pub const MSG_TEXT: u8 = 0x21;

/// Widest text a `Text` frame carries
pub const DISPLAY_COLS: u8 = 21;

/// Controller to display
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMessage<'a> {
    Clear,
    /// `[row][col][len][text]`, text cut to [`DISPLAY_COLS`] bytes
    Text { row: u8, col: u8, text: &'a str },
}

/// Longest prefix of `text` within `max` bytes that ends on a char boundary
fn fit(text: &str, max: usize) -> &str {
    let mut end = text.len().min(max);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

impl DisplayMessage<'_> {
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        let (row, col, text) = match *self {
            DisplayMessage::Clear => return Ok(Frame::empty(MSG_CLEAR)),
            DisplayMessage::Text { row, col, text } => (row, col, text),
        };

        let text = fit(text, usize::from(DISPLAY_COLS));
        let mut buf = [0u8; 3 + DISPLAY_COLS as usize];
        buf[..3].copy_from_slice(&[row, col, text.len() as u8]);
        buf[3..3 + text.len()].copy_from_slice(text.as_bytes());
        Frame::new(MSG_TEXT, &buf[..3 + text.len()])
    }
}
