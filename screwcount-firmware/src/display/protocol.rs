//! Display backend that encodes draw calls as UART frames

use heapless::Vec;
use screwcount_display::{DisplayBackend, DisplayError, SCREEN_COLS, SCREEN_ROWS};
use screwcount_protocol::DisplayMessage;

/// Room for a clear plus a full screen of text frames
pub const FRAME_BUF_SIZE: usize = 256;

/// Collects encoded display frames into one buffer for a single write
pub struct FrameBackend {
    buf: Vec<u8, FRAME_BUF_SIZE>,
}

impl Default for FrameBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBackend {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Encoded bytes of everything drawn since the last flush
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    fn push(&mut self, msg: DisplayMessage<'_>) -> Result<(), DisplayError> {
        let frame = msg.to_frame().map_err(|_| DisplayError::BufferOverflow)?;
        let start = self.buf.len();
        self.buf
            .resize_default(start + frame.encoded_len())
            .map_err(|_| DisplayError::BufferOverflow)?;
        frame
            .encode(&mut self.buf[start..])
            .map_err(|_| DisplayError::BufferOverflow)?;
        Ok(())
    }
}

impl DisplayBackend for FrameBackend {
    fn clear(&mut self) -> Result<(), DisplayError> {
        self.buf.clear();
        self.push(DisplayMessage::Clear)
    }

    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError> {
        if usize::from(row) >= SCREEN_ROWS || usize::from(col) >= SCREEN_COLS {
            return Err(DisplayError::InvalidCoordinates);
        }
        self.push(DisplayMessage::Text { row, col, text })
    }

    fn flush(&mut self) -> Result<(), DisplayError> {
        // Bytes are written by the display task
        Ok(())
    }

    fn dimensions(&self) -> (u8, u8) {
        (SCREEN_COLS as u8, SCREEN_ROWS as u8)
    }

    fn is_ready(&self) -> bool {
        true
    }
}
