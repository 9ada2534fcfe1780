//! Text display backends
//!
//! A backend receives one screen at a time as a clear, a run of row writes
//! and a final flush. Rows and columns are in character cells.

/// Errors reported by a display backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Row or column outside the character grid
    InvalidCoordinates,
    /// Backend cannot accept draw calls yet
    NotInitialized,
    /// Encoded output does not fit the backend's buffer
    BufferOverflow,
}

/// Character-grid display
pub trait DisplayBackend {
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Write `text` starting at cell (`row`, `col`)
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Finish the current screen
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// Grid size as (columns, rows)
    fn dimensions(&self) -> (u8, u8);

    fn is_ready(&self) -> bool;
}
