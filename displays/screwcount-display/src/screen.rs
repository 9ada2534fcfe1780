//! Character screen buffer
//!
//! A [`Screen`] holds the text of every row plus a flag saying whether the
//! physical display still shows something older.

use heapless::String;

use crate::backend::{DisplayBackend, DisplayError};

/// Text rows on the display
pub const SCREEN_ROWS: usize = 8;

/// Characters per row
pub const SCREEN_COLS: usize = 21;

type Row = String<SCREEN_COLS>;

const BLANK: Row = String::new();

/// Full-screen text contents
#[derive(Clone)]
pub struct Screen {
    rows: [Row; SCREEN_ROWS],
    stale: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    /// Blank screen that still needs drawing
    pub const fn new() -> Self {
        Self {
            rows: [BLANK; SCREEN_ROWS],
            stale: true,
        }
    }

    /// Replace one row; text past the last column is cut off
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(slot) = self.rows.get_mut(row) else {
            return;
        };
        slot.clear();
        for c in text.chars() {
            if slot.push(c).is_err() {
                break;
            }
        }
        self.stale = true;
    }

    pub fn get_line(&self, row: usize) -> Option<&str> {
        self.rows.get(row).map(Row::as_str)
    }

    pub fn same_content(&self, other: &Screen) -> bool {
        self.rows == other.rows
    }

    /// Take over `other`'s text if it differs
    ///
    /// Returns whether anything changed; only a change marks the screen
    /// for redraw.
    pub fn update_from(&mut self, other: &Screen) -> bool {
        let changed = !self.same_content(other);
        if changed {
            self.rows.clone_from(&other.rows);
            self.stale = true;
        }
        changed
    }

    pub fn is_dirty(&self) -> bool {
        self.stale
    }

    pub fn mark_clean(&mut self) {
        self.stale = false;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(Row::as_str)
    }

    /// Draw on `backend`: clear, each non-blank row at column 0, flush
    ///
    /// The screen stays dirty if any step fails.
    pub fn render_to<D: DisplayBackend>(&mut self, backend: &mut D) -> Result<(), DisplayError> {
        if !backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }
        let (cols, rows) = backend.dimensions();
        if usize::from(cols) < SCREEN_COLS || usize::from(rows) < SCREEN_ROWS {
            return Err(DisplayError::InvalidCoordinates);
        }

        backend.clear()?;
        for (row, text) in (0u8..).zip(self.rows.iter()) {
            if !text.is_empty() {
                backend.draw_text(row, 0, text)?;
            }
        }
        backend.flush()?;

        self.stale = false;
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        for (row, text) in self.rows.iter().enumerate() {
            if !text.is_empty() {
                defmt::write!(f, "{}:{=str} ", row, text.as_str());
            }
        }
    }
}
