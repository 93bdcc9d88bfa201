//! # Presenter
//! Renders the timer onto a 2 line, 16 character display.
//!
//! Every render builds a complete [`Frame`] first and then clears the display before writing it, the display has no
//! partial update we could rely on.
use crate::error::Error;
use core::fmt::Write;
use heapless::String;

/// Number of character columns of the display
pub const COLUMNS: usize = 16;

/// Number of lines of the display
pub const ROWS: usize = 2;

/// One line of display text
pub type LineText = String<COLUMNS>;

/// The character display as the presenter needs it.
pub trait TextDisplay {
    /// Error reported by the display driver
    type Error: core::fmt::Debug;

    /// Blank the whole display
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Write `text` at the start of line `row`
    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Self::Error>;
}

/// The content of the display after one render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    /// The text per line, unused lines stay empty
    lines: [LineText; ROWS],
}

impl Frame {
    /// Editing screen: `Set Mins:MM:SS` or `Set Secs:MM:SS`
    pub fn editing(minutes: u8, seconds: u8, editing_minutes: bool) -> Self {
        let label = if editing_minutes { "Set Mins" } else { "Set Secs" };
        Self::clock(label, minutes, seconds)
    }

    /// Countdown screen: `T-Minus:MM:SS`
    pub fn countdown(minutes: u8, seconds: u8) -> Self {
        Self::clock("T-Minus", minutes, seconds)
    }

    /// The countdown reached zero
    pub fn expired() -> Self {
        Self::message("TIME'S UP!")
    }

    /// The countdown was cancelled
    pub fn reset() -> Self {
        Self::message("RESET TIMER")
    }

    /// The text of line `row`, empty for rows the display does not have
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", |line| line.as_str())
    }

    /// A label followed by two 2-digit values
    fn clock(label: &str, minutes: u8, seconds: u8) -> Self {
        let mut frame = Self::default();
        // "T-Minus:59:59" is the longest we ever produce at 14 characters, the write cannot overflow
        let _ = write!(frame.lines[0], "{label}:{minutes:02}:{seconds:02}");
        frame
    }

    /// A fixed message on the first line
    fn message(text: &str) -> Self {
        let mut frame = Self::default();
        let _ = frame.lines[0].push_str(text);
        frame
    }
}

/// Owns the display and renders the screens of the timer onto it.
pub struct Presenter<D> {
    /// The character display
    display: D,
}

impl<D: TextDisplay> Presenter<D> {
    /// Create a new `Presenter`
    pub const fn new(display: D) -> Self {
        Self { display }
    }

    /// Show the values being set and which one the rotary encoder edits
    pub fn show_editing(&mut self, minutes: u8, seconds: u8, editing_minutes: bool) -> Result<(), Error> {
        self.render(&Frame::editing(minutes, seconds, editing_minutes))
    }

    /// Show the remaining time of a running countdown
    pub fn show_countdown(&mut self, minutes: u8, seconds: u8) -> Result<(), Error> {
        self.render(&Frame::countdown(minutes, seconds))
    }

    /// Show that the countdown has expired
    pub fn show_expired(&mut self) -> Result<(), Error> {
        self.render(&Frame::expired())
    }

    /// Show that the countdown was cancelled
    pub fn show_reset(&mut self) -> Result<(), Error> {
        self.render(&Frame::reset())
    }

    /// Clear the display and write every line of `frame`
    pub fn render(&mut self, frame: &Frame) -> Result<(), Error> {
        debug!("display: {}", frame.line(0));
        self.display.clear().map_err(|e| display_error(&e))?;
        for (row, line) in (0u8..).zip(frame.lines.iter()) {
            if !line.is_empty() {
                self.display.write_line(row, line).map_err(|e| display_error(&e))?;
            }
        }
        Ok(())
    }
}

/// Log the driver error and turn it into ours
fn display_error<E: core::fmt::Debug>(e: &E) -> Error {
    #[cfg(feature = "defmt")]
    error!("display error: {:?}", defmt::Debug2Format(e));
    #[cfg(not(feature = "defmt"))]
    let _ = e;
    Error::Display
}
