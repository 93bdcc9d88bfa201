//! # Errors
//! The only failures the timer knows are peripheral I/O failures. None of them can be recovered from: the display is
//! the only channel to tell the user, and it may be the failing part. They propagate up to the firmware entry point,
//! which logs and panics.
use core::fmt;

/// The input lines of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// The start button
    Start,
    /// The mode button, toggling between minutes and seconds
    Mode,
    /// The reset button
    Reset,
}

/// A peripheral read or write failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Reading an input line failed
    Input(Line),
    /// Writing to the display failed
    Display,
    /// Driving the buzzer line failed
    Alarm,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start button"),
            Self::Mode => f.write_str("mode button"),
            Self::Reset => f.write_str("reset button"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input(line) => write!(f, "failed to read the {line}"),
            Self::Display => f.write_str("failed to write to the display"),
            Self::Alarm => f.write_str("failed to drive the buzzer"),
        }
    }
}

impl core::error::Error for Error {}
