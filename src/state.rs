//! # State of the timer
//! The minutes and seconds being set and which of the two the rotary encoder currently edits.

/// Both fields count modulo this value, as does the rotary encoder
pub const FIELD_MODULUS: u8 = 60;

/// The timer values the user edits. Owned and mutated by the sequencer only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerState {
    /// Minutes, 0-59
    minutes: u8,
    /// Seconds, 0-59
    seconds: u8,
    /// The rotary encoder edits the minutes when true, the seconds otherwise
    editing_minutes: bool,
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerState {
    /// Create a new `TimerState` at 00:00, editing the minutes
    pub const fn new() -> Self {
        Self {
            minutes: 0,
            seconds: 0,
            editing_minutes: true,
        }
    }

    /// Get the minutes
    pub const fn minutes(&self) -> u8 {
        self.minutes
    }

    /// Get the seconds
    pub const fn seconds(&self) -> u8 {
        self.seconds
    }

    /// Whether the rotary encoder edits the minutes
    pub const fn editing_minutes(&self) -> bool {
        self.editing_minutes
    }

    /// The total time set, in seconds
    pub const fn total_seconds(&self) -> u16 {
        self.minutes as u16 * 60 + self.seconds as u16
    }

    /// Back to 00:00, editing the minutes
    pub const fn reset(&mut self) {
        *self = Self::new();
    }

    /// Switch between editing minutes and seconds
    pub const fn toggle_mode(&mut self) {
        self.editing_minutes = !self.editing_minutes;
    }

    /// Assign a rotary encoder value to the field being edited.
    /// The encoder already wraps at 60, anything above is folded back into range.
    pub const fn set_edited_field(&mut self, value: u8) {
        let value = value % FIELD_MODULUS;
        if self.editing_minutes {
            self.minutes = value;
        } else {
            self.seconds = value;
        }
    }
}
