//! # Inputs
//! The buttons and the rotary encoder as the sequencer sees them: levels sampled on demand, nothing buffered.
//!
//! The buttons are active-low with pull-ups, a pressed button reads low. The rotary encoder position is a wrapping
//! counter in `[0, 60)`, advanced by whatever decodes the encoder (see [`QuadratureDecoder`]) and only ever observed
//! by polling its current value.
use crate::error::{Error, Line};
use crate::state::FIELD_MODULUS;
use embedded_hal::digital::InputPin;
use portable_atomic::{AtomicU8, Ordering};

/// The inputs read by the sequencer. A `true` button reading means pressed.
pub trait InputSource {
    /// Read the start button
    fn read_start(&mut self) -> Result<bool, Error>;
    /// Read the mode button
    fn read_mode(&mut self) -> Result<bool, Error>;
    /// Read the reset button
    fn read_reset(&mut self) -> Result<bool, Error>;
    /// Read the rotary encoder position, always in `[0, 60)`
    fn read_rotary(&mut self) -> u8;

    /// Read all inputs at once
    fn snapshot(&mut self) -> Result<InputSnapshot, Error> {
        Ok(InputSnapshot {
            rotary: self.read_rotary(),
            start: self.read_start()?,
            mode: self.read_mode()?,
            reset: self.read_reset()?,
        })
    }
}

/// All inputs as read in one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputSnapshot {
    /// Rotary encoder position
    pub rotary: u8,
    /// Start button pressed
    pub start: bool,
    /// Mode button pressed
    pub mode: bool,
    /// Reset button pressed
    pub reset: bool,
}

/// Buttons that went from released to pressed between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Presses {
    /// Start button newly pressed
    pub start: bool,
    /// Mode button newly pressed
    pub mode: bool,
    /// Reset button newly pressed
    pub reset: bool,
}

impl InputSnapshot {
    /// The falling edges of the active-low button lines since `previous`
    pub const fn presses_since(&self, previous: &Self) -> Presses {
        Presses {
            start: self.start && !previous.start,
            mode: self.mode && !previous.mode,
            reset: self.reset && !previous.reset,
        }
    }

    /// The rotary position, if it moved since `previous`
    pub const fn rotary_change(&self, previous: &Self) -> Option<u8> {
        if self.rotary == previous.rotary {
            None
        } else {
            Some(self.rotary)
        }
    }
}

/// Source of the rotary encoder position
pub trait RotaryPosition {
    /// The current position, in `[0, 60)`
    fn value(&self) -> u8;
}

impl<T: RotaryPosition + ?Sized> RotaryPosition for &T {
    fn value(&self) -> u8 {
        (**self).value()
    }
}

/// [`InputSource`] over three active-low button pins and a rotary position source.
pub struct PinInputs<S, M, R, E> {
    /// The start button pin
    start: S,
    /// The mode button pin
    mode: M,
    /// The reset button pin
    reset: R,
    /// The rotary encoder position
    encoder: E,
}

impl<S, M, R, E> PinInputs<S, M, R, E>
where
    S: InputPin,
    M: InputPin,
    R: InputPin,
    E: RotaryPosition,
{
    /// Create a new `PinInputs`
    pub const fn new(start: S, mode: M, reset: R, encoder: E) -> Self {
        Self {
            start,
            mode,
            reset,
            encoder,
        }
    }
}

impl<S, M, R, E> InputSource for PinInputs<S, M, R, E>
where
    S: InputPin,
    M: InputPin,
    R: InputPin,
    E: RotaryPosition,
{
    fn read_start(&mut self) -> Result<bool, Error> {
        self.start.is_low().map_err(|_| Error::Input(Line::Start))
    }

    fn read_mode(&mut self) -> Result<bool, Error> {
        self.mode.is_low().map_err(|_| Error::Input(Line::Mode))
    }

    fn read_reset(&mut self) -> Result<bool, Error> {
        self.reset.is_low().map_err(|_| Error::Input(Line::Reset))
    }

    fn read_rotary(&mut self) -> u8 {
        self.encoder.value() % FIELD_MODULUS
    }
}

/// Wrapping rotary encoder position in `[0, 60)`, shared between the decoder and the sequencer.
///
/// Only the decoder writes it, so plain load/store pairs are enough.
pub struct RotaryCounter {
    /// The current position
    position: AtomicU8,
}

impl Default for RotaryCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl RotaryCounter {
    /// Create a new `RotaryCounter` at position 0
    pub const fn new() -> Self {
        Self {
            position: AtomicU8::new(0),
        }
    }

    /// Apply one detent
    pub fn step(&self, direction: Direction) {
        let current = self.position.load(Ordering::Relaxed);
        let next = match direction {
            Direction::Clockwise => (current + 1) % FIELD_MODULUS,
            Direction::CounterClockwise => (current + FIELD_MODULUS - 1) % FIELD_MODULUS,
        };
        self.position.store(next, Ordering::Relaxed);
    }
}

impl RotaryPosition for RotaryCounter {
    fn value(&self) -> u8 {
        self.position.load(Ordering::Relaxed)
    }
}

/// Direction of one encoder detent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Position increases
    Clockwise,
    /// Position decreases
    CounterClockwise,
}

/// Quadrature decoder states, between two detents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    /// Both lines high, at rest on a detent
    Idle,
    /// A fell first
    CwStep1,
    /// Both low after A fell first
    CwStep2,
    /// B fell first
    CcwStep1,
    /// Both low after B fell first
    CcwStep2,
}

/// Turns the A/B (CLK/DT) levels of a mechanical encoder into detents.
///
/// Clockwise, A leads B: `(1,1) -> (0,1) -> (0,0) -> release`. Counter-clockwise, B leads A:
/// `(1,1) -> (1,0) -> (0,0) -> release`. Falling back to `(1,1)` before both lines were low is bounce and yields
/// nothing.
pub struct QuadratureDecoder {
    /// Where in the cycle we are
    state: DecoderState,
    /// A level seen last
    last_a: bool,
    /// B level seen last
    last_b: bool,
}

impl QuadratureDecoder {
    /// Create a new `QuadratureDecoder` from the current line levels
    pub const fn new(a: bool, b: bool) -> Self {
        Self {
            state: DecoderState::Idle,
            last_a: a,
            last_b: b,
        }
    }

    /// Feed the current levels, returns a direction when a detent completed
    pub const fn update(&mut self, a: bool, b: bool) -> Option<Direction> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;

        match self.state {
            DecoderState::Idle => {
                if !a && b {
                    self.state = DecoderState::CwStep1;
                } else if a && !b {
                    self.state = DecoderState::CcwStep1;
                }
                None
            }
            DecoderState::CwStep1 => {
                if !a && !b {
                    self.state = DecoderState::CwStep2;
                } else if a && b {
                    self.state = DecoderState::Idle;
                }
                None
            }
            DecoderState::CcwStep1 => {
                if !a && !b {
                    self.state = DecoderState::CcwStep2;
                } else if a && b {
                    self.state = DecoderState::Idle;
                }
                None
            }
            DecoderState::CwStep2 => {
                if a || b {
                    self.state = DecoderState::Idle;
                    Some(Direction::Clockwise)
                } else {
                    None
                }
            }
            DecoderState::CcwStep2 => {
                if a || b {
                    self.state = DecoderState::Idle;
                    Some(Direction::CounterClockwise)
                } else {
                    None
                }
            }
        }
    }
}
