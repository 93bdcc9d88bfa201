//! # Pico countdown timer
//! Hardware independent core of the countdown timer: the timer state, the input source, the presenter for the
//! character display, the buzzer alarm and the sequencer that ties them together.
//!
//! The firmware binary (`src/main.rs`, feature `firmware`) wires these to the RP2040 peripherals. Without that
//! feature the library builds for the host, which is where the tests run.
#![cfg_attr(not(test), no_std)]

// must stay first, the logging macros are used by all following modules
mod fmt;

pub mod alarm;
pub mod config;
pub mod error;
pub mod input;
pub mod presenter;
pub mod sequencer;
pub mod state;

pub use config::TimerConfig;
pub use error::{Error, Line};
pub use sequencer::{Phase, Sequencer};
pub use state::TimerState;
