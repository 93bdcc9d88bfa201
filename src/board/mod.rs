//! # Board
//! The RP2040 side of the timer: which pin does what, and the adapters that turn the embassy peripherals into what
//! the sequencer expects.
//!
//! | Function           | Pin            |
//! |--------------------|----------------|
//! | LCD I2C0 SCL / SDA | GPIO13 / GPIO12 |
//! | Encoder CLK / DT   | GPIO14 / GPIO15 |
//! | Start button       | GPIO20         |
//! | Mode button        | GPIO21         |
//! | Reset button       | GPIO22         |
//! | Buzzer             | GPIO16         |
//!
//! All buttons and the encoder lines use the internal pull-ups and pull to ground when active.
pub mod encoder;
pub mod lcd;

use crate::board::lcd::{Lcd, LcdError};
use defmt::info;
use embassy_rp::Peripherals;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use pico_countdown_timer::config::LCD_ADDRESS;

/// I2C bus speed of the LCD backpack, the PCF8574 is specified up to 100 kHz
const LCD_I2C_FREQUENCY: u32 = 100_000;

/// The peripherals of the timer, set up and ready to use
pub struct Board {
    /// The character display
    pub lcd: Lcd,
    /// Encoder CLK (A) line
    pub encoder_clk: Input<'static>,
    /// Encoder DT (B) line
    pub encoder_dt: Input<'static>,
    /// Start button
    pub start: Input<'static>,
    /// Mode button
    pub mode: Input<'static>,
    /// Reset button
    pub reset: Input<'static>,
    /// Buzzer line, starts silent
    pub buzzer: Output<'static>,
}

impl Board {
    /// Take the pins the timer uses out of `p` and set them up. Fails only if the display does not respond.
    pub fn init(p: Peripherals) -> Result<Self, LcdError> {
        info!("init buttons");
        let start = Input::new(p.PIN_20, Pull::Up);
        let mode = Input::new(p.PIN_21, Pull::Up);
        let reset = Input::new(p.PIN_22, Pull::Up);

        info!("init rotary encoder");
        let encoder_clk = Input::new(p.PIN_14, Pull::Up);
        let encoder_dt = Input::new(p.PIN_15, Pull::Up);

        info!("init buzzer");
        // the buzzer module sounds on low, keep it high until the alarm takes over
        let buzzer = Output::new(p.PIN_16, Level::High);

        info!("init display");
        let mut config = i2c::Config::default();
        config.frequency = LCD_I2C_FREQUENCY;
        let i2c = I2c::new_blocking(p.I2C0, p.PIN_13, p.PIN_12, config);
        let lcd = Lcd::new(i2c, LCD_ADDRESS)?;

        Ok(Self {
            lcd,
            encoder_clk,
            encoder_dt,
            start,
            mode,
            reset,
            buzzer,
        })
    }
}
