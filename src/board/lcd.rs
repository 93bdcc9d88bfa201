//! # LCD
//! 16x2 HD44780 character display behind a PCF8574 I2C backpack.
use defmt::info;
use embassy_rp::i2c::{Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;
use hd44780_driver::bus::I2CBus;
use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};
use pico_countdown_timer::presenter::TextDisplay;

/// Error reported by the display driver
pub type LcdError = hd44780_driver::error::Error;

/// The I2C bus the display sits on
type LcdBus = I2CBus<I2c<'static, I2C0, Blocking>>;

/// DDRAM address of the first character of the second line
const SECOND_LINE_ADDRESS: u8 = 0x40;

/// The display together with the delay its driver needs for every command
pub struct Lcd {
    /// The HD44780 driver
    driver: HD44780<LcdBus>,
    /// Blocking delay for the command timings
    delay: Delay,
}

impl Lcd {
    /// Create a new `Lcd`, resetting and clearing the display with the cursor hidden
    pub fn new(i2c: I2c<'static, I2C0, Blocking>, address: u8) -> Result<Self, LcdError> {
        let mut delay = Delay;
        let mut driver = HD44780::new_i2c(i2c, address, &mut delay)?;
        driver.reset(&mut delay)?;
        driver.clear(&mut delay)?;
        driver.set_display_mode(
            DisplayMode {
                display: Display::On,
                cursor_visibility: Cursor::Invisible,
                cursor_blink: CursorBlink::Off,
            },
            &mut delay,
        )?;
        info!("display ready at {=u8:#x}", address);
        Ok(Self { driver, delay })
    }
}

impl TextDisplay for Lcd {
    type Error = LcdError;

    fn clear(&mut self) -> Result<(), LcdError> {
        self.driver.clear(&mut self.delay)
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), LcdError> {
        let address = if row == 0 { 0 } else { SECOND_LINE_ADDRESS };
        self.driver.set_cursor_pos(address, &mut self.delay)?;
        self.driver.write_str(text, &mut self.delay)
    }
}
