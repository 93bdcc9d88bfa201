//! # Timer configuration
//! The timing parameters of the timer. The defaults are generated by `build.rs` from `config/timer_config.json`,
//! formatted as follows (every key is optional):
//! ```json
//! {
//!     "poll_interval_ms": 50,
//!     "debounce_ms": 300,
//!     "tick_ms": 1000,
//!     "cancel_pause_ms": 1000,
//!     "alarm_pulses": 100,
//!     "alarm_on_ms": 100,
//!     "alarm_off_ms": 100,
//!     "alarm_active_low": true,
//!     "lcd_address": 39
//! }
//! ```

/// Constants generated from `config/timer_config.json`
mod generated {
    include!(concat!(env!("OUT_DIR"), "/timer_config.rs"));
}

use embassy_time::Duration;

/// I2C address of the LCD backpack
pub const LCD_ADDRESS: u8 = generated::LCD_ADDRESS;

/// Timing parameters, one per sequencer state plus the alarm pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Pause between two input polls while editing
    pub poll_interval: Duration,
    /// Pause after a mode toggle, no input is read during it
    pub debounce: Duration,
    /// Length of one countdown tick
    pub tick: Duration,
    /// How long the reset message stays on the display after a cancelled countdown
    pub cancel_pause: Duration,
    /// The alarm pattern
    pub alarm: AlarmPattern,
}

/// On/off pattern of the buzzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmPattern {
    /// Maximum number of pulses before the alarm gives up on its own
    pub pulses: u16,
    /// Time the buzzer is on per pulse
    pub on: Duration,
    /// Time the buzzer is off per pulse, the buttons are sampled after it
    pub off: Duration,
    /// The buzzer sounds when its line is low, the idle level is high
    pub active_low: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(generated::POLL_INTERVAL_MS),
            debounce: Duration::from_millis(generated::DEBOUNCE_MS),
            tick: Duration::from_millis(generated::TICK_MS),
            cancel_pause: Duration::from_millis(generated::CANCEL_PAUSE_MS),
            alarm: AlarmPattern::default(),
        }
    }
}

impl Default for AlarmPattern {
    fn default() -> Self {
        Self {
            pulses: generated::ALARM_PULSES,
            on: Duration::from_millis(generated::ALARM_ON_MS),
            off: Duration::from_millis(generated::ALARM_OFF_MS),
            active_low: generated::ALARM_ACTIVE_LOW,
        }
    }
}

impl AlarmPattern {
    /// Longest time the pattern can run when nobody presses a button
    pub fn max_duration(&self) -> Duration {
        (self.on + self.off) * u32::from(self.pulses)
    }
}

/// Converts a duration into whole milliseconds for `DelayNs`, saturating at `u32::MAX`.
pub(crate) fn as_delay_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_shipped_configuration() {
        let config = TimerConfig::default();
        assert_eq!(config.poll_interval, Duration::from_millis(50));
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.tick, Duration::from_secs(1));
        assert_eq!(config.cancel_pause, Duration::from_secs(1));
        assert_eq!(config.alarm.pulses, 100);
        assert!(config.alarm.active_low);
        assert_eq!(LCD_ADDRESS, 0x27);
    }

    #[test]
    fn default_alarm_gives_up_after_twenty_seconds() {
        assert_eq!(AlarmPattern::default().max_duration(), Duration::from_secs(20));
    }

    #[test]
    fn delay_conversion_saturates() {
        assert_eq!(as_delay_ms(Duration::from_millis(300)), 300);
        assert_eq!(as_delay_ms(Duration::from_secs(u64::from(u32::MAX))), u32::MAX);
    }
}
