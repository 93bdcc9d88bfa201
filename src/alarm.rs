//! # Alarm
//! Sounds the buzzer when the countdown expires.
//!
//! The buzzer is a plain output line that gets pulsed in a fixed on/off pattern. After every pulse the caller gets a
//! chance to look at the buttons, a press stops the pattern early. The line is idle whenever the alarm is not running.
use crate::config::{AlarmPattern, as_delay_ms};
use crate::error::Error;
use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal_async::delay::DelayNs;

/// How the alarm ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmOutcome {
    /// All pulses of the pattern were played
    Completed,
    /// A button stopped the alarm after this many pulses
    Aborted(u16),
}

impl AlarmOutcome {
    /// Number of pulses that were played
    pub const fn pulses(self, pattern: &AlarmPattern) -> u16 {
        match self {
            Self::Completed => pattern.pulses,
            Self::Aborted(pulses) => pulses,
        }
    }
}

/// The buzzer line and the pattern it is pulsed in.
pub struct AlarmSignal<P> {
    /// The buzzer output line
    pin: P,
    /// The on/off pattern
    pattern: AlarmPattern,
}

impl<P: OutputPin> AlarmSignal<P> {
    /// Create a new `AlarmSignal`, putting the line into its idle level right away
    pub fn new(pin: P, pattern: AlarmPattern) -> Result<Self, Error> {
        let mut alarm = Self { pin, pattern };
        alarm.idle()?;
        Ok(alarm)
    }

    /// The pattern this alarm plays
    pub const fn pattern(&self) -> &AlarmPattern {
        &self.pattern
    }

    /// Silence the buzzer
    pub fn idle(&mut self) -> Result<(), Error> {
        let level = if self.pattern.active_low {
            PinState::High
        } else {
            PinState::Low
        };
        self.pin.set_state(level).map_err(|_| Error::Alarm)
    }

    /// Sound the buzzer
    fn sound_on(&mut self) -> Result<(), Error> {
        let level = if self.pattern.active_low {
            PinState::Low
        } else {
            PinState::High
        };
        self.pin.set_state(level).map_err(|_| Error::Alarm)
    }

    /// Play the pattern. `stop_requested` is asked after every pulse; once it answers `true` the line goes idle and
    /// the alarm returns without playing the remaining pulses.
    pub async fn sound<D, F>(&mut self, delay: &mut D, mut stop_requested: F) -> Result<AlarmOutcome, Error>
    where
        D: DelayNs,
        F: FnMut() -> Result<bool, Error>,
    {
        info!("alarm: up to {} pulses", self.pattern.pulses);
        for pulse in 1..=self.pattern.pulses {
            self.sound_on()?;
            delay.delay_ms(as_delay_ms(self.pattern.on)).await;
            self.idle()?;
            delay.delay_ms(as_delay_ms(self.pattern.off)).await;

            if stop_requested()? {
                self.idle()?;
                info!("alarm: stopped by button after {} pulses", pulse);
                return Ok(AlarmOutcome::Aborted(pulse));
            }
        }
        self.idle()?;
        info!("alarm: pattern completed");
        Ok(AlarmOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embassy_time::Duration;
    use embedded_hal::digital::ErrorType;

    /// Output pin remembering every level written to it
    #[derive(Default)]
    struct Recorder {
        levels: Vec<bool>,
    }

    impl ErrorType for Recorder {
        type Error = Infallible;
    }

    impl OutputPin for Recorder {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.push(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.push(true);
            Ok(())
        }
    }

    /// Delay that only adds up the time it was asked to wait
    #[derive(Default)]
    struct Elapsed {
        ns: u64,
    }

    impl DelayNs for Elapsed {
        async fn delay_ns(&mut self, ns: u32) {
            self.ns += u64::from(ns);
        }
    }

    fn pattern() -> AlarmPattern {
        AlarmPattern {
            pulses: 100,
            on: Duration::from_millis(100),
            off: Duration::from_millis(100),
            active_low: true,
        }
    }

    #[test]
    fn starts_idle() {
        let alarm = AlarmSignal::new(Recorder::default(), pattern()).unwrap();
        assert_eq!(alarm.pin.levels, [true]);
    }

    #[test]
    fn runs_the_full_pattern_without_buttons() {
        let mut alarm = AlarmSignal::new(Recorder::default(), pattern()).unwrap();
        let mut delay = Elapsed::default();
        let mut checks = 0;

        let outcome = block_on(alarm.sound(&mut delay, || {
            checks += 1;
            Ok(false)
        }))
        .unwrap();

        assert_eq!(outcome, AlarmOutcome::Completed);
        assert_eq!(outcome.pulses(alarm.pattern()), 100);
        assert_eq!(checks, 100);
        assert_eq!(delay.ns, 20_000_000_000);
        let sounding = alarm.pin.levels.iter().filter(|&&level| !level).count();
        assert_eq!(sounding, 100);
        assert_eq!(alarm.pin.levels.last(), Some(&true));
    }

    #[test]
    fn first_checkpoint_press_stops_after_one_pulse() {
        let mut alarm = AlarmSignal::new(Recorder::default(), pattern()).unwrap();
        let mut delay = Elapsed::default();

        let outcome = block_on(alarm.sound(&mut delay, || Ok(true))).unwrap();

        assert_eq!(outcome, AlarmOutcome::Aborted(1));
        assert_eq!(delay.ns, 200_000_000);
        // idle, on, idle, forced idle
        assert_eq!(alarm.pin.levels, [true, false, true, true]);
    }

    #[test]
    fn active_high_buzzer_idles_low() {
        let pattern = AlarmPattern {
            pulses: 2,
            active_low: false,
            ..pattern()
        };
        let mut alarm = AlarmSignal::new(Recorder::default(), pattern).unwrap();
        let mut delay = Elapsed::default();
        block_on(alarm.sound(&mut delay, || Ok(false))).unwrap();
        assert_eq!(alarm.pin.levels, [false, true, false, true, false, false]);
    }

    #[test]
    fn input_errors_end_the_alarm() {
        let mut alarm = AlarmSignal::new(Recorder::default(), pattern()).unwrap();
        let mut delay = Elapsed::default();
        let result = block_on(alarm.sound(&mut delay, || Err(Error::Input(crate::Line::Start))));
        assert_eq!(result, Err(Error::Input(crate::Line::Start)));
    }
}
