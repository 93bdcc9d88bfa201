//! Simulated board for driving the sequencer on the host: a clock that only moves when the sequencer waits, buttons
//! and an encoder scripted against that clock, and a display and buzzer that record what they were told.
#![allow(dead_code)]

use core::convert::Infallible;
use core::ops::Range;
use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use pico_countdown_timer::config::AlarmPattern;
use pico_countdown_timer::input::InputSource;
use pico_countdown_timer::presenter::TextDisplay;
use pico_countdown_timer::{Error, Phase, Sequencer, TimerConfig};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Simulated time in nanoseconds
#[derive(Clone, Default)]
pub struct Clock(Rc<Cell<u64>>);

impl Clock {
    pub fn now_ms(&self) -> u64 {
        self.0.get() / 1_000_000
    }
}

/// Delay that advances the simulated clock instead of waiting
pub struct SimDelay(pub Clock);

impl DelayNs for SimDelay {
    async fn delay_ns(&mut self, ns: u32) {
        let clock = &self.0.0;
        clock.set(clock.get() + u64::from(ns));
    }
}

/// Button and encoder behaviour over time, all times in milliseconds
#[derive(Clone, Default)]
pub struct Script {
    pub start: Vec<Range<u64>>,
    pub mode: Vec<Range<u64>>,
    pub reset: Vec<Range<u64>>,
    /// `(from, position)`, the encoder sits at 0 before the first entry
    pub rotary: Vec<(u64, u8)>,
}

/// Inputs answering from a [`Script`]
pub struct ScriptedInputs {
    pub clock: Clock,
    pub script: Script,
}

fn held(windows: &[Range<u64>], now: u64) -> bool {
    windows.iter().any(|window| window.contains(&now))
}

impl InputSource for ScriptedInputs {
    fn read_start(&mut self) -> Result<bool, Error> {
        Ok(held(&self.script.start, self.clock.now_ms()))
    }

    fn read_mode(&mut self) -> Result<bool, Error> {
        Ok(held(&self.script.mode, self.clock.now_ms()))
    }

    fn read_reset(&mut self) -> Result<bool, Error> {
        Ok(held(&self.script.reset, self.clock.now_ms()))
    }

    fn read_rotary(&mut self) -> u8 {
        let now = self.clock.now_ms();
        self.script
            .rotary
            .iter()
            .rev()
            .find(|(from, _)| *from <= now)
            .map_or(0, |(_, position)| *position)
    }
}

/// Display keeping the first line of every frame
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    pub frames: Rc<RefCell<Vec<String>>>,
    pub broken: Rc<Cell<bool>>,
}

impl TextDisplay for RecordingDisplay {
    type Error = &'static str;

    fn clear(&mut self) -> Result<(), Self::Error> {
        if self.broken.get() {
            return Err("i2c nack");
        }
        self.frames.borrow_mut().push(String::new());
        Ok(())
    }

    fn write_line(&mut self, row: u8, text: &str) -> Result<(), Self::Error> {
        if row == 0 {
            if let Some(frame) = self.frames.borrow_mut().last_mut() {
                frame.push_str(text);
            }
        }
        Ok(())
    }
}

/// Buzzer line keeping every level written, with the time it was written at
#[derive(Clone, Default)]
pub struct RecordingBuzzer {
    pub clock: Clock,
    pub levels: Rc<RefCell<Vec<(u64, bool)>>>,
}

impl RecordingBuzzer {
    /// Number of times the (active-low) buzzer was switched on
    pub fn pulses(&self) -> usize {
        self.levels.borrow().iter().filter(|(_, level)| !level).count()
    }
}

impl ErrorType for RecordingBuzzer {
    type Error = Infallible;
}

impl OutputPin for RecordingBuzzer {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push((self.clock.now_ms(), false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.levels.borrow_mut().push((self.clock.now_ms(), true));
        Ok(())
    }
}

/// The default timings, spelled out so the tests do not depend on `config/timer_config.json`
pub fn config() -> TimerConfig {
    TimerConfig {
        poll_interval: Duration::from_millis(50),
        debounce: Duration::from_millis(300),
        tick: Duration::from_secs(1),
        cancel_pause: Duration::from_secs(1),
        alarm: AlarmPattern {
            pulses: 100,
            on: Duration::from_millis(100),
            off: Duration::from_millis(100),
            active_low: true,
        },
    }
}

pub type SimSequencer = Sequencer<ScriptedInputs, RecordingDisplay, RecordingBuzzer, SimDelay>;

/// A sequencer on the simulated board together with handles to inspect it
pub struct Bench {
    pub clock: Clock,
    pub display: RecordingDisplay,
    pub buzzer: RecordingBuzzer,
    pub sequencer: SimSequencer,
}

impl Bench {
    pub fn new(script: Script) -> Self {
        let clock = Clock::default();
        let display = RecordingDisplay::default();
        let buzzer = RecordingBuzzer {
            clock: clock.clone(),
            ..RecordingBuzzer::default()
        };
        let inputs = ScriptedInputs {
            clock: clock.clone(),
            script,
        };
        let sequencer = Sequencer::new(
            inputs,
            display.clone(),
            buzzer.clone(),
            SimDelay(clock.clone()),
            config(),
        )
        .unwrap();
        Self {
            clock,
            display,
            buzzer,
            sequencer,
        }
    }

    pub fn frames(&self) -> Vec<String> {
        self.display.frames.borrow().clone()
    }

    /// Step until `done` holds for the phase just entered, returning every phase entered on the way
    pub fn step_until(&mut self, max_steps: usize, done: impl Fn(Phase) -> bool) -> Vec<Phase> {
        let mut phases = Vec::new();
        for _ in 0..max_steps {
            let phase = embassy_futures::block_on(self.sequencer.step()).unwrap();
            phases.push(phase);
            if done(phase) {
                return phases;
            }
        }
        panic!("no matching phase within {max_steps} steps, went through {phases:?}");
    }

    /// Run exactly `count` steps, returning the phases entered
    pub fn run_steps(&mut self, count: usize) -> Vec<Phase> {
        (0..count)
            .map(|_| embassy_futures::block_on(self.sequencer.step()).unwrap())
            .collect()
    }

    /// Step until the sequencer is back in `Editing` after a reset
    pub fn step_through_cycle(&mut self) -> Vec<Phase> {
        let mut phases = self.step_until(10_000, |phase| phase == Phase::Resetting);
        phases.extend(self.step_until(1, |phase| phase == Phase::Editing));
        phases
    }
}
