//! # Sequencer
//! The control loop of the timer, written as an explicit state machine.
//!
//! ```text
//!            start               remaining == 0
//! Editing ──────────► Counting ─────────────────► Alarming
//!    ▲  │ reset          │ reset                     │ done / button
//!    │  ▼                ▼                           │
//!    └── Resetting ◄─────┴───────────────────────────┘
//! ```
//!
//! Each call to [`Sequencer::step`] does one unit of work of the current phase and ends with at most one wait of the
//! duration configured for that phase. Inputs are only read between waits, so the time the timer is blind to a button
//! is the wait of the phase it is in: a countdown tick while counting, one pulse while the alarm sounds.
use crate::alarm::AlarmSignal;
use crate::config::{TimerConfig, as_delay_ms};
use crate::error::Error;
use crate::input::{InputSnapshot, InputSource};
use crate::presenter::{Presenter, TextDisplay};
use crate::state::TimerState;
use core::convert::Infallible;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

/// The phases of the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// The user sets minutes and seconds. Initial phase, and where every cycle returns to.
    Editing,
    /// Counting down, `remaining` seconds still to go
    Counting {
        /// Seconds left, including the one about to be displayed
        remaining: u16,
    },
    /// The countdown expired, the buzzer sounds
    Alarming,
    /// Back to 00:00 after a finished or cancelled countdown
    Resetting,
}

impl Phase {
    /// Name of the phase without its data
    pub const fn name(self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Counting { .. } => "Counting",
            Self::Alarming => "Alarming",
            Self::Resetting => "Resetting",
        }
    }
}

/// Owns the timer state and all peripherals and runs the timer on them.
pub struct Sequencer<I, D, B, T> {
    /// Buttons and rotary encoder
    inputs: I,
    /// The character display
    presenter: Presenter<D>,
    /// The buzzer
    alarm: AlarmSignal<B>,
    /// Source of all waits
    delay: T,
    /// Timing parameters
    config: TimerConfig,
    /// The values being set
    state: TimerState,
    /// Where in the cycle we are
    phase: Phase,
    /// The inputs as read by the previous poll, to find button presses and rotary movement
    last_input: InputSnapshot,
}

impl<I, D, B, T> Sequencer<I, D, B, T>
where
    I: InputSource,
    D: TextDisplay,
    B: OutputPin,
    T: DelayNs,
{
    /// Create a new `Sequencer`. The buzzer line is put into its idle level, nothing else is touched until
    /// [`begin`](Self::begin).
    pub fn new(inputs: I, display: D, buzzer: B, delay: T, config: TimerConfig) -> Result<Self, Error> {
        Ok(Self {
            inputs,
            presenter: Presenter::new(display),
            alarm: AlarmSignal::new(buzzer, config.alarm)?,
            delay,
            config,
            state: TimerState::new(),
            phase: Phase::Editing,
            last_input: InputSnapshot::default(),
        })
    }

    /// The current phase
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The values being set
    pub const fn state(&self) -> &TimerState {
        &self.state
    }

    /// Run the timer. Only returns if a peripheral fails.
    pub async fn run(&mut self) -> Result<Infallible, Error> {
        self.begin()?;
        loop {
            self.step().await?;
        }
    }

    /// Show the initial editing screen and take the first input reading. Buttons held at this point count as
    /// pressed only after they were released once.
    pub fn begin(&mut self) -> Result<(), Error> {
        info!("sequencer: begin, config {}", self.config);
        self.phase = Phase::Editing;
        self.last_input = self.inputs.snapshot()?;
        self.show_editing()
    }

    /// Run one unit of work of the current phase, returns the phase that follows
    pub async fn step(&mut self) -> Result<Phase, Error> {
        let next = match self.phase {
            Phase::Editing => self.edit().await?,
            Phase::Counting { remaining } => self.count(remaining).await?,
            Phase::Alarming => self.sound_alarm().await?,
            Phase::Resetting => self.reset()?,
        };
        if next.name() != self.phase.name() {
            info!("sequencer: {} -> {}", self.phase.name(), next.name());
        }
        self.phase = next;
        Ok(next)
    }

    /// One poll while the user sets the timer
    async fn edit(&mut self) -> Result<Phase, Error> {
        let input = self.inputs.snapshot()?;
        let presses = input.presses_since(&self.last_input);
        let moved = input.rotary_change(&self.last_input);
        self.last_input = input;

        if presses.reset {
            return Ok(Phase::Resetting);
        }

        // a turn goes to the field that was edited while it happened, even if mode was pressed in the same poll
        if let Some(value) = moved {
            self.state.set_edited_field(value);
            self.show_editing()?;
        }

        if presses.mode {
            self.state.toggle_mode();
            debug!("editing minutes: {}", self.state.editing_minutes());
            self.show_editing()?;
            self.delay.delay_ms(as_delay_ms(self.config.debounce)).await;
        }

        if presses.start {
            let total = self.state.total_seconds();
            info!("countdown from {} s", total);
            return Ok(Phase::Counting { remaining: total });
        }

        self.delay.delay_ms(as_delay_ms(self.config.poll_interval)).await;
        Ok(Phase::Editing)
    }

    /// One countdown tick
    async fn count(&mut self, remaining: u16) -> Result<Phase, Error> {
        if self.inputs.read_reset()? {
            info!("countdown cancelled with {} s left", remaining);
            self.presenter.show_reset()?;
            self.delay.delay_ms(as_delay_ms(self.config.cancel_pause)).await;
            return Ok(Phase::Resetting);
        }

        let (minutes, seconds) = split_minutes(remaining);
        self.presenter.show_countdown(minutes, seconds)?;

        // the alarm follows the last tick right away
        if remaining == 0 {
            return Ok(Phase::Alarming);
        }

        self.delay.delay_ms(as_delay_ms(self.config.tick)).await;
        Ok(Phase::Counting {
            remaining: remaining - 1,
        })
    }

    /// Tell the user the time is up and sound the buzzer until it gives up or a button stops it
    async fn sound_alarm(&mut self) -> Result<Phase, Error> {
        self.presenter.show_expired()?;
        let inputs = &mut self.inputs;
        let outcome = self
            .alarm
            .sound(&mut self.delay, || Ok(inputs.read_start()? || inputs.read_reset()?))
            .await?;
        debug!("alarm outcome: {}", outcome);
        Ok(Phase::Resetting)
    }

    /// Back to 00:00, editing minutes
    fn reset(&mut self) -> Result<Phase, Error> {
        self.state.reset();
        self.show_editing()?;

        // A button still held from stopping the alarm or cancelling must not count as a new press. The rotary value
        // stays the one last seen while editing, so a turn made during the countdown is picked up by the next poll.
        let rotary = self.last_input.rotary;
        self.last_input = InputSnapshot {
            rotary,
            ..self.inputs.snapshot()?
        };
        Ok(Phase::Editing)
    }

    /// Show the editing screen for the current state
    fn show_editing(&mut self) -> Result<(), Error> {
        self.presenter
            .show_editing(self.state.minutes(), self.state.seconds(), self.state.editing_minutes())
    }
}

/// Split seconds into (minutes, seconds)
fn split_minutes(total: u16) -> (u8, u8) {
    let minutes = u8::try_from(total / 60).unwrap_or(u8::MAX);
    let seconds = u8::try_from(total % 60).unwrap_or(u8::MAX);
    (minutes, seconds)
}
