// we are in an environment with constrained resources, so we do not use the standard library and we define a different entry point.
#![no_std]
#![no_main]

use crate::board::Board;
use crate::board::encoder::rotary_encoder;
use defmt::{Debug2Format, error, info};
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_time::Delay;
use pico_countdown_timer::input::{PinInputs, RotaryCounter};
use pico_countdown_timer::{Sequencer, TimerConfig};
use {defmt_rtt as _, panic_probe as _}; // global logger and panic handler

mod board;

/// Rotary encoder position, written by the decoder and polled by the sequencer
static ROTARY: RotaryCounter = RotaryCounter::new();

// Entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Program start");

    // Initialize the peripherals for the RP2040
    let p = embassy_rp::init(Default::default());

    let board = match Board::init(p) {
        Ok(board) => board,
        Err(e) => {
            error!("Failed to initialize display: {}", Debug2Format(&e));
            core::panic!("display did not respond");
        }
    };

    let config = TimerConfig::default();
    let inputs = PinInputs::new(board.start, board.mode, board.reset, &ROTARY);
    let mut sequencer = match Sequencer::new(inputs, board.lcd, board.buzzer, Delay, config) {
        Ok(sequencer) => sequencer,
        Err(e) => core::panic!("{}", e),
    };

    // the decoder only returns if the executor is gone, the sequencer only on a peripheral failure
    match select(
        rotary_encoder(board.encoder_clk, board.encoder_dt, &ROTARY),
        sequencer.run(),
    )
    .await
    {
        Either::First(()) => core::panic!("rotary encoder stopped"),
        Either::Second(Err(e)) => {
            error!("timer stopped: {}", e);
            core::panic!("{}", e);
        }
        Either::Second(Ok(never)) => match never {},
    }
}
