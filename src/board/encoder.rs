//! # Rotary encoder
//! Decodes the CLK/DT lines of the rotary encoder into the shared position counter. The sequencer never waits for
//! the encoder, it only reads the counter when it polls.
use defmt::{debug, info};
use embassy_futures::select::select;
use embassy_rp::gpio::Input;
use pico_countdown_timer::input::{QuadratureDecoder, RotaryCounter, RotaryPosition};

/// Wait for any edge on either line and feed the levels to the decoder, forever
pub async fn rotary_encoder(mut clk: Input<'static>, mut dt: Input<'static>, counter: &RotaryCounter) {
    let mut decoder = QuadratureDecoder::new(clk.is_high(), dt.is_high());
    info!("rotary encoder started at {}", counter.value());

    loop {
        select(clk.wait_for_any_edge(), dt.wait_for_any_edge()).await;

        if let Some(direction) = decoder.update(clk.is_high(), dt.is_high()) {
            counter.step(direction);
            debug!("rotary encoder {} -> {}", direction, counter.value());
        }
    }
}
