//! This build script generates the timer configuration constants from
//! `config/timer_config.json` and, for the firmware build, copies the
//! `memory.x` file from the crate root into a directory where the linker can
//! always find it at build time.
//!
//! Cargo re-runs this script whenever `memory.x` or the configuration file
//! changes, so edits to either end up in the next build.

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::print_stdout)]

use serde::Deserialize;
use std::{
    env, fs,
    fs::File,
    io,
    io::Write,
    path::{Path, PathBuf},
};

/// Mirror of `config/timer_config.json`. Every key is optional, missing keys
/// keep their default.
#[derive(Deserialize)]
#[serde(default)]
struct TimerConfigFile {
    /// Pause between two input polls while editing
    poll_interval_ms: u64,
    /// Pause after a mode toggle so one press toggles once
    debounce_ms: u64,
    /// Length of one countdown tick
    tick_ms: u64,
    /// How long the reset message stays up after a cancelled countdown
    cancel_pause_ms: u64,
    /// Maximum number of buzzer pulses
    alarm_pulses: u16,
    /// Buzzer on time per pulse
    alarm_on_ms: u64,
    /// Buzzer off time per pulse
    alarm_off_ms: u64,
    /// Whether the buzzer sounds when its line is driven low
    alarm_active_low: bool,
    /// I2C address of the LCD backpack
    lcd_address: u8,
}

impl Default for TimerConfigFile {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            debounce_ms: 300,
            tick_ms: 1000,
            cancel_pause_ms: 1000,
            alarm_pulses: 100,
            alarm_on_ms: 100,
            alarm_off_ms: 100,
            alarm_active_low: true,
            lcd_address: 0x27,
        }
    }
}

fn main() {
    println!("in build.rs");
    timer_config().unwrap();
    if env::var_os("CARGO_FEATURE_FIRMWARE").is_some() {
        memory_x();
    }
}

/// Generate `timer_config.rs` from `config/timer_config.json`
fn timer_config() -> io::Result<()> {
    println!("in timer_config");

    let out_dir = env::var("OUT_DIR").expect("OUT_DIR environment variable not set");
    let dest_path = Path::new(&out_dir).join("timer_config.rs");
    let mut f = File::create(dest_path).expect("Could not create timer_config.rs file");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR environment variable not set");
    let config_path = Path::new(&manifest_dir).join("config/timer_config.json");
    println!("cargo:rerun-if-changed={}", config_path.display());

    let config: TimerConfigFile = if config_path.exists() {
        let contents = fs::read_to_string(&config_path).expect("Could not read timer_config.json file");
        serde_json::from_str(&contents).expect("Could not parse timer_config.json file")
    } else {
        println!("timer_config.json not found, using defaults");
        TimerConfigFile::default()
    };

    writeln!(f, "pub const POLL_INTERVAL_MS: u64 = {};", config.poll_interval_ms)?;
    writeln!(f, "pub const DEBOUNCE_MS: u64 = {};", config.debounce_ms)?;
    writeln!(f, "pub const TICK_MS: u64 = {};", config.tick_ms)?;
    writeln!(f, "pub const CANCEL_PAUSE_MS: u64 = {};", config.cancel_pause_ms)?;
    writeln!(f, "pub const ALARM_PULSES: u16 = {};", config.alarm_pulses)?;
    writeln!(f, "pub const ALARM_ON_MS: u64 = {};", config.alarm_on_ms)?;
    writeln!(f, "pub const ALARM_OFF_MS: u64 = {};", config.alarm_off_ms)?;
    writeln!(f, "pub const ALARM_ACTIVE_LOW: bool = {};", config.alarm_active_low)?;
    writeln!(f, "pub const LCD_ADDRESS: u8 = {:#04x};", config.lcd_address)?;
    Ok(())
}

/// Handle the `memory.x` linker script
fn memory_x() {
    println!("in memory_x");
    // Put `memory.x` in our output directory and ensure it's
    // on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
    File::create(out.join("memory.x"))
        .unwrap()
        .write_all(include_bytes!("memory.x"))
        .unwrap();
    println!("cargo:rustc-link-search={}", out.display());
    println!("cargo:rerun-if-changed=memory.x");

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
