//! CLI argument parsing

use clap::{Parser, Subcommand, ValueEnum};
use firmlink_core::{PinMode, PinValue};

#[derive(Parser)]
#[command(name = "firmlink")]
#[command(author, version, about = "Drive Firmata boards over serial", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Board connection: auto, dev=/dev/ttyACM0[:baud], ip=host:port, or a device path
    #[arg(short, long, default_value = "auto", global = true)]
    pub port: String,

    /// Baud rate used when the connection string doesn't give one
    #[arg(long, default_value_t = firmlink_core::constants::DEFAULT_BAUD_RATE, global = true)]
    pub baud: u32,

    /// Milliseconds to wait for the board to reset after opening the port
    #[arg(long, default_value_t = 4000, global = true)]
    pub settle_ms: u64,

    /// USB manufacturer substring used by auto-discovery
    #[arg(long, default_value = "Arduino", global = true)]
    pub manufacturer: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List serial ports and mark the ones that look like a board
    List,

    /// Connect and show firmware and pin information
    Info,

    /// Set a pin's mode
    Mode {
        /// Pin number
        pin: u8,

        /// Mode to set
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Drive a digital pin
    Write {
        /// Pin number
        pin: u8,

        /// Level to write
        #[arg(value_enum)]
        value: LevelArg,
    },

    /// Toggle a digital pin, e.g. the on-board LED
    Blink {
        /// Pin number
        #[arg(default_value_t = 13)]
        pin: u8,

        /// Half-period in milliseconds
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,

        /// Number of on/off cycles (runs forever if not given)
        #[arg(long)]
        count: Option<u64>,
    },
}

/// Pin modes accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    Input,
    Output,
    Analog,
}

impl From<ModeArg> for PinMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Input => PinMode::Input,
            ModeArg::Output => PinMode::Output,
            ModeArg::Analog => PinMode::Analog,
        }
    }
}

/// Output levels accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelArg {
    Low,
    High,
}

impl From<LevelArg> for PinValue {
    fn from(arg: LevelArg) -> Self {
        match arg {
            LevelArg::Low => PinValue::Low,
            LevelArg::High => PinValue::High,
        }
    }
}
