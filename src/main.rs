//! firmlink - Drive Firmata boards from the host
//!
//! Opens a board over serial (or TCP), identifies its firmware and lets the
//! user set pin modes and digital levels.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use firmlink_serial::{BoardConfig, Connection};
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    let config = BoardConfig {
        baud_rate: cli.baud,
        settle_delay: Duration::from_millis(cli.settle_ms),
        manufacturer_hint: cli.manufacturer.clone(),
        ..BoardConfig::default()
    };

    if let Commands::List = cli.command {
        return commands::list::run_list(&config.manufacturer_hint);
    }

    let connection = Connection::parse(&cli.port)?;
    let mut board = firmlink_serial::open(&connection, config)?;

    match cli.command {
        Commands::List => Ok(()),
        Commands::Info => commands::info::run_info(&board),
        Commands::Mode { pin, mode } => commands::pin::run_mode(&mut board, pin, mode.into()),
        Commands::Write { pin, value } => commands::pin::run_write(&mut board, pin, value.into()),
        Commands::Blink {
            pin,
            interval_ms,
            count,
        } => commands::blink::run_blink(
            &mut board,
            pin,
            Duration::from_millis(interval_ms),
            count,
        ),
    }
}
