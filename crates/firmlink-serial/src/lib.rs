//! firmlink-serial - Board driver over serial and TCP transports
//!
//! This crate drives a microcontroller running Firmata-style firmware: it
//! opens the transport, identifies the firmware, and exposes pin mode and
//! digital output control on top of the `firmlink-core` state model.
//!
//! # Example
//!
//! ```no_run
//! use firmlink_serial::{open_serial, BoardConfig};
//! use firmlink_core::{PinMode, PinValue};
//!
//! let mut board = open_serial("/dev/ttyACM0", BoardConfig::default())?;
//! if let Some(fw) = board.firmware_version() {
//!     println!("Firmware: {}", fw);
//! }
//!
//! board.set_pin_mode(13, PinMode::Output)?;
//! board.write_digital_pin(13, PinValue::High)?;
//! board.delay_ms(500);
//! board.write_digital_pin(13, PinValue::Low)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod board;
pub mod config;
pub mod discovery;
pub mod error;
pub mod transport;

// Re-exports
pub use board::Board;
pub use config::{BoardConfig, Connection};
pub use discovery::PortCandidate;
pub use error::{FirmataError, Result};
pub use transport::serial::SerialTransport;
pub use transport::tcp::TcpTransport;
pub use transport::Transport;

/// Open a board from parsed connection options
///
/// Returns a type-erased transport so serial and TCP boards can be handled
/// alike. Explicit devices that fail to open are an error; `auto` that finds
/// nothing yields a disconnected board, like [`discover`].
pub fn open(connection: &Connection, config: BoardConfig) -> Result<Board<Box<dyn Transport>>> {
    let transport: Box<dyn Transport> = match connection {
        Connection::Auto => {
            let ports = available_candidates();
            return Ok(discover_among(&ports, config, |device, baud| {
                Ok(Box::new(SerialTransport::open(device, baud)?) as Box<dyn Transport>)
            }));
        }
        Connection::Serial { device, baud } => Box::new(SerialTransport::open(
            device,
            baud.unwrap_or(config.baud_rate),
        )?),
        Connection::Tcp { host, port } => Box::new(TcpTransport::connect(host, *port)?),
    };

    Ok(Board::new(Some(transport), config))
}

/// Open a board via serial port
pub fn open_serial(device: &str, config: BoardConfig) -> Result<Board<SerialTransport>> {
    let transport = SerialTransport::open(device, config.baud_rate)?;
    Ok(Board::new(Some(transport), config))
}

/// Open a board via TCP
pub fn open_tcp(host: &str, port: u16, config: BoardConfig) -> Result<Board<TcpTransport>> {
    let transport = TcpTransport::connect(host, port)?;
    Ok(Board::new(Some(transport), config))
}

/// Find the board by USB manufacturer and open it
///
/// Falls back to a disconnected board when nothing is found or the port
/// cannot be opened, so callers can keep running without hardware.
pub fn discover(config: BoardConfig) -> Board<SerialTransport> {
    let ports = available_candidates();
    discover_among(&ports, config, SerialTransport::open)
}

/// Select a board among already enumerated ports and open it with `open`
///
/// Any failure, from selection or from `open`, is logged and leaves the
/// board disconnected.
pub fn discover_among<T, F>(ports: &[PortCandidate], config: BoardConfig, open: F) -> Board<T>
where
    T: Transport,
    F: FnOnce(&str, u32) -> Result<T>,
{
    let opened = discovery::select_candidate(ports, &config.manufacturer_hint).and_then(
        |candidate| {
            log::info!(
                "Found {} on {}",
                candidate.manufacturer.as_deref().unwrap_or("device"),
                candidate.device
            );
            open(&candidate.device, config.baud_rate)
        },
    );

    match opened {
        Ok(transport) => Board::new(Some(transport), config),
        Err(e) => {
            log::error!("Error while looking for a board: {}", e);
            Board::new(None, config)
        }
    }
}

fn available_candidates() -> Vec<PortCandidate> {
    discovery::list_candidates().unwrap_or_else(|e| {
        log::error!("Cannot enumerate serial ports: {}", e);
        Vec::new()
    })
}
