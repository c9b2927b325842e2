//! Error types for board operations

use firmlink_core::{Error as CoreError, FramingError};
use thiserror::Error;

/// Board and transport errors
#[derive(Debug, Error)]
pub enum FirmataError {
    /// Discovery found no usable device
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Operation needs an open transport
    #[error("Board is not connected")]
    NotConnected,

    /// Pin number is reserved or out of range
    #[error("Pin {0} not available")]
    InvalidPin(u8),

    /// Pin has no board to transmit through
    #[error("Pin {0} is not attached to a board")]
    Unconfigured(u8),

    /// Pin mode has no wire encoding
    #[error("Pin mode cannot be sent to the board")]
    UnencodableMode,

    /// Malformed response frame
    #[error("Framing error: {0}")]
    Framing(FramingError),

    /// Timeout during communication
    #[error("Communication timeout")]
    Timeout,

    /// A command could not be written
    #[error("Transport write failed")]
    TransportFailed,

    /// I/O error during communication
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serial port error
    #[error("Serial port error: {0}")]
    SerialError(#[from] serialport::Error),
}

/// Result type for board operations
pub type Result<T> = std::result::Result<T, FirmataError>;

impl From<std::io::Error> for FirmataError {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::TimedOut {
            FirmataError::Timeout
        } else {
            FirmataError::IoError(e.to_string())
        }
    }
}

impl From<CoreError> for FirmataError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidPin(n) => FirmataError::InvalidPin(n),
            CoreError::Unconfigured(n) => FirmataError::Unconfigured(n),
            CoreError::NotConnected => FirmataError::NotConnected,
            CoreError::UnencodableMode => FirmataError::UnencodableMode,
            CoreError::Framing(f) => FirmataError::Framing(f),
            CoreError::Timeout => FirmataError::Timeout,
            CoreError::TransportFailed => FirmataError::TransportFailed,
        }
    }
}
