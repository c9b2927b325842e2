//! Error types for firmlink-core
//!
//! This module provides a no_std compatible error type shared by the codec
//! and the pin state machine.

use core::fmt;

/// Why a received sysex frame could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FramingError {
    /// Fewer bytes than the smallest valid frame
    TooShort {
        /// Number of bytes received
        len: usize,
    },
    /// Frame does not begin with SYSEX_START
    MissingStart,
    /// Sysex opcode is not the one expected
    UnexpectedCommand {
        /// Opcode found after SYSEX_START
        found: u8,
    },
    /// Frame does not end with SYSEX_END
    MissingTerminator,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Pin number is reserved or out of range
    InvalidPin(u8),
    /// Pin has no owning board to transmit through
    Unconfigured(u8),
    /// Board has no open transport
    NotConnected,
    /// Pin mode is a host-side marker with no wire encoding
    UnencodableMode,
    /// Malformed response frame
    Framing(FramingError),
    /// No complete response before the deadline
    Timeout,
    /// Transport failed to carry a command
    TransportFailed,
}

impl fmt::Display for FramingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort { len } => write!(f, "frame too short ({} bytes)", len),
            Self::MissingStart => write!(f, "frame does not start with SYSEX_START"),
            Self::UnexpectedCommand { found } => {
                write!(f, "unexpected sysex command 0x{:02X}", found)
            }
            Self::MissingTerminator => write!(f, "frame is missing SYSEX_END"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPin(n) => write!(f, "pin {} not available", n),
            Self::Unconfigured(n) => write!(f, "pin {} is not attached to a board", n),
            Self::NotConnected => write!(f, "board is not connected"),
            Self::UnencodableMode => write!(f, "pin mode cannot be sent to the board"),
            Self::Framing(e) => write!(f, "framing error: {}", e),
            Self::Timeout => write!(f, "operation timed out"),
            Self::TransportFailed => write!(f, "transport write failed"),
        }
    }
}

impl From<FramingError> for Error {
    fn from(e: FramingError) -> Self {
        Self::Framing(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
