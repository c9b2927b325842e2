//! Command sink trait
//!
//! A `CommandSink` is whatever can put an encoded command on the wire on a
//! pin's behalf. In practice that is a connected board; tests use a
//! recorder.

use crate::error::Result;

/// Destination for encoded protocol commands
pub trait CommandSink {
    /// Transmit one complete command
    ///
    /// Returns `Error::NotConnected` when there is no open transport.
    fn send_command(&mut self, command: &[u8]) -> Result<()>;
}
