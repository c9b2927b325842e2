//! Transport layer abstraction for board communication
//!
//! This module provides a unified interface for serial and TCP transports.
//! Firmata boards are normally reached over USB serial; network-attached
//! firmware (StandardFirmataWiFi and serial-to-TCP bridges) uses TCP.

use std::time::{Duration, Instant};

use crate::error::{FirmataError, Result};

/// Transport trait for reading and writing bytes
pub trait Transport {
    /// Write bytes to the transport
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read with timeout
    ///
    /// Reads up to `buf.len()` bytes, waiting up to `timeout_ms` milliseconds.
    /// Returns the number of bytes read, or 0 if timeout.
    fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize>;

    /// Flush any buffered data
    fn flush(&mut self) -> Result<()>;

    /// Close the underlying channel
    ///
    /// Must tolerate being called on an already closed transport.
    fn close(&mut self);

    /// Read until `terminator` has been received or `timeout` elapses
    ///
    /// The returned bytes include the terminator. Runs out of time with
    /// `FirmataError::Timeout`.
    fn read_until(&mut self, terminator: u8, timeout: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + timeout;
        let mut received = Vec::new();
        let mut byte = [0u8];

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::debug!(
                    "read_until: timed out after {} bytes without 0x{:02X}",
                    received.len(),
                    terminator
                );
                return Err(FirmataError::Timeout);
            }

            let timeout_ms = remaining.as_millis().clamp(1, u32::MAX as u128) as u32;
            if self.read_nonblock(&mut byte, timeout_ms)? == 0 {
                continue;
            }

            received.push(byte[0]);
            if byte[0] == terminator {
                return Ok(received);
            }
        }
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }

    fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
        (**self).read_nonblock(buf, timeout_ms)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn read_until(&mut self, terminator: u8, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read_until(terminator, timeout)
    }
}

pub mod serial {
    //! Serial port transport implementation

    use super::*;
    use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
    use std::io::{Read, Write};

    /// Default I/O timeout for blocking reads and writes
    const IO_TIMEOUT: Duration = Duration::from_secs(1);

    /// Serial port transport
    pub struct SerialTransport {
        port: Option<Box<dyn SerialPort>>,
        device: String,
    }

    impl SerialTransport {
        /// Open a serial port at the given baud rate, 8N1 without flow control
        pub fn open(device: &str, baud_rate: u32) -> Result<Self> {
            let port = serialport::new(device, baud_rate)
                .data_bits(DataBits::Eight)
                .parity(Parity::None)
                .stop_bits(StopBits::One)
                .flow_control(FlowControl::None)
                .timeout(IO_TIMEOUT)
                .open()?;

            log::info!("Opened serial port {} at {} baud", device, baud_rate);

            Ok(Self {
                port: Some(port),
                device: device.to_string(),
            })
        }

        fn port(&mut self) -> Result<&mut Box<dyn SerialPort>> {
            self.port.as_mut().ok_or(FirmataError::NotConnected)
        }
    }

    impl Transport for SerialTransport {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.port()?.write_all(data)?;
            Ok(())
        }

        fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
            let port = self.port()?;

            // Set temporary timeout
            let old_timeout = port.timeout();
            port.set_timeout(Duration::from_millis(timeout_ms as u64))?;

            let result = match port.read(buf) {
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) => Err(FirmataError::from(e)),
            };

            // Restore timeout
            port.set_timeout(old_timeout)?;
            result
        }

        fn flush(&mut self) -> Result<()> {
            self.port()?.flush()?;
            Ok(())
        }

        fn close(&mut self) {
            if self.port.take().is_some() {
                log::info!("Closed serial port {}", self.device);
            }
        }
    }
}

pub mod tcp {
    //! TCP socket transport implementation

    use super::*;
    use std::io::{Read, Write};
    use std::net::{Shutdown, TcpStream};

    /// Default I/O timeout for blocking reads and writes
    const IO_TIMEOUT: Duration = Duration::from_secs(5);

    /// TCP socket transport
    pub struct TcpTransport {
        stream: Option<TcpStream>,
        addr: String,
    }

    impl TcpTransport {
        /// Connect to a network-attached board at the specified host and port
        pub fn connect(host: &str, port: u16) -> Result<Self> {
            let addr = format!("{}:{}", host, port);
            log::info!("Connecting to board at {}", addr);

            let stream = TcpStream::connect(&addr).map_err(|e| {
                FirmataError::DeviceNotFound(format!("Connection to {} failed: {}", addr, e))
            })?;

            // Commands are tiny; don't let Nagle hold them back
            stream.set_nodelay(true)?;
            stream.set_read_timeout(Some(IO_TIMEOUT))?;
            stream.set_write_timeout(Some(IO_TIMEOUT))?;

            log::info!("Connected to board at {}", addr);

            Ok(Self {
                stream: Some(stream),
                addr,
            })
        }

        fn stream(&mut self) -> Result<&mut TcpStream> {
            self.stream.as_mut().ok_or(FirmataError::NotConnected)
        }
    }

    impl Transport for TcpTransport {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.stream()?.write_all(data)?;
            Ok(())
        }

        fn read_nonblock(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
            let Self { stream, addr } = self;
            let stream = stream.as_mut().ok_or(FirmataError::NotConnected)?;

            // Set temporary timeout
            stream.set_read_timeout(Some(Duration::from_millis(timeout_ms as u64)))?;

            let result = match stream.read(buf) {
                // Zero bytes into a non-empty buffer is end of stream
                Ok(0) if !buf.is_empty() => Err(FirmataError::IoError(format!(
                    "Connection closed by {}",
                    addr
                ))),
                Ok(n) => Ok(n),
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(0),
                Err(e) => Err(FirmataError::from(e)),
            };

            // Restore default timeout
            stream.set_read_timeout(Some(IO_TIMEOUT))?;
            result
        }

        fn flush(&mut self) -> Result<()> {
            self.stream()?.flush()?;
            Ok(())
        }

        fn close(&mut self) {
            if let Some(stream) = self.stream.take() {
                let _ = stream.shutdown(Shutdown::Both);
                log::info!("Disconnected from board at {}", self.addr);
            }
        }
    }
}
