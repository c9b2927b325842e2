//! Connection options and board timing

use std::time::Duration;

use firmlink_core::constants::DEFAULT_BAUD_RATE;

/// Manufacturer string reported by genuine Arduino USB bridges
pub const DEFAULT_MANUFACTURER_HINT: &str = "Arduino";

/// Timing and discovery settings for a board session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Serial baud rate
    pub baud_rate: u32,
    /// Pause after opening the transport; the board resets when the port opens
    pub settle_delay: Duration,
    /// Upper bound on waiting for the firmware report
    pub handshake_timeout: Duration,
    /// Substring matched against USB manufacturer strings during discovery
    pub manufacturer_hint: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            settle_delay: Duration::from_secs(4),
            handshake_timeout: Duration::from_secs(2),
            manufacturer_hint: DEFAULT_MANUFACTURER_HINT.to_string(),
        }
    }
}

/// Where to find the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    /// Pick the first port whose manufacturer matches the hint
    Auto,
    /// Serial port connection
    Serial {
        /// Device path (e.g., "/dev/ttyACM0" or "COM3")
        device: String,
        /// Baud rate (None for the configured default)
        baud: Option<u32>,
    },
    /// TCP socket connection
    Tcp {
        /// Hostname or IP address
        host: String,
        /// Port number
        port: u16,
    },
}

impl Connection {
    /// Parse a connection string
    ///
    /// Formats:
    /// - `auto` - Discover the board by USB manufacturer
    /// - `dev=/dev/ttyACM0` - Serial with default baud
    /// - `dev=/dev/ttyACM0:57600` - Serial with specified baud
    /// - `ip=host:port` - TCP connection
    /// - anything else is taken as a bare serial device path
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("Empty connection string".to_string());
        }

        if s == "auto" {
            Ok(Connection::Auto)
        } else if let Some(dev) = s.strip_prefix("dev=") {
            // Serial connection; `COM3` and `/dev/tty*` paths contain no ':'
            if let Some((device, baud_str)) = dev.rsplit_once(':') {
                let baud = baud_str
                    .parse()
                    .map_err(|_| format!("Invalid baud rate: {}", baud_str))?;
                Ok(Connection::Serial {
                    device: device.to_string(),
                    baud: Some(baud),
                })
            } else {
                Ok(Connection::Serial {
                    device: dev.to_string(),
                    baud: None,
                })
            }
        } else if let Some(ip) = s.strip_prefix("ip=") {
            // TCP connection
            let (host, port_str) = ip
                .rsplit_once(':')
                .ok_or_else(|| "Missing port in ip= parameter".to_string())?;
            let port = port_str
                .parse()
                .map_err(|_| format!("Invalid port: {}", port_str))?;
            Ok(Connection::Tcp {
                host: host.to_string(),
                port,
            })
        } else {
            Ok(Connection::Serial {
                device: s.to_string(),
                baud: None,
            })
        }
    }
}
