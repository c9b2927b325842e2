//! Serial port discovery
//!
//! Finds candidate boards among the host's serial ports by USB manufacturer
//! string. Selection is kept separate from enumeration so it can be tested
//! without hardware.

use serialport::SerialPortType;

use crate::error::{FirmataError, Result};

/// A serial port that might have a board behind it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortCandidate {
    /// Device path (e.g., "/dev/ttyACM0")
    pub device: String,
    /// USB manufacturer string, if the port is a USB device
    pub manufacturer: Option<String>,
    /// USB product string, if the port is a USB device
    pub product: Option<String>,
}

impl PortCandidate {
    fn matches(&self, hint: &str) -> bool {
        self.manufacturer
            .as_deref()
            .is_some_and(|m| m.contains(hint))
    }
}

/// Enumerate every serial port on the host
pub fn list_candidates() -> Result<Vec<PortCandidate>> {
    let ports = serialport::available_ports()?;

    Ok(ports
        .into_iter()
        .map(|info| {
            let (manufacturer, product) = match info.port_type {
                SerialPortType::UsbPort(usb) => (usb.manufacturer, usb.product),
                _ => (None, None),
            };
            PortCandidate {
                device: info.port_name,
                manufacturer,
                product,
            }
        })
        .collect())
}

/// Pick the port to use from a list of candidates
///
/// Only ports whose manufacturer contains `hint` qualify. With several
/// matches the first one wins.
pub fn select_candidate<'a>(ports: &'a [PortCandidate], hint: &str) -> Result<&'a PortCandidate> {
    if ports.is_empty() {
        return Err(FirmataError::DeviceNotFound(
            "No device connected on serial port".to_string(),
        ));
    }

    let mut matching = ports.iter().filter(|p| p.matches(hint));
    let first = matching.next().ok_or_else(|| {
        FirmataError::DeviceNotFound(format!("No {} connected on serial port", hint))
    })?;

    if matching.next().is_some() {
        log::warn!(
            "More than one {} connected, using {}",
            hint,
            first.device
        );
    }

    Ok(first)
}
