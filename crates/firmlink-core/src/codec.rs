//! Command encoding and response decoding
//!
//! Everything here is pure: byte sequences in, byte sequences out. Direct
//! commands are fixed three-byte arrays; the firmware report travels in a
//! sysex frame.

use crate::constants::*;
use crate::error::{Error, FramingError, Result};

#[cfg(feature = "alloc")]
use alloc::{string::String, vec::Vec};

/// Length of a direct (non-sysex) command
pub const DIRECT_COMMAND_LEN: usize = 3;

/// Smallest decodable firmware report: start, opcode, major, minor, end
pub const MIN_FIRMWARE_REPORT_LEN: usize = 5;

fn check_pin(pin: u8) -> Result<()> {
    if (pin as usize) < DIGITAL_PIN_COUNT {
        Ok(())
    } else {
        Err(Error::InvalidPin(pin))
    }
}

/// Encode a set-pin-mode command: `[0xF4, pin, mode]`
///
/// `PinMode::Unavailable` only exists on the host and is rejected.
pub fn encode_set_pin_mode(pin: u8, mode: PinMode) -> Result<[u8; DIRECT_COMMAND_LEN]> {
    check_pin(pin)?;
    let mode = mode.wire_value().ok_or(Error::UnencodableMode)?;
    Ok([SET_PIN_MODE, pin, mode])
}

/// Encode a set-digital-value command: `[0xF5, pin, value]`
pub fn encode_set_digital_value(pin: u8, value: PinValue) -> Result<[u8; DIRECT_COMMAND_LEN]> {
    check_pin(pin)?;
    Ok([SET_DIGITAL_PIN_VALUE, pin, value.wire_value()])
}

/// Encode the firmware report query: `[0xF0, 0x79, 0xF7]`
pub const fn encode_firmware_report_request() -> [u8; 3] {
    [SYSEX_START, REPORT_FIRMWARE, SYSEX_END]
}

/// Firmware identification reported by the board
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Firmware name (usually the sketch file name)
    pub name: String,
}

#[cfg(feature = "alloc")]
impl core::fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}.{}", self.name, self.major, self.minor)
    }
}

/// Decode a firmware report frame
///
/// Layout: `0xF0, 0x79, <major>, <minor>, <name bytes...>, 0xF7`. Each name
/// byte is one character.
#[cfg(feature = "alloc")]
pub fn decode_firmware_report(raw: &[u8]) -> Result<FirmwareVersion> {
    if raw.len() < MIN_FIRMWARE_REPORT_LEN {
        return Err(FramingError::TooShort { len: raw.len() }.into());
    }
    if raw[raw.len() - 1] != SYSEX_END {
        return Err(FramingError::MissingTerminator.into());
    }
    if raw[0] != SYSEX_START {
        return Err(FramingError::MissingStart.into());
    }
    if raw[1] != REPORT_FIRMWARE {
        return Err(FramingError::UnexpectedCommand { found: raw[1] }.into());
    }

    let name = raw[4..raw.len() - 1].iter().map(|&b| b as char).collect();

    Ok(FirmwareVersion {
        major: raw[2],
        minor: raw[3],
        name,
    })
}

/// Encode a firmware report frame, as the board would send it
///
/// Only ASCII name characters survive the one-byte-per-character layout;
/// anything else is replaced with `?`.
#[cfg(feature = "alloc")]
pub fn encode_firmware_report(version: &FirmwareVersion) -> Vec<u8> {
    let mut frame = Vec::with_capacity(MIN_FIRMWARE_REPORT_LEN + version.name.len());
    frame.push(SYSEX_START);
    frame.push(REPORT_FIRMWARE);
    frame.push(version.major);
    frame.push(version.minor);
    frame.extend(
        version
            .name
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' }),
    );
    frame.push(SYSEX_END);
    frame
}

/// Locate the last sysex frame start in a received buffer
///
/// Boards may emit unsolicited bytes after reset before answering a query;
/// the answer is the frame that ends the buffer.
pub fn last_sysex_frame(raw: &[u8]) -> &[u8] {
    match raw.iter().rposition(|&b| b == SYSEX_START) {
        Some(start) => &raw[start..],
        None => raw,
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_encode_set_pin_mode() {
        assert_eq!(
            encode_set_pin_mode(4, PinMode::Output).unwrap(),
            [0xF4, 4, 1]
        );
        assert_eq!(
            encode_set_pin_mode(13, PinMode::Input).unwrap(),
            [0xF4, 13, 0]
        );
        assert_eq!(
            encode_set_pin_mode(7, PinMode::Analog).unwrap(),
            [0xF4, 7, 2]
        );
    }

    #[test]
    fn test_encode_rejects_unavailable_mode() {
        assert_eq!(
            encode_set_pin_mode(4, PinMode::Unavailable),
            Err(Error::UnencodableMode)
        );
    }

    #[test]
    fn test_encode_rejects_out_of_range_pin() {
        assert_eq!(
            encode_set_pin_mode(14, PinMode::Output),
            Err(Error::InvalidPin(14))
        );
        assert_eq!(
            encode_set_digital_value(200, PinValue::High),
            Err(Error::InvalidPin(200))
        );
    }

    #[test]
    fn test_encode_set_digital_value() {
        assert_eq!(
            encode_set_digital_value(4, PinValue::High).unwrap(),
            [0xF5, 4, 1]
        );
        assert_eq!(
            encode_set_digital_value(4, PinValue::Low).unwrap(),
            [0xF5, 4, 0]
        );
    }

    #[test]
    fn test_encode_firmware_report_request() {
        assert_eq!(encode_firmware_report_request(), [0xF0, 0x79, 0xF7]);
    }

    #[test]
    fn test_decode_firmware_report() {
        let version =
            decode_firmware_report(&[0xF0, 0x79, 0x02, 0x05, 0x41, 0x42, 0xF7]).unwrap();
        assert_eq!(version.major, 2);
        assert_eq!(version.minor, 5);
        assert_eq!(version.name, "AB");
    }

    #[test]
    fn test_decode_empty_name() {
        let version = decode_firmware_report(&[0xF0, 0x79, 0x01, 0x00, 0xF7]).unwrap();
        assert_eq!((version.major, version.minor), (1, 0));
        assert!(version.name.is_empty());
    }

    #[test]
    fn test_decode_missing_terminator() {
        assert_eq!(
            decode_firmware_report(&[0xF0, 0x79, 0x02, 0x05, 0x41, 0x42]),
            Err(Error::Framing(FramingError::MissingTerminator))
        );
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(
            decode_firmware_report(&[0xF0, 0x79, 0xF7]),
            Err(Error::Framing(FramingError::TooShort { len: 3 }))
        );
        assert_eq!(
            decode_firmware_report(&[]),
            Err(Error::Framing(FramingError::TooShort { len: 0 }))
        );
    }

    #[test]
    fn test_decode_bad_header() {
        assert_eq!(
            decode_firmware_report(&[0x00, 0x79, 0x02, 0x05, 0xF7]),
            Err(Error::Framing(FramingError::MissingStart))
        );
        assert_eq!(
            decode_firmware_report(&[0xF0, 0x71, 0x02, 0x05, 0xF7]),
            Err(Error::Framing(FramingError::UnexpectedCommand { found: 0x71 }))
        );
    }

    #[test]
    fn test_firmware_report_round_trip() {
        let version = FirmwareVersion {
            major: 2,
            minor: 5,
            name: "StandardFirmata.ino".to_string(),
        };
        let frame = encode_firmware_report(&version);
        assert_eq!(decode_firmware_report(&frame).unwrap(), version);
    }

    #[test]
    fn test_last_sysex_frame_skips_leading_noise() {
        // Version report (0xF9 2 5) sent by the firmware right after reset
        let raw = [0xF9, 0x02, 0x05, 0xF0, 0x79, 0x02, 0x05, 0x41, 0xF7];
        assert_eq!(
            last_sysex_frame(&raw),
            &[0xF0, 0x79, 0x02, 0x05, 0x41, 0xF7]
        );
        assert_eq!(last_sysex_frame(&[0x01, 0x02]), &[0x01, 0x02]);
    }
}
