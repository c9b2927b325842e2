//! Protocol constants and the board pin profile
//!
//! Opcodes follow the Firmata wire format. Only the commands firmlink
//! actually emits or parses are listed here.

use core::fmt;

// Command opcodes
/// Start of a system-exclusive frame
pub const SYSEX_START: u8 = 0xF0;
/// End of a system-exclusive frame
pub const SYSEX_END: u8 = 0xF7;
/// Set pin mode (direct command)
pub const SET_PIN_MODE: u8 = 0xF4;
/// Set digital pin value (direct command)
pub const SET_DIGITAL_PIN_VALUE: u8 = 0xF5;
/// Report firmware version and name (sysex opcode)
pub const REPORT_FIRMWARE: u8 = 0x79;

/// Serial line speed the firmware listens at
pub const DEFAULT_BAUD_RATE: u32 = 57_600;

// Board pin profile (ATmega328P, Uno layout)
/// Number of digital pins
pub const DIGITAL_PIN_COUNT: usize = 14;
/// Number of analog input pins
pub const ANALOG_PIN_COUNT: usize = 6;
/// Pins wired to the serial RX/TX lines, never controllable
pub const UNAVAILABLE_DIGITAL_PINS: [u8; 2] = [0, 1];
/// Pins able to raise external interrupts
pub const EXTERNAL_INTERRUPT_PINS: [u8; 2] = [2, 3];
/// Pins with hardware PWM output
pub const PWM_PINS: [u8; 5] = [3, 5, 6, 9, 11];

/// Check whether a pin number is reserved for the serial link
pub fn is_reserved_pin(number: u8) -> bool {
    UNAVAILABLE_DIGITAL_PINS.contains(&number)
}

/// Pin direction / function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Digital input
    Input,
    /// Digital output
    Output,
    /// Analog input
    Analog,
    /// Host-side marker for a pin that cannot be used; never sent
    Unavailable,
}

impl PinMode {
    /// Byte sent on the wire for this mode, `None` for host-only modes
    pub const fn wire_value(self) -> Option<u8> {
        match self {
            Self::Input => Some(0x00),
            Self::Output => Some(0x01),
            Self::Analog => Some(0x02),
            Self::Unavailable => None,
        }
    }

    /// Name as shown in logs and `Pin`'s display form
    pub const fn name(self) -> &'static str {
        match self {
            Self::Input => "INPUT",
            Self::Output => "OUTPUT",
            Self::Analog => "ANALOG",
            Self::Unavailable => "UNAVAILABLE",
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Digital output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinValue {
    /// Logic low (0)
    Low,
    /// Logic high (1)
    High,
}

impl PinValue {
    /// Byte sent on the wire for this level
    pub const fn wire_value(self) -> u8 {
        match self {
            Self::Low => 0,
            Self::High => 1,
        }
    }

    /// The opposite level
    pub const fn toggled(self) -> Self {
        match self {
            Self::Low => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl fmt::Display for PinValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => f.write_str("LOW"),
            Self::High => f.write_str("HIGH"),
        }
    }
}
