//! Digital pin state machine
//!
//! A `Pin` remembers the last mode and level that were successfully sent to
//! the board. Mode and level are independent: each starts unset, and a
//! command goes out only when a setter is given a value different from the
//! recorded one. There is no way back to unset.
//!
//! A pin does not hold on to its board. The board lends itself as a
//! [`CommandSink`] for the duration of a call; passing `None` models a pin
//! that was never attached to a board, and every transmitting call on it
//! fails with `Error::Unconfigured`.

use core::fmt;

use crate::codec;
use crate::command::CommandSink;
use crate::constants::*;
use crate::error::{Error, Result};

/// One controllable digital pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    number: u8,
    mode: Option<PinMode>,
    value: Option<PinValue>,
}

impl Pin {
    /// Create a pin in the unset state
    ///
    /// Fails with `Error::InvalidPin` for the serial RX/TX pins and for
    /// numbers past the last digital pin.
    pub fn new(number: u8) -> Result<Self> {
        if is_reserved_pin(number) || number as usize >= DIGITAL_PIN_COUNT {
            return Err(Error::InvalidPin(number));
        }

        Ok(Self {
            number,
            mode: None,
            value: None,
        })
    }

    /// Pin number
    pub fn number(&self) -> u8 {
        self.number
    }

    /// Last mode sent to the board, `None` if never programmed
    pub fn mode(&self) -> Option<PinMode> {
        self.mode
    }

    /// Last level sent to the board, `None` if never programmed
    pub fn value(&self) -> Option<PinValue> {
        self.value
    }

    /// Whether the pin has hardware PWM
    pub fn supports_pwm(&self) -> bool {
        PWM_PINS.contains(&self.number)
    }

    /// Whether the pin can raise an external interrupt
    pub fn supports_interrupt(&self) -> bool {
        EXTERNAL_INTERRUPT_PINS.contains(&self.number)
    }

    /// Change the pin mode
    ///
    /// Returns `Ok(true)` if a command was sent, `Ok(false)` if the pin was
    /// already in `mode`. The recorded mode only changes once the command
    /// has been handed to the board.
    pub fn set_mode(
        &mut self,
        mode: PinMode,
        board: Option<&mut dyn CommandSink>,
    ) -> Result<bool> {
        if self.mode == Some(mode) {
            log::trace!("pin {}: mode already {}", self.number, mode);
            return Ok(false);
        }

        let board = board.ok_or(Error::Unconfigured(self.number))?;
        let cmd = codec::encode_set_pin_mode(self.number, mode)?;
        board.send_command(&cmd)?;

        log::debug!("pin {}: mode {}", self.number, mode);
        self.mode = Some(mode);
        Ok(true)
    }

    /// Change the digital output level
    ///
    /// Same contract as [`Pin::set_mode`].
    pub fn set_value(
        &mut self,
        value: PinValue,
        board: Option<&mut dyn CommandSink>,
    ) -> Result<bool> {
        if self.value == Some(value) {
            log::trace!("pin {}: value already {}", self.number, value);
            return Ok(false);
        }

        let board = board.ok_or(Error::Unconfigured(self.number))?;
        let cmd = codec::encode_set_digital_value(self.number, value)?;
        board.send_command(&cmd)?;

        log::debug!("pin {}: value {}", self.number, value);
        self.value = Some(value);
        Ok(true)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            Some(mode) => write!(f, "PIN(n={}, m={})", self.number, mode),
            None => write!(f, "PIN(n={}, m=-)", self.number),
        }
    }
}
