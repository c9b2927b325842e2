//! Board implementation
//!
//! `Board` owns the transport and the digital pins. Pin operations go through
//! the pin state machine, which only transmits on an actual change; the
//! board merely lends its transport to the pin for that one call.

use std::thread;
use std::time::Duration;

use firmlink_core::codec::{self, FirmwareVersion};
use firmlink_core::constants::{DIGITAL_PIN_COUNT, SYSEX_END};
use firmlink_core::{CommandSink, Error as CoreError, Pin, PinMode, PinValue};

use crate::config::BoardConfig;
use crate::error::{FirmataError, Result};
use crate::transport::Transport;

/// A Firmata-speaking microcontroller board
pub struct Board<T: Transport> {
    /// Transport layer, `None` when no device is connected
    transport: Option<T>,
    /// One slot per digital pin; reserved pins stay `None`
    pins: Vec<Option<Pin>>,
    /// Firmware identification from the handshake
    firmware: Option<FirmwareVersion>,
    /// Why the handshake failed, if it did
    handshake_error: Option<FirmataError>,
    config: BoardConfig,
}

impl<T: Transport> Board<T> {
    /// Create a board around an already opened transport
    ///
    /// Without a transport the board starts disconnected and every
    /// transmitting call fails with `NotConnected`. With one, this waits
    /// `config.settle_delay` for the board to come out of reset and then
    /// queries the firmware. A failed query is recorded (see
    /// [`Board::handshake_error`]) but the board stays usable.
    pub fn new(transport: Option<T>, config: BoardConfig) -> Self {
        let pins = (0..DIGITAL_PIN_COUNT as u8)
            .map(|n| Pin::new(n).ok())
            .collect();

        let mut board = Self {
            transport,
            pins,
            firmware: None,
            handshake_error: None,
            config,
        };

        if board.transport.is_none() {
            log::warn!("firmata: No board connected");
            return board;
        }

        if !board.config.settle_delay.is_zero() {
            log::debug!(
                "firmata: Waiting {:?} for the board to settle",
                board.config.settle_delay
            );
            thread::sleep(board.config.settle_delay);
        }

        match board.query_firmware() {
            Ok(version) => {
                log::info!(
                    "firmata: Firmware \"{}\" version {}.{}",
                    version.name,
                    version.major,
                    version.minor
                );
                board.firmware = Some(version);
            }
            Err(e) => {
                log::warn!("firmata: Firmware query failed: {}", e);
                board.handshake_error = Some(e);
            }
        }

        board
    }

    /// Whether a transport is open
    pub fn is_connected(&self) -> bool {
        self.transport.is_some()
    }

    /// Firmware reported during the handshake
    pub fn firmware_version(&self) -> Option<&FirmwareVersion> {
        self.firmware.as_ref()
    }

    /// Handshake failure, if any
    pub fn handshake_error(&self) -> Option<&FirmataError> {
        self.handshake_error.as_ref()
    }

    /// Look up a controllable pin
    pub fn pin(&self, number: u8) -> Result<&Pin> {
        self.pins
            .get(number as usize)
            .and_then(Option::as_ref)
            .ok_or(FirmataError::InvalidPin(number))
    }

    /// All controllable pins in ascending order
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().flatten()
    }

    /// Write raw bytes to the board
    pub fn send_command(&mut self, command: &[u8]) -> Result<()> {
        transmit(&mut self.transport, command)
    }

    /// Set a pin's mode; returns whether a command was sent
    pub fn set_pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<bool> {
        let Self {
            transport, pins, ..
        } = self;
        let slot = pins
            .get_mut(pin as usize)
            .and_then(Option::as_mut)
            .ok_or(FirmataError::InvalidPin(pin))?;

        let mut link = Link::new(transport);
        let sent = slot.set_mode(mode, Some(&mut link));
        link.resolve(sent)
    }

    /// Drive a digital pin; returns whether a command was sent
    pub fn write_digital_pin(&mut self, pin: u8, value: PinValue) -> Result<bool> {
        let Self {
            transport, pins, ..
        } = self;
        let slot = pins
            .get_mut(pin as usize)
            .and_then(Option::as_mut)
            .ok_or(FirmataError::InvalidPin(pin))?;

        let mut link = Link::new(transport);
        let sent = slot.set_value(value, Some(&mut link));
        link.resolve(sent)
    }

    /// Block the caller, for pacing output such as blink patterns
    pub fn delay(&self, duration: Duration) {
        thread::sleep(duration);
    }

    /// Block the caller for `ms` milliseconds
    pub fn delay_ms(&self, ms: u64) {
        self.delay(Duration::from_millis(ms));
    }

    /// Close the transport
    ///
    /// Safe to call any number of times; only the first call on a connected
    /// board touches the transport. Also runs on drop.
    pub fn shutdown(&mut self) {
        if let Some(mut transport) = self.transport.take() {
            if let Err(e) = transport.flush() {
                log::debug!("firmata: Flush before close failed: {}", e);
            }
            transport.close();
            log::debug!("firmata: Transport closed");
        }
    }

    /// Send the firmware report request and decode the answer
    ///
    /// Reading stops at the first `SYSEX_END`. StandardFirmata announces
    /// itself after reset, so when that report is still pending it is the
    /// one decoded; it carries the same version and name as the reply, which
    /// then stays unread in the input buffer.
    fn query_firmware(&mut self) -> Result<FirmwareVersion> {
        self.send_command(&codec::encode_firmware_report_request())?;

        let timeout = self.config.handshake_timeout;
        let transport = self.transport.as_mut().ok_or(FirmataError::NotConnected)?;
        let raw = transport.read_until(SYSEX_END, timeout)?;
        log::trace!("firmata: Firmware report raw bytes {:02X?}", raw);

        Ok(codec::decode_firmware_report(codec::last_sysex_frame(&raw))?)
    }
}

impl<T: Transport> Drop for Board<T> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<T: Transport> CommandSink for Board<T> {
    fn send_command(&mut self, command: &[u8]) -> firmlink_core::Result<()> {
        Link::new(&mut self.transport).send_command(command)
    }
}

fn transmit<T: Transport>(transport: &mut Option<T>, command: &[u8]) -> Result<()> {
    let transport = transport.as_mut().ok_or(FirmataError::NotConnected)?;
    log::trace!("firmata: -> {:02X?}", command);
    transport.write(command)
}

/// Borrowed transport handed to a pin for one state change
///
/// The pin only sees core errors, so the transport's own error is parked
/// here and handed back to the caller afterwards.
struct Link<'a, T: Transport> {
    transport: &'a mut Option<T>,
    failure: Option<FirmataError>,
}

impl<'a, T: Transport> Link<'a, T> {
    fn new(transport: &'a mut Option<T>) -> Self {
        Self {
            transport,
            failure: None,
        }
    }

    /// Turn the pin's result into a board result, restoring the write error
    fn resolve(self, result: firmlink_core::Result<bool>) -> Result<bool> {
        match (result, self.failure) {
            (Err(CoreError::TransportFailed), Some(failure)) => Err(failure),
            (result, _) => Ok(result?),
        }
    }
}

impl<T: Transport> CommandSink for Link<'_, T> {
    fn send_command(&mut self, command: &[u8]) -> firmlink_core::Result<()> {
        transmit(&mut *self.transport, command).map_err(|e| match e {
            FirmataError::NotConnected => CoreError::NotConnected,
            FirmataError::Timeout => CoreError::Timeout,
            other => {
                log::error!("firmata: Command {:02X?} failed: {}", command, other);
                self.failure = Some(other);
                CoreError::TransportFailed
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmlink_core::FramingError;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// In-memory transport shared with the test through `Rc` handles
    #[derive(Clone, Default)]
    struct MockTransport {
        written: Rc<RefCell<Vec<Vec<u8>>>>,
        incoming: Rc<RefCell<VecDeque<u8>>>,
        closes: Rc<Cell<usize>>,
        unplugged: Rc<Cell<bool>>,
    }

    impl MockTransport {
        fn with_response(bytes: &[u8]) -> Self {
            let mock = Self::default();
            mock.incoming.borrow_mut().extend(bytes.iter().copied());
            mock
        }

        fn written(&self) -> Vec<Vec<u8>> {
            self.written.borrow().clone()
        }
    }

    impl Transport for MockTransport {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            if self.unplugged.get() {
                return Err(FirmataError::IoError("cable unplugged".to_string()));
            }
            self.written.borrow_mut().push(data.to_vec());
            Ok(())
        }

        fn read_nonblock(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize> {
            let mut incoming = self.incoming.borrow_mut();
            let n = buf.len().min(incoming.len());
            for (slot, byte) in buf.iter_mut().zip(incoming.drain(..n)) {
                *slot = byte;
            }
            Ok(n)
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn close(&mut self) {
            self.closes.set(self.closes.get() + 1);
        }
    }

    fn test_config() -> BoardConfig {
        BoardConfig {
            settle_delay: Duration::ZERO,
            handshake_timeout: Duration::from_millis(20),
            ..BoardConfig::default()
        }
    }

    fn firmware_frame() -> Vec<u8> {
        codec::encode_firmware_report(&FirmwareVersion {
            major: 2,
            minor: 5,
            name: "StandardFirmata".to_string(),
        })
    }

    fn connected_board() -> (Board<MockTransport>, MockTransport) {
        let mock = MockTransport::with_response(&firmware_frame());
        let board = Board::new(Some(mock.clone()), test_config());
        mock.written.borrow_mut().clear();
        (board, mock)
    }

    #[test]
    fn test_handshake() {
        let mock = MockTransport::with_response(&[0xF0, 0x79, 0x02, 0x05, 0x41, 0x42, 0xF7]);
        let board = Board::new(Some(mock.clone()), test_config());

        assert!(board.is_connected());
        assert_eq!(mock.written(), [[0xF0, 0x79, 0xF7]]);

        let version = board.firmware_version().unwrap();
        assert_eq!((version.major, version.minor), (2, 5));
        assert_eq!(version.name, "AB");
        assert!(board.handshake_error().is_none());
    }

    #[test]
    fn test_handshake_skips_version_report() {
        let mut response = vec![0xF9, 0x02, 0x05];
        response.extend(firmware_frame());
        let mock = MockTransport::with_response(&response);
        let board = Board::new(Some(mock), test_config());

        assert_eq!(board.firmware_version().unwrap().name, "StandardFirmata");
    }

    #[test]
    fn test_handshake_timeout_keeps_board_usable() {
        let mock = MockTransport::default();
        let mut board = Board::new(Some(mock.clone()), test_config());

        assert!(board.firmware_version().is_none());
        assert!(matches!(
            board.handshake_error(),
            Some(FirmataError::Timeout)
        ));
        assert!(board.is_connected());

        assert!(board.set_pin_mode(13, PinMode::Output).unwrap());
        assert_eq!(mock.written().last().unwrap(), &[0xF4, 13, 1]);
    }

    #[test]
    fn test_handshake_bad_frame() {
        let mock = MockTransport::with_response(&[0xF0, 0x71, 0x02, 0x05, 0xF7]);
        let board = Board::new(Some(mock), test_config());

        assert!(matches!(
            board.handshake_error(),
            Some(FirmataError::Framing(FramingError::UnexpectedCommand {
                found: 0x71
            }))
        ));
    }

    #[test]
    fn test_set_pin_mode_sends_once() {
        let (mut board, mock) = connected_board();

        assert!(board.set_pin_mode(4, PinMode::Output).unwrap());
        assert!(!board.set_pin_mode(4, PinMode::Output).unwrap());

        assert_eq!(mock.written(), [[0xF4, 4, 1]]);
        assert_eq!(board.pin(4).unwrap().mode(), Some(PinMode::Output));
    }

    #[test]
    fn test_write_digital_pin() {
        let (mut board, mock) = connected_board();

        board.set_pin_mode(13, PinMode::Output).unwrap();
        board.write_digital_pin(13, PinValue::High).unwrap();
        board.write_digital_pin(13, PinValue::High).unwrap();
        board.write_digital_pin(13, PinValue::Low).unwrap();

        assert_eq!(
            mock.written(),
            [[0xF4, 13, 1], [0xF5, 13, 1], [0xF5, 13, 0]]
        );
        assert_eq!(board.pin(13).unwrap().value(), Some(PinValue::Low));
    }

    #[test]
    fn test_invalid_pins() {
        let (mut board, mock) = connected_board();

        for pin in [0, 1, 14, 200] {
            assert!(matches!(
                board.set_pin_mode(pin, PinMode::Output),
                Err(FirmataError::InvalidPin(p)) if p == pin
            ));
            assert!(matches!(
                board.write_digital_pin(pin, PinValue::High),
                Err(FirmataError::InvalidPin(p)) if p == pin
            ));
        }
        assert!(mock.written().is_empty());
        assert_eq!(board.pins().count(), 12);
    }

    #[test]
    fn test_disconnected_board() {
        let mut board: Board<MockTransport> = Board::new(None, test_config());

        assert!(!board.is_connected());
        assert!(board.firmware_version().is_none());
        assert!(matches!(
            board.send_command(&[0xF5, 13, 1]),
            Err(FirmataError::NotConnected)
        ));
        assert!(matches!(
            board.set_pin_mode(13, PinMode::Output),
            Err(FirmataError::NotConnected)
        ));
        assert!(matches!(
            board.write_digital_pin(13, PinValue::High),
            Err(FirmataError::NotConnected)
        ));
        assert_eq!(board.pin(13).unwrap().mode(), None);

        board.shutdown();
        board.shutdown();
    }

    #[test]
    fn test_shutdown_closes_once() {
        let (mut board, mock) = connected_board();

        board.shutdown();
        board.shutdown();
        drop(board);

        assert_eq!(mock.closes.get(), 1);
    }

    #[test]
    fn test_drop_closes_transport() {
        let (board, mock) = connected_board();
        drop(board);
        assert_eq!(mock.closes.get(), 1);
    }

    #[test]
    fn test_operations_after_shutdown() {
        let (mut board, mock) = connected_board();
        board.shutdown();

        assert!(!board.is_connected());
        assert!(matches!(
            board.set_pin_mode(4, PinMode::Input),
            Err(FirmataError::NotConnected)
        ));
        assert!(mock.written().is_empty());
    }

    #[test]
    fn test_board_as_command_sink() {
        let (mut board, mock) = connected_board();
        let mut pin = Pin::new(7).unwrap();

        assert!(pin.set_value(PinValue::High, Some(&mut board)).unwrap());
        assert_eq!(mock.written(), [[0xF5, 7, 1]]);
    }

    #[test]
    fn test_write_failure_keeps_cause() {
        let (mut board, mock) = connected_board();
        mock.unplugged.set(true);

        let err = board.set_pin_mode(13, PinMode::Output).unwrap_err();
        assert!(matches!(&err, FirmataError::IoError(msg) if msg == "cable unplugged"));
        assert_eq!(board.pin(13).unwrap().mode(), None);

        let err = board.write_digital_pin(13, PinValue::High).unwrap_err();
        assert!(matches!(&err, FirmataError::IoError(msg) if msg == "cable unplugged"));
        assert_eq!(board.pin(13).unwrap().value(), None);

        // Nothing was recorded, so the same call goes out once the link is back
        mock.unplugged.set(false);
        assert!(board.set_pin_mode(13, PinMode::Output).unwrap());
        assert_eq!(mock.written(), [[0xF4, 13, 1]]);
    }

    #[test]
    fn test_handshake_uses_first_report() {
        let mut response = firmware_frame();
        response.extend(codec::encode_firmware_report(&FirmwareVersion {
            major: 2,
            minor: 5,
            name: "Reply".to_string(),
        }));
        let mock = MockTransport::with_response(&response);
        let board = Board::new(Some(mock.clone()), test_config());

        assert_eq!(board.firmware_version().unwrap().name, "StandardFirmata");
        // The second report stays queued and is never read
        assert_eq!(mock.incoming.borrow().len(), 10);
    }
}
