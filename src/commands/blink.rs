//! Blink command implementation

use std::time::Duration;

use firmlink_core::{PinMode, PinValue};
use firmlink_serial::{Board, Transport};

/// Toggle `pin` every `interval`, for `count` cycles or forever
///
/// A cycle is one high phase followed by one low phase; the pin is left low.
pub fn run_blink<T: Transport>(
    board: &mut Board<T>,
    pin: u8,
    interval: Duration,
    count: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    board.set_pin_mode(pin, PinMode::Output)?;
    log::info!("Blinking pin {} every {:?}", pin, interval);

    let mut level = PinValue::High;
    let mut cycles = 0u64;
    while count.map_or(true, |n| cycles < n) {
        board.write_digital_pin(pin, level)?;
        board.delay(interval);

        level = level.toggled();
        if level == PinValue::High {
            cycles += 1;
        }
    }

    Ok(())
}
