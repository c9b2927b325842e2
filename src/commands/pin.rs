//! Pin mode and digital write commands

use firmlink_core::{PinMode, PinValue};
use firmlink_serial::{Board, Transport};

/// Set a pin's mode
pub fn run_mode<T: Transport>(
    board: &mut Board<T>,
    pin: u8,
    mode: PinMode,
) -> Result<(), Box<dyn std::error::Error>> {
    board.set_pin_mode(pin, mode)?;
    println!("{}", board.pin(pin)?);
    Ok(())
}

/// Put a pin in output mode and drive it
pub fn run_write<T: Transport>(
    board: &mut Board<T>,
    pin: u8,
    value: PinValue,
) -> Result<(), Box<dyn std::error::Error>> {
    board.set_pin_mode(pin, PinMode::Output)?;
    board.write_digital_pin(pin, value)?;
    println!("Pin {} set {}", pin, value);
    Ok(())
}
