//! Info command implementation

use firmlink_serial::{Board, Transport};

/// Print firmware identification and the controllable pins
pub fn run_info<T: Transport>(board: &Board<T>) -> Result<(), Box<dyn std::error::Error>> {
    match (board.firmware_version(), board.handshake_error()) {
        (Some(fw), _) => {
            println!("Firmware: {}", fw.name);
            println!("Version:  {}.{}", fw.major, fw.minor);
        }
        (None, Some(e)) => println!("Firmware: unknown ({})", e),
        (None, None) => println!("Firmware: unknown"),
    }

    println!();
    println!("{:<5} {:<5} {:<9}", "Pin", "PWM", "Interrupt");
    for pin in board.pins() {
        println!(
            "{:<5} {:<5} {:<9}",
            pin.number(),
            if pin.supports_pwm() { "yes" } else { "" },
            if pin.supports_interrupt() { "yes" } else { "" }
        );
    }

    Ok(())
}
