//! List command implementation

use firmlink_serial::discovery;

/// List serial ports, marking those whose manufacturer matches `hint`
pub fn run_list(hint: &str) -> Result<(), Box<dyn std::error::Error>> {
    let ports = discovery::list_candidates()?;

    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }

    println!("{:<3} {:<24} {:<28} {}", "", "Device", "Manufacturer", "Product");
    println!("{}", "-".repeat(72));

    for port in &ports {
        let manufacturer = port.manufacturer.as_deref().unwrap_or("-");
        let marker = if manufacturer.contains(hint) { "*" } else { "" };
        println!(
            "{:<3} {:<24} {:<28} {}",
            marker,
            port.device,
            manufacturer,
            port.product.as_deref().unwrap_or("-")
        );
    }

    match discovery::select_candidate(&ports, hint) {
        Ok(selected) => println!("\nauto would use {}", selected.device),
        Err(e) => println!("\n{}", e),
    }

    Ok(())
}
