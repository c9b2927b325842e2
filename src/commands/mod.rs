//! Command implementations

pub mod blink;
pub mod info;
pub mod list;
pub mod pin;
