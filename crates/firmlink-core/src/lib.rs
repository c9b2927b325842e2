//! firmlink-core - Protocol codec and pin state model
//!
//! This crate holds the transport-independent half of firmlink: the byte
//! encoding of the handful of Firmata-style commands we speak, and the pin
//! state machine that decides when a command actually needs to go out.
//! It is `no_std` compatible; the firmware report decoder needs `alloc`.
//!
//! # Features
//!
//! - `std` - Enable standard library support (includes `alloc`)
//! - `alloc` - Enable heap allocation for the decoded firmware name
//!
//! # Example
//!
//! ```ignore
//! use firmlink_core::{codec, pin::Pin, PinMode};
//!
//! let mut pin = Pin::new(13)?;
//! // `sink` is anything implementing CommandSink, usually a connected board
//! pin.set_mode(PinMode::Output, Some(&mut sink))?;
//! assert_eq!(codec::encode_set_pin_mode(13, PinMode::Output)?, [0xF4, 13, 1]);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod codec;
pub mod command;
pub mod constants;
pub mod error;
pub mod pin;

pub use command::CommandSink;
pub use constants::{PinMode, PinValue};
pub use error::{Error, FramingError, Result};
pub use pin::Pin;

#[cfg(feature = "alloc")]
pub use codec::FirmwareVersion;
