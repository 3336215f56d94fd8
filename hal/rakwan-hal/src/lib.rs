//! rakwan Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the radio driver is written
//! against. Chip-specific crates (currently RP2040) implement them, and
//! host tests implement them with scripted doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  rakwan-driver / rakwan-firmware        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rakwan-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  rakwan-hal-  │       │  test doubles │
//! │    rp2040     │       │   (host)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::UartTx`], [`uart::UartRx`] - Serial link to the radio module
//! - [`gpio::OutputPin`] - Radio reset line

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use uart::{UartConfig, UartError, UartRx, UartTx};
