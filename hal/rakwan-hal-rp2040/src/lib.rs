//! RP2040-specific HAL for the rakwan radio driver
//!
//! This crate provides RP2040 implementations of the shared `rakwan-hal`
//! traits:
//!
//! - UART halves over any `embedded-io` reader/writer (embassy-rp's
//!   buffered UART in practice)
//! - Radio reset line over any `embedded-hal` output pin
//! - UART pin mapping checks for config-driven wiring

#![no_std]

pub mod gpio;
pub mod uart;

pub use gpio::ResetPin;
pub use uart::{gpio_to_uart, uart_for_pins, IoRx, IoTx, UartId};

// Re-export shared traits from rakwan-hal for convenience
pub use rakwan_hal::{OutputPin, UartRx, UartTx};
