//! Async driver for the RAK3172 LoRa module
//!
//! The module speaks a line-based AT protocol over UART. The same link
//! carries command responses and unsolicited `+EVT:` notifications, so the
//! driver is split in two halves that share one [`Radio`]:
//!
//! - [`Ingest`] owns the UART receive half and runs as a background task.
//!   It routes bytes to the transaction in flight and dispatches data
//!   events to the registered callback.
//! - [`Radio`] owns the transmit half behind an async mutex and runs one
//!   command/response transaction at a time.
//!
//! ```ignore
//! static RADIO: StaticCell<Radio<CriticalSectionRawMutex, Tx>> = StaticCell::new();
//!
//! let radio = RADIO.init(Radio::new(tx, DriverConfig::default()));
//! spawner.spawn(ingest_task(Ingest::new(radio, rx)))?;
//!
//! let version: heapless::String<32> = radio.version().await?;
//! radio.join(Duration::from_secs(30)).await?;
//! radio.send_unconfirmed(2, b"hello").await?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// Must come first so the logging macros are visible to later modules
mod fmt;

pub mod config;
pub mod error;
pub mod ingest;
pub mod ops;
pub mod radio;
pub mod reset;
pub mod response;

#[cfg(test)]
mod mock;

pub use config::{DriverConfig, CHANNEL_CAPACITY};
pub use error::Error;
pub use ingest::{Ingest, Route};
pub use radio::{Completion, EventCallback, Radio, Stats, Transaction};
pub use reset::{hard_reset, ResetTiming};
pub use response::Response;

// Types callers need alongside the driver
pub use rakwan_core::state::{Outcome, TransactionState};
pub use rakwan_protocol::{DataEvent, RxPacket};
