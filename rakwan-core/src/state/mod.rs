//! Transaction state machine
//!
//! Tracks one AT command exchange from lock acquisition to release.
//! The machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::TransactionEvent;
pub use machine::{Outcome, TransactionState};
