//! Board-agnostic core logic for the rakwan radio driver
//!
//! This crate contains everything that does not touch hardware or async
//! runtimes:
//!
//! - Transaction state machine for the AT command engine
//! - Configuration type definitions and the `radio.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod state;
