//! RAK3172 AT Command Protocol
//!
//! This crate defines the text protocol spoken by the RAK3172 LoRa module
//! over its UART. Everything here is pure: no I/O, no timing, so it can be
//! tested on the host.
//!
//! # Protocol Overview
//!
//! Commands and responses are ASCII lines terminated by `\r\n`:
//! ```text
//! host  → AT+SEND=2:48656C6C6F\r\n
//! radio ← OK\r\n
//! radio ← +EVT:TX_DONE\r\n           (unsolicited, any time)
//! radio ← +EVT:RXP2P:-42:7:CAFE\r\n  (unsolicited inbound data)
//! ```
//!
//! A response has no length prefix. It ends at an `OK` line (success) or
//! as soon as `ERROR` appears (failure). Lines starting with `+EVT:` are
//! asynchronous events and may be interleaved with command traffic.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod at;
pub mod event;
pub mod hex;
pub mod lorawan;
pub mod token;

pub use at::{Command, MAX_COMMAND_LEN};
pub use event::{DataEvent, EventKind, EventLine, EvtKind, RxPacket};
pub use hex::{CodecError, HexString, Payload, MAX_PAYLOAD};
pub use lorawan::{AppKey, Eui, Region};
pub use token::{LineTokenizer, Token, LINE_CAPACITY};
