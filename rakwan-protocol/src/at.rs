//! AT command construction and response fields
//!
//! Commands are built without their line terminator; the transaction
//! engine appends [`LINE_END`] when writing.

use core::fmt::Write;

use heapless::String;

use crate::hex::{self, CodecError, MAX_HEX_LEN};
use crate::lorawan::{AppKey, Eui, Region};

/// Protocol line terminator
pub const LINE_END: &str = "\r\n";

/// Longest command: `AT+SEND=<port>:` plus a full hex payload
pub const MAX_COMMAND_LEN: usize = 16 + MAX_HEX_LEN;

/// Command text without terminator
pub type Command = String<MAX_COMMAND_LEN>;

/// Firmware version query
pub const VERSION_QUERY: &str = "AT+VER=?";

/// Prefix of the version response line
pub const VERSION_PREFIX: &str = "AT+VER=";

/// OTAA join: start joining, no auto-join, 10 s between attempts, 8 attempts
pub const JOIN: &str = "AT+JOIN=1:0:10:8";

/// Build a command from plain text
pub fn raw(text: &str) -> Result<Command, CodecError> {
    let mut cmd = Command::new();
    cmd.push_str(text).map_err(|_| CodecError::BufferTooSmall)?;
    Ok(cmd)
}

/// `AT+SEND=<port>:<HEX>`
pub fn send(port: u8, payload: &[u8]) -> Result<Command, CodecError> {
    if payload.len() > hex::MAX_PAYLOAD {
        return Err(CodecError::PayloadTooLarge);
    }

    let mut cmd = Command::new();
    write!(cmd, "AT+SEND={}:", port).map_err(|_| CodecError::BufferTooSmall)?;
    hex::encode_to(payload, &mut cmd)?;
    Ok(cmd)
}

/// `AT+DEVEUI=<16 hex>`
pub fn set_dev_eui(eui: &Eui) -> Result<Command, CodecError> {
    format_command(format_args!("AT+DEVEUI={}", eui))
}

/// `AT+APPEUI=<16 hex>`
pub fn set_app_eui(eui: &Eui) -> Result<Command, CodecError> {
    format_command(format_args!("AT+APPEUI={}", eui))
}

/// `AT+APPKEY=<32 hex>`
pub fn set_app_key(key: &AppKey) -> Result<Command, CodecError> {
    format_command(format_args!("AT+APPKEY={}", key))
}

/// `AT+BAND=<index>`
pub fn set_band(region: Region) -> Result<Command, CodecError> {
    format_command(format_args!("AT+BAND={}", region.band_index()))
}

fn format_command(args: core::fmt::Arguments<'_>) -> Result<Command, CodecError> {
    let mut cmd = Command::new();
    cmd.write_fmt(args).map_err(|_| CodecError::BufferTooSmall)?;
    Ok(cmd)
}

/// Extract the version from an `AT+VER=?` response
///
/// Returns the text after `AT+VER=` up to the next carriage return. An
/// echoed query (`AT+VER=?`) is skipped.
pub fn parse_version(response: &str) -> Option<&str> {
    let mut rest = response;
    while let Some(start) = rest.find(VERSION_PREFIX) {
        let after = &rest[start + VERSION_PREFIX.len()..];
        let end = after.find(|c: char| c == '\r' || c == '\n')?;
        let value = &after[..end];
        if value != "?" && !value.is_empty() {
            return Some(value);
        }
        rest = &after[end..];
    }
    None
}
