//! Simple TOML parser for board configuration
//!
//! This is a minimal TOML parser that handles only the subset used by
//! `radio.toml`. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use heapless::String;
use rakwan_protocol::{AppKey, Eui, Region};

use super::types::{BoardConfig, ConfigError};

/// Longest integer literal accepted
const MAX_INT_LEN: usize = 16;

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Uart,
    Radio,
    Driver,
    Lorawan,
}

/// Parse TOML configuration into a validated [`BoardConfig`]
///
/// Keys missing from the file keep their defaults. Unknown keys are
/// ignored so newer files still load on older firmware.
pub fn parse_config(input: &str) -> Result<BoardConfig, ConfigError> {
    let mut config = BoardConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    match header.trim() {
        "uart" => Ok(Section::Uart),
        "radio" => Ok(Section::Radio),
        "driver" => Ok(Section::Driver),
        "lorawan" => Ok(Section::Lorawan),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Parse "key = value" line, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let mut value = value.trim();

    if let Some(hash_pos) = value.find('#') {
        // Only when the # is outside a string
        if value[..hash_pos].matches('"').count() % 2 == 0 {
            value = value[..hash_pos].trim();
        }
    }

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut BoardConfig,
) -> Result<(), ConfigError> {
    match section {
        Section::Uart => {
            if key == "baudrate" || key == "baud" {
                config.uart.baudrate = parse_int(value)?;
            }
        }
        Section::Radio => {
            let pins = &mut config.radio;
            match key {
                "tx_pin" => pins.tx_pin = parse_pin(value)?,
                "rx_pin" => pins.rx_pin = parse_pin(value)?,
                "reset_pin" => pins.reset_pin = parse_pin(value)?,
                _ => {}
            }
        }
        Section::Driver => {
            let driver = &mut config.driver;
            match key {
                "poll_interval_ms" => driver.poll_interval_ms = parse_int(value)?,
                "lock_timeout_ms" => driver.lock_timeout_ms = parse_int(value)?,
                "read_timeout_ms" => driver.read_timeout_ms = parse_int(value)?,
                "backoff_ms" => driver.backoff_ms = parse_int(value)?,
                "reset_hold_ms" => driver.reset_hold_ms = parse_int(value)?,
                "boot_wait_ms" => driver.boot_wait_ms = parse_int(value)?,
                _ => {}
            }
        }
        Section::Lorawan => {
            let lorawan = &mut config.lorawan;
            match key {
                "dev_eui" => {
                    lorawan.dev_eui = Eui::parse(parse_string(value))
                        .map_err(|_| ConfigError::InvalidCredential)?
                }
                "app_eui" | "join_eui" => {
                    lorawan.app_eui = Eui::parse(parse_string(value))
                        .map_err(|_| ConfigError::InvalidCredential)?
                }
                "app_key" => {
                    lorawan.app_key = AppKey::parse(parse_string(value))
                        .map_err(|_| ConfigError::InvalidCredential)?
                }
                "region" | "band" => {
                    lorawan.region =
                        Region::from_name(parse_string(value)).ok_or(ConfigError::InvalidRegion)?
                }
                "join_timeout_ms" => lorawan.join_timeout_ms = parse_int(value)?,
                "join_attempts" => lorawan.join_attempts = parse_int(value)?,
                "port" => lorawan.port = parse_int(value)?,
                "confirmed" => lorawan.confirmed = parse_bool(value)?,
                "uplink_interval_s" => lorawan.uplink_interval_s = parse_int(value)?,
                _ => {}
            }
        }
        // Top-level keys carry nothing
        Section::Root => {}
    }
    Ok(())
}

/// Strip surrounding quotes; bare values pass through
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    // TOML allows 1_000 digit grouping
    let mut digits: String<MAX_INT_LEN> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ConfigError::InvalidValue)?;
    }
    digits.as_str().parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}

/// Parse a pin string like "gpio25"
fn parse_pin(value: &str) -> Result<u8, ConfigError> {
    let number = parse_string(value)
        .strip_prefix("gpio")
        .ok_or(ConfigError::InvalidPin)?;
    let pin: u8 = number.parse().map_err(|_| ConfigError::InvalidPin)?;
    if pin > 29 {
        return Err(ConfigError::InvalidPin);
    }
    Ok(pin)
}
