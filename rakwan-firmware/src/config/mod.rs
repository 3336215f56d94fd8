//! Board configuration
//!
//! `radio.toml` is compiled into the firmware. build.rs has already
//! checked it, so a parse failure at runtime falls back to the factory
//! defaults instead of halting.

use defmt::*;
use rakwan_core::config::{parse_config, BoardConfig};

/// Embedded configuration (edit radio.toml and rebuild to customize)
const EMBEDDED_CONFIG: &str = include_str!("../../radio.toml");

/// Parse the embedded configuration
pub fn load() -> BoardConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} baud, region {}, port {}, uplink every {}s",
                config.uart.baudrate,
                config.lorawan.region,
                config.lorawan.port,
                config.lorawan.uplink_interval_s
            );
            config
        }
        Err(e) => {
            error!("radio.toml rejected ({}), using defaults", e);
            BoardConfig::default()
        }
    }
}
