//! Configuration type definitions
//!
//! These types represent the board and radio configuration loaded from
//! `radio.toml`. Every field has a default matching the RAK3172 factory
//! setup so a partial file is valid.

use rakwan_protocol::{AppKey, Eui, Region};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lowest LoRaWAN application port
pub const MIN_APP_PORT: u8 = 1;

/// Highest LoRaWAN application port
pub const MAX_APP_PORT: u8 = 223;

/// Serial link settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UartSettings {
    /// Baud rate (RAK3172 default 115200)
    pub baudrate: u32,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self { baudrate: 115200 }
    }
}

/// Radio wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RadioPins {
    /// MCU TX (radio RX)
    pub tx_pin: u8,
    /// MCU RX (radio TX)
    pub rx_pin: u8,
    /// Radio reset line (active low)
    pub reset_pin: u8,
}

impl Default for RadioPins {
    fn default() -> Self {
        Self {
            tx_pin: 0,
            rx_pin: 1,
            reset_pin: 25,
        }
    }
}

/// AT engine timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriverTimings {
    /// Ingestion poll delay when the UART is idle
    pub poll_interval_ms: u32,
    /// Longest wait for the exclusivity lock
    pub lock_timeout_ms: u32,
    /// Per-read wait on the transaction channel
    pub read_timeout_ms: u32,
    /// Ingestion retry delay when the transaction channel is full
    pub backoff_ms: u32,
    /// Reset line hold time
    pub reset_hold_ms: u32,
    /// Boot wait after releasing reset
    pub boot_wait_ms: u32,
}

impl Default for DriverTimings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            lock_timeout_ms: 1000,
            read_timeout_ms: 100,
            backoff_ms: 1,
            reset_hold_ms: 100,
            boot_wait_ms: 500,
        }
    }
}

/// LoRaWAN OTAA credentials and uplink policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LorawanConfig {
    pub dev_eui: Eui,
    pub app_eui: Eui,
    pub app_key: AppKey,
    pub region: Region,
    /// Per-attempt join window
    pub join_timeout_ms: u32,
    /// Join attempts before giving up
    pub join_attempts: u8,
    /// Uplink application port
    pub port: u8,
    /// Request acknowledgement for uplinks
    pub confirmed: bool,
    /// Seconds between periodic uplinks
    pub uplink_interval_s: u32,
}

impl Default for LorawanConfig {
    fn default() -> Self {
        Self {
            dev_eui: Eui::default(),
            app_eui: Eui::default(),
            app_key: AppKey::default(),
            region: Region::Eu868,
            join_timeout_ms: 30_000,
            join_attempts: 3,
            port: 2,
            confirmed: false,
            uplink_interval_s: 60,
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoardConfig {
    pub uart: UartSettings,
    pub radio: RadioPins,
    pub driver: DriverTimings,
    pub lorawan: LorawanConfig,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value could not be parsed for its key
    InvalidValue,
    /// Malformed `gpioNN` pin
    InvalidPin,
    /// EUI or key is not the right number of hex digits
    InvalidCredential,
    /// Unknown region name
    InvalidRegion,
    /// Value parsed but outside its allowed range
    OutOfRange,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ConfigError::InvalidSection => "invalid section",
            ConfigError::InvalidValue => "invalid value",
            ConfigError::InvalidPin => "invalid pin",
            ConfigError::InvalidCredential => "invalid credential",
            ConfigError::InvalidRegion => "unknown region",
            ConfigError::OutOfRange => "value out of range",
        };
        f.write_str(msg)
    }
}

impl BoardConfig {
    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lorawan = &self.lorawan;
        if !(MIN_APP_PORT..=MAX_APP_PORT).contains(&lorawan.port) {
            return Err(ConfigError::OutOfRange);
        }
        if lorawan.join_attempts == 0 || lorawan.join_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange);
        }

        let driver = &self.driver;
        if driver.lock_timeout_ms == 0 || driver.read_timeout_ms == 0 {
            return Err(ConfigError::OutOfRange);
        }
        if self.uart.baudrate == 0 {
            return Err(ConfigError::OutOfRange);
        }

        let pins = &self.radio;
        if pins.tx_pin == pins.rx_pin
            || pins.reset_pin == pins.tx_pin
            || pins.reset_pin == pins.rx_pin
        {
            return Err(ConfigError::InvalidPin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = BoardConfig::default();
        assert_eq!(config.uart.baudrate, 115200);
        assert_eq!(config.driver.lock_timeout_ms, 1000);
        assert_eq!(config.driver.read_timeout_ms, 100);
        assert_eq!(config.lorawan.region, Region::Eu868);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_port_range() {
        let mut config = BoardConfig::default();
        config.lorawan.port = 0;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));

        config.lorawan.port = 224;
        assert_eq!(config.validate(), Err(ConfigError::OutOfRange));

        config.lorawan.port = 223;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_pin_conflicts() {
        let mut config = BoardConfig::default();
        config.radio.reset_pin = config.radio.tx_pin;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPin));
    }
}
