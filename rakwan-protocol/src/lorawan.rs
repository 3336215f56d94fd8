//! LoRaWAN credentials and regions
//!
//! Typed forms of the values written with `AT+DEVEUI`, `AT+APPEUI`,
//! `AT+APPKEY` and `AT+BAND`. They render as the exact text the radio
//! expects.

use core::fmt;
use core::str::FromStr;

use crate::hex::{self, CodecError};

/// 64-bit extended unique identifier (DevEUI / AppEUI / JoinEUI)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eui(pub [u8; 8]);

impl Eui {
    /// Parse 16 hex digits
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let mut bytes = [0u8; 8];
        hex::decode_into(text, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl FromStr for Eui {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Eui {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

/// 128-bit AES application key
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppKey(pub [u8; 16]);

impl AppKey {
    /// Parse 32 hex digits
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let mut bytes = [0u8; 16];
        hex::decode_into(text, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl FromStr for AppKey {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hex(f, &self.0)
    }
}

// Keys stay out of debug output
impl fmt::Debug for AppKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AppKey(..)")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AppKey {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "AppKey(..)")
    }
}

fn write_hex(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    for byte in bytes {
        write!(f, "{:02X}", byte)?;
    }
    Ok(())
}

/// Regional band plan, numbered as `AT+BAND` expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    Eu433,
    Cn470,
    Ru864,
    In865,
    #[default]
    Eu868,
    Us915,
    Au915,
    Kr920,
    As923_1,
    As923_2,
    As923_3,
    As923_4,
    La915,
}

impl Region {
    pub const ALL: [Region; 13] = [
        Region::Eu433,
        Region::Cn470,
        Region::Ru864,
        Region::In865,
        Region::Eu868,
        Region::Us915,
        Region::Au915,
        Region::Kr920,
        Region::As923_1,
        Region::As923_2,
        Region::As923_3,
        Region::As923_4,
        Region::La915,
    ];

    /// Band index sent with `AT+BAND=`
    pub fn band_index(self) -> u8 {
        match self {
            Region::Eu433 => 0,
            Region::Cn470 => 1,
            Region::Ru864 => 2,
            Region::In865 => 3,
            Region::Eu868 => 4,
            Region::Us915 => 5,
            Region::Au915 => 6,
            Region::Kr920 => 7,
            Region::As923_1 => 8,
            Region::As923_2 => 9,
            Region::As923_3 => 10,
            Region::As923_4 => 11,
            Region::La915 => 12,
        }
    }

    /// Region name as written in config files
    pub fn name(self) -> &'static str {
        match self {
            Region::Eu433 => "EU433",
            Region::Cn470 => "CN470",
            Region::Ru864 => "RU864",
            Region::In865 => "IN865",
            Region::Eu868 => "EU868",
            Region::Us915 => "US915",
            Region::Au915 => "AU915",
            Region::Kr920 => "KR920",
            Region::As923_1 => "AS923-1",
            Region::As923_2 => "AS923-2",
            Region::As923_3 => "AS923-3",
            Region::As923_4 => "AS923-4",
            Region::La915 => "LA915",
        }
    }

    /// Look up a region by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        // "AS923" alone means sub-band 1
        if name.eq_ignore_ascii_case("AS923") {
            return Some(Region::As923_1);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|region| region.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eui_display_uppercase() {
        let eui = Eui([0x70, 0xb3, 0xd5, 0x7e, 0xd0, 0x00, 0x12, 0x34]);
        assert_eq!(format!("{}", eui), "70B3D57ED0001234");
    }

    #[test]
    fn test_eui_parse() {
        let eui: Eui = "70b3d57ed0001234".parse().unwrap();
        assert_eq!(eui.0[0], 0x70);
        assert_eq!(eui.0[7], 0x34);

        assert_eq!(Eui::parse("70B3"), Err(CodecError::InvalidLength));
        assert_eq!(Eui::parse("70B3D57ED000123G"), Err(CodecError::InvalidDigit));
    }

    #[test]
    fn test_app_key_roundtrip_text() {
        let text = "2B7E151628AED2A6ABF7158809CF4F3C";
        let key = AppKey::parse(text).unwrap();
        assert_eq!(format!("{}", key), text);
    }

    #[test]
    fn test_app_key_debug_redacted() {
        let key = AppKey([0xAA; 16]);
        assert_eq!(format!("{:?}", key), "AppKey(..)");
    }

    #[test]
    fn test_region_band_index() {
        assert_eq!(Region::Eu433.band_index(), 0);
        assert_eq!(Region::Eu868.band_index(), 4);
        assert_eq!(Region::Us915.band_index(), 5);
        assert_eq!(Region::La915.band_index(), 12);
    }

    #[test]
    fn test_region_names_roundtrip() {
        for region in Region::ALL {
            assert_eq!(Region::from_name(region.name()), Some(region));
        }
        assert_eq!(Region::from_name("eu868"), Some(Region::Eu868));
        assert_eq!(Region::from_name("AS923"), Some(Region::As923_1));
        assert_eq!(Region::from_name("MARS1"), None);
    }
}
