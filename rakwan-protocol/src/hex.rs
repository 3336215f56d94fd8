//! Payload hex codec
//!
//! The AT protocol is text-only, so binary payloads travel as pairs of
//! hexadecimal digits. Outbound payloads are always uppercase; inbound
//! payloads are accepted in either case.

use heapless::{String, Vec};

/// Maximum payload size in bytes
pub const MAX_PAYLOAD: usize = 255;

/// Maximum encoded payload size (two characters per byte)
pub const MAX_HEX_LEN: usize = MAX_PAYLOAD * 2;

/// Hex-encoded payload text
pub type HexString = String<MAX_HEX_LEN>;

/// Decoded binary payload
pub type Payload = Vec<u8, MAX_PAYLOAD>;

const DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Errors that can occur while encoding or decoding hex text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodecError {
    /// Payload exceeds [`MAX_PAYLOAD`] bytes
    PayloadTooLarge,
    /// Hex text has an odd number of digits
    OddLength,
    /// Character outside `[0-9A-Fa-f]`
    InvalidDigit,
    /// Hex text does not match the fixed field width
    InvalidLength,
    /// Output buffer too small
    BufferTooSmall,
}

/// Encode bytes as uppercase hex
///
/// Fails with [`CodecError::PayloadTooLarge`] before producing any output
/// when `bytes` is longer than [`MAX_PAYLOAD`].
pub fn encode(bytes: &[u8]) -> Result<HexString, CodecError> {
    let mut out = HexString::new();
    encode_to(bytes, &mut out)?;
    Ok(out)
}

/// Append uppercase hex for `bytes` to an existing string
///
/// Used to build commands in place. On error `out` may hold a partial
/// encoding; callers discard it.
pub fn encode_to<const N: usize>(bytes: &[u8], out: &mut String<N>) -> Result<(), CodecError> {
    if bytes.len() > MAX_PAYLOAD {
        return Err(CodecError::PayloadTooLarge);
    }
    if N - out.len() < bytes.len() * 2 {
        return Err(CodecError::BufferTooSmall);
    }

    for &byte in bytes {
        out.push(DIGITS[(byte >> 4) as usize] as char)
            .map_err(|_| CodecError::BufferTooSmall)?;
        out.push(DIGITS[(byte & 0x0F) as usize] as char)
            .map_err(|_| CodecError::BufferTooSmall)?;
    }
    Ok(())
}

/// Decode hex text into a payload
pub fn decode(text: &str) -> Result<Payload, CodecError> {
    let digits = text.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(CodecError::OddLength);
    }
    if digits.len() > MAX_HEX_LEN {
        return Err(CodecError::PayloadTooLarge);
    }

    let mut out = Payload::new();
    for pair in digits.chunks_exact(2) {
        out.push(decode_pair(pair[0], pair[1])?)
            .map_err(|_| CodecError::PayloadTooLarge)?;
    }
    Ok(out)
}

/// Decode hex text into a fixed-size field
///
/// The text must encode exactly `out.len()` bytes.
pub fn decode_into(text: &str, out: &mut [u8]) -> Result<(), CodecError> {
    let digits = text.as_bytes();
    if digits.len() % 2 != 0 {
        return Err(CodecError::OddLength);
    }
    if digits.len() != out.len() * 2 {
        return Err(CodecError::InvalidLength);
    }

    for (slot, pair) in out.iter_mut().zip(digits.chunks_exact(2)) {
        *slot = decode_pair(pair[0], pair[1])?;
    }
    Ok(())
}

fn decode_pair(high: u8, low: u8) -> Result<u8, CodecError> {
    Ok((nibble(high)? << 4) | nibble(low)?)
}

fn nibble(digit: u8) -> Result<u8, CodecError> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        _ => Err(CodecError::InvalidDigit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_uppercase() {
        let hex = encode(b"Hello").unwrap();
        assert_eq!(hex.as_str(), "48656C6C6F");

        let hex = encode(&[0x00, 0xAB, 0xFF]).unwrap();
        assert_eq!(hex.as_str(), "00ABFF");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&[]).unwrap().as_str(), "");
    }

    #[test]
    fn test_encode_max_payload() {
        let payload = [0x5Au8; MAX_PAYLOAD];
        let hex = encode(&payload).unwrap();
        assert_eq!(hex.len(), MAX_HEX_LEN);
    }

    #[test]
    fn test_encode_rejects_oversize() {
        let payload = [0u8; MAX_PAYLOAD + 1];
        assert_eq!(encode(&payload), Err(CodecError::PayloadTooLarge));
    }

    #[test]
    fn test_encode_to_checks_room() {
        let mut out: String<8> = String::new();
        out.push_str("AT+X=").unwrap();
        assert_eq!(encode_to(&[1, 2], &mut out), Err(CodecError::BufferTooSmall));
        assert_eq!(encode_to(&[1], &mut out), Ok(()));
        assert_eq!(out.as_str(), "AT+X=01");
    }

    #[test]
    fn test_decode_mixed_case() {
        let payload = decode("cafeBABE").unwrap();
        assert_eq!(payload.as_slice(), &[0xCA, 0xFE, 0xBA, 0xBE]);
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode("ABC"), Err(CodecError::OddLength));
        assert_eq!(decode("ZZ"), Err(CodecError::InvalidDigit));
        assert_eq!(decode("0x12"), Err(CodecError::InvalidDigit));

        let mut long: String<512> = String::new();
        for _ in 0..MAX_PAYLOAD + 1 {
            long.push_str("00").unwrap();
        }
        assert_eq!(decode(&long), Err(CodecError::PayloadTooLarge));
    }

    #[test]
    fn test_decode_into_fixed_width() {
        let mut eui = [0u8; 8];
        decode_into("70B3D57ED0001234", &mut eui).unwrap();
        assert_eq!(eui, [0x70, 0xB3, 0xD5, 0x7E, 0xD0, 0x00, 0x12, 0x34]);

        assert_eq!(
            decode_into("70B3D57E", &mut eui),
            Err(CodecError::InvalidLength)
        );
    }

    proptest! {
        #[test]
        fn prop_roundtrip(payload in proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD)) {
            let hex = encode(&payload).unwrap();
            prop_assert_eq!(hex.len(), payload.len() * 2);
            prop_assert!(hex.bytes().all(|c| c.is_ascii_digit() || (b'A'..=b'F').contains(&c)));

            let decoded = decode(&hex).unwrap();
            prop_assert_eq!(decoded.as_slice(), payload.as_slice());
        }

        #[test]
        fn prop_oversize_always_rejected(extra in 1usize..64) {
            let payload = [0u8; MAX_PAYLOAD + 64];
            prop_assert_eq!(
                encode(&payload[..MAX_PAYLOAD + extra]),
                Err(CodecError::PayloadTooLarge)
            );
        }
    }
}
