//! Response buffer
//!
//! Fixed-capacity accumulator for one transaction's response bytes. The
//! engine appends; callers only read. Appending past capacity is an error,
//! never a silent truncation.

use heapless::Vec;

use crate::error::Error;

/// Accumulated response bytes, at most `N`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> Response<N> {
    pub(crate) fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    pub(crate) fn push(&mut self, byte: u8) -> Result<(), Error> {
        self.bytes.push(byte).map_err(|_| Error::ResponseOverflow)
    }

    /// Raw response bytes, terminators included
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Response as text, if it is valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Declared capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Whether `needle` occurs anywhere in the response
    pub fn contains(&self, needle: &str) -> bool {
        let needle = needle.as_bytes();
        if needle.is_empty() {
            return true;
        }
        self.bytes.windows(needle.len()).any(|w| w == needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_until_full() {
        let mut response = Response::<4>::new();
        for &b in b"OK\r\n" {
            response.push(b).unwrap();
        }
        assert_eq!(response.len(), 4);
        assert_eq!(response.push(b'x'), Err(Error::ResponseOverflow));
        assert_eq!(response.as_str(), Some("OK\r\n"));
    }

    #[test]
    fn test_contains() {
        let mut response = Response::<32>::new();
        for &b in b"+EVT:JOINED\r\nOK\r\n" {
            response.push(b).unwrap();
        }
        assert!(response.contains("+EVT:JOINED"));
        assert!(!response.contains("JOIN_FAILED"));
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut response = Response::<16>::new();
            for (i, b) in bytes.iter().enumerate() {
                let result = response.push(*b);
                prop_assert_eq!(result.is_ok(), i < 16);
                prop_assert!(response.len() <= response.capacity());
            }
        }
    }
}
