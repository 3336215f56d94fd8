//! Incremental line tokenizer
//!
//! Fed one byte at a time from the UART stream. `\r` is dropped and `\n`
//! completes a line, which is then classified. `ERROR` is reported as soon
//! as it appears, without waiting for the end of the line.
//!
//! The completed line stays readable through [`LineTokenizer::line`] until
//! the next byte is fed.

use heapless::Vec;

use crate::event::EvtKind;
use crate::hex::MAX_HEX_LEN;

/// Maximum line length kept by the tokenizer
///
/// Fits an `+EVT:RXP2P:<rssi>:<snr>:` header followed by a full 255-byte
/// payload in hex.
pub const LINE_CAPACITY: usize = 64 + MAX_HEX_LEN;

/// Success terminator line
pub const OK_LINE: &[u8] = b"OK";

/// Failure marker, matched anywhere in a line
pub const ERROR_MARKER: &[u8] = b"ERROR";

/// Result of feeding one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token {
    /// Nothing to report yet
    Pending,
    /// An `OK` line completed
    Success,
    /// `ERROR` appeared in the current line
    ProtocolError,
    /// An event line completed
    Event(EvtKind),
    /// Any other non-empty line completed
    Line,
}

/// Byte-at-a-time line assembler and classifier
#[derive(Debug, Clone)]
pub struct LineTokenizer {
    line: Vec<u8, LINE_CAPACITY>,
    /// The buffered line is complete; cleared on the next byte
    complete: bool,
    /// Bytes were dropped from the current line
    overflowed: bool,
    /// `ERROR` already reported for the current line
    error_seen: bool,
}

impl Default for LineTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LineTokenizer {
    /// Create a new tokenizer
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            complete: false,
            overflowed: false,
            error_seen: false,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.line.clear();
        self.complete = false;
        self.overflowed = false;
        self.error_seen = false;
    }

    /// Feed a single byte
    pub fn feed(&mut self, byte: u8) -> Token {
        if self.complete {
            self.reset();
        }

        match byte {
            b'\r' => Token::Pending,
            b'\n' => {
                self.complete = true;
                self.classify()
            }
            _ => {
                if self.line.push(byte).is_err() {
                    self.overflowed = true;
                    return Token::Pending;
                }
                if !self.error_seen && self.line.ends_with(ERROR_MARKER) {
                    self.error_seen = true;
                    return Token::ProtocolError;
                }
                Token::Pending
            }
        }
    }

    /// The line accumulated so far (or just completed)
    ///
    /// Non-UTF-8 content yields an empty string.
    pub fn line(&self) -> &str {
        core::str::from_utf8(&self.line).unwrap_or("")
    }

    /// Whether the current line lost bytes to the capacity limit
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn classify(&self) -> Token {
        if self.line.is_empty() {
            return Token::Pending;
        }
        // A truncated line keeps its prefix, so events are still recognized
        if !self.overflowed && self.line.as_slice() == OK_LINE {
            return Token::Success;
        }
        match EvtKind::classify(self.line()) {
            Some(kind) => Token::Event(kind),
            None => Token::Line,
        }
    }
}
