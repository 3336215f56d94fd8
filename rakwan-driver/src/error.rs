//! Driver errors

use core::fmt;

use rakwan_protocol::CodecError;

/// Errors returned by the transaction engine and radio operations
///
/// Every error is returned to the immediate caller; none are retried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Exclusivity lock not acquired in time; no I/O was performed
    LockTimeout,
    /// Transport not writable or the write failed
    WriteFailure,
    /// No terminator before the transaction timeout
    ResponseTimeout,
    /// Radio answered `ERROR`
    ProtocolError,
    /// Expected response field missing or malformed
    ParseError,
    /// Payload longer than 255 bytes
    PayloadTooLarge,
    /// Response longer than the caller's buffer
    ResponseOverflow,
    /// Send with nothing to send
    EmptyPayload,
    /// Application port outside 1..=223
    InvalidPort,
    /// Join window ended without `+EVT:JOINED`
    JoinFailed,
    /// Command text does not fit the command buffer
    CommandTooLong,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::LockTimeout => "timed out waiting for radio lock",
            Error::WriteFailure => "UART write failed",
            Error::ResponseTimeout => "radio response timed out",
            Error::ProtocolError => "radio returned ERROR",
            Error::ParseError => "malformed radio response",
            Error::PayloadTooLarge => "payload exceeds 255 bytes",
            Error::ResponseOverflow => "response exceeds buffer",
            Error::EmptyPayload => "payload is empty",
            Error::InvalidPort => "application port out of range",
            Error::JoinFailed => "network join failed",
            Error::CommandTooLong => "command too long",
        };
        f.write_str(msg)
    }
}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::PayloadTooLarge => Error::PayloadTooLarge,
            CodecError::BufferTooSmall => Error::CommandTooLong,
            CodecError::OddLength | CodecError::InvalidDigit | CodecError::InvalidLength => {
                Error::ParseError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_error_mapping() {
        assert_eq!(Error::from(CodecError::PayloadTooLarge), Error::PayloadTooLarge);
        assert_eq!(Error::from(CodecError::BufferTooSmall), Error::CommandTooLong);
        assert_eq!(Error::from(CodecError::InvalidDigit), Error::ParseError);
    }
}
