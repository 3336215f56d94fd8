//! Asynchronous event lines
//!
//! The radio reports anything not tied to a command as a `+EVT:` line.
//! Only P2P receive events carry data; the rest are status notifications.

use crate::hex::{self, Payload};

/// Prefix shared by every event line
pub const EVT_PREFIX: &str = "+EVT:";

/// Inbound P2P data event prefix
pub const RXP2P_PREFIX: &str = "+EVT:RXP2P";

/// Join success marker
pub const JOINED_MARKER: &str = "+EVT:JOINED";

/// Join failure marker (`+EVT:JOIN_FAILED_<reason>` on newer firmware)
pub const JOIN_FAILED_MARKER: &str = "+EVT:JOIN_FAILED";

/// Event kinds the radio emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EvtKind {
    /// `+EVT:RXP2P:<rssi>:<snr>:<hex>` inbound P2P packet
    RxP2p,
    /// `+EVT:JOINED`
    Joined,
    /// `+EVT:JOIN_FAILED...`
    JoinFailed,
    /// `+EVT:TX_DONE`
    TxDone,
    /// `+EVT:SEND_CONFIRMED_OK`
    SendConfirmOk,
    /// `+EVT:SEND_CONFIRMED_FAILED...`
    SendConfirmFailed,
    /// Any other `+EVT:` line
    Other,
}

impl EvtKind {
    /// Classify a line, returning `None` if it is not an event
    pub fn classify(line: &str) -> Option<Self> {
        let name = line.strip_prefix(EVT_PREFIX)?;

        // RXP2P_RECEIVE_TIMEOUT and friends share the prefix but carry no data
        let kind = if name == "RXP2P" || name.starts_with("RXP2P:") {
            EvtKind::RxP2p
        } else if name == "JOINED" {
            EvtKind::Joined
        } else if name.starts_with("JOIN_FAILED") {
            EvtKind::JoinFailed
        } else if name == "TX_DONE" {
            EvtKind::TxDone
        } else if name == "SEND_CONFIRMED_OK" {
            EvtKind::SendConfirmOk
        } else if name.starts_with("SEND_CONFIRMED_FAILED") {
            EvtKind::SendConfirmFailed
        } else {
            EvtKind::Other
        };
        Some(kind)
    }
}

/// Event record kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Inbound data, dispatched to the registered callback
    Data,
    /// Status notification, logged only
    Generic(EvtKind),
}

/// A classified event line
///
/// Borrows the line from the tokenizer; it is consumed immediately and
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLine<'a> {
    pub kind: EventKind,
    pub raw: &'a str,
}

impl<'a> EventLine<'a> {
    /// Classify a completed line
    pub fn classify(raw: &'a str) -> Option<Self> {
        let kind = match EvtKind::classify(raw)? {
            EvtKind::RxP2p => EventKind::Data,
            other => EventKind::Generic(other),
        };
        Some(Self { kind, raw })
    }
}

/// Parsed fields of a P2P receive event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RxPacket {
    /// Received signal strength in dBm
    pub rssi: i16,
    /// Signal to noise ratio in dB
    pub snr: i8,
    /// Decoded payload bytes
    pub payload: Payload,
}

impl RxPacket {
    /// Parse `+EVT:RXP2P:<rssi>:<snr>:<hex>`
    pub fn parse(line: &str) -> Option<Self> {
        let fields = line.strip_prefix(RXP2P_PREFIX)?.strip_prefix(':')?;
        let mut parts = fields.splitn(3, ':');

        let rssi = parts.next()?.trim().parse().ok()?;
        let snr = parts.next()?.trim().parse().ok()?;
        let payload = hex::decode(parts.next()?.trim()).ok()?;

        Some(Self { rssi, snr, payload })
    }
}

/// Data event handed to the registered callback
///
/// `packet` is `None` when the line is an RXP2P event whose fields could
/// not be parsed; the raw line is always available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataEvent<'a> {
    pub raw: &'a str,
    pub packet: Option<RxPacket>,
}

impl<'a> DataEvent<'a> {
    pub fn from_line(raw: &'a str) -> Self {
        Self {
            raw,
            packet: RxPacket::parse(raw),
        }
    }

    /// Event whose line was cut short; the fields are never parsed
    pub fn truncated(raw: &'a str) -> Self {
        Self { raw, packet: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_events() {
        assert_eq!(EvtKind::classify("+EVT:RXP2P:-40:5:AB"), Some(EvtKind::RxP2p));
        assert_eq!(EvtKind::classify("+EVT:JOINED"), Some(EvtKind::Joined));
        assert_eq!(EvtKind::classify("+EVT:JOIN_FAILED"), Some(EvtKind::JoinFailed));
        assert_eq!(
            EvtKind::classify("+EVT:JOIN_FAILED_RX_TIMEOUT"),
            Some(EvtKind::JoinFailed)
        );
        assert_eq!(EvtKind::classify("+EVT:TX_DONE"), Some(EvtKind::TxDone));
        assert_eq!(
            EvtKind::classify("+EVT:SEND_CONFIRMED_OK"),
            Some(EvtKind::SendConfirmOk)
        );
        assert_eq!(
            EvtKind::classify("+EVT:SEND_CONFIRMED_FAILED(4)"),
            Some(EvtKind::SendConfirmFailed)
        );
    }

    #[test]
    fn test_classify_other_and_non_events() {
        assert_eq!(EvtKind::classify("+EVT:RX_1:-70:8:UNICAST:2:AB"), Some(EvtKind::Other));
        assert_eq!(
            EvtKind::classify("+EVT:RXP2P_RECEIVE_TIMEOUT"),
            Some(EvtKind::Other)
        );
        assert_eq!(EvtKind::classify("OK"), None);
        assert_eq!(EvtKind::classify("AT+VER=1.2.3"), None);
    }

    #[test]
    fn test_event_line_kind() {
        let line = EventLine::classify("+EVT:RXP2P:-40:5:AB").unwrap();
        assert_eq!(line.kind, EventKind::Data);

        let line = EventLine::classify("+EVT:TX_DONE").unwrap();
        assert_eq!(line.kind, EventKind::Generic(EvtKind::TxDone));
        assert_eq!(line.raw, "+EVT:TX_DONE");
    }

    #[test]
    fn test_parse_rxp2p() {
        let packet = RxPacket::parse("+EVT:RXP2P:-112:-3:48656C6C6F").unwrap();
        assert_eq!(packet.rssi, -112);
        assert_eq!(packet.snr, -3);
        assert_eq!(packet.payload.as_slice(), b"Hello");
    }

    #[test]
    fn test_parse_rxp2p_malformed() {
        assert!(RxPacket::parse("+EVT:RXP2P").is_none());
        assert!(RxPacket::parse("+EVT:RXP2P:-40").is_none());
        assert!(RxPacket::parse("+EVT:RXP2P:x:5:AB").is_none());
        assert!(RxPacket::parse("+EVT:RXP2P:-40:5:ABC").is_none());

        let event = DataEvent::from_line("+EVT:RXP2P:garbage");
        assert_eq!(event.raw, "+EVT:RXP2P:garbage");
        assert!(event.packet.is_none());
    }
}
