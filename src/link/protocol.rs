//! Peer message alphabet
//!
//! Every message is exactly one ASCII byte on the wire:
//!
//! | byte        | message        |
//! |-------------|----------------|
//! | `'C'`       | `Handshake`    |
//! | `'A'`       | `HandshakeAck` |
//! | `'0'`-`'3'` | `DropAt(gap)`  |
//! | `'D'`       | `DeathNotify`  |
//!
//! "No data" is represented by `None` at the transport, never by a byte.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::LaneGap;

pub const HANDSHAKE: u8 = b'C';
pub const HANDSHAKE_ACK: u8 = b'A';
pub const DEATH_NOTIFY: u8 = b'D';
pub const DROP_BASE: u8 = b'0';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unknown link symbol {0:#04x}")]
    UnknownSymbol(u8),
}

/// A decoded link message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerMessage {
    /// Sent every tick while waiting for a peer
    Handshake,
    /// Sent once by a device that has seen the peer's handshake
    HandshakeAck,
    /// Drop a mine into the receiver's field
    DropAt(LaneGap),
    /// The sender's player died
    DeathNotify,
}

impl PeerMessage {
    pub fn to_byte(self) -> u8 {
        match self {
            PeerMessage::Handshake => HANDSHAKE,
            PeerMessage::HandshakeAck => HANDSHAKE_ACK,
            PeerMessage::DropAt(gap) => DROP_BASE + gap.index(),
            PeerMessage::DeathNotify => DEATH_NOTIFY,
        }
    }

    /// Whether this message completes a pending handshake
    pub fn is_handshake(self) -> bool {
        matches!(self, PeerMessage::Handshake | PeerMessage::HandshakeAck)
    }
}

impl TryFrom<u8> for PeerMessage {
    type Error = ProtocolError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            HANDSHAKE => Ok(PeerMessage::Handshake),
            HANDSHAKE_ACK => Ok(PeerMessage::HandshakeAck),
            DEATH_NOTIFY => Ok(PeerMessage::DeathNotify),
            b'0'..=b'9' => LaneGap::new(byte - DROP_BASE)
                .map(PeerMessage::DropAt)
                .map_err(|_| ProtocolError::UnknownSymbol(byte)),
            _ => Err(ProtocolError::UnknownSymbol(byte)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_bytes() {
        assert_eq!(PeerMessage::Handshake.to_byte(), b'C');
        assert_eq!(PeerMessage::DeathNotify.to_byte(), b'D');
        let gap = LaneGap::new(2).unwrap();
        assert_eq!(PeerMessage::DropAt(gap).to_byte(), b'2');
    }

    #[test]
    fn test_decode_drop_digits() {
        for (i, gap) in LaneGap::ALL.into_iter().enumerate() {
            let byte = b'0' + i as u8;
            assert_eq!(PeerMessage::try_from(byte), Ok(PeerMessage::DropAt(gap)));
        }
    }

    #[test]
    fn test_out_of_range_digit_rejected() {
        assert_eq!(
            PeerMessage::try_from(b'4'),
            Err(ProtocolError::UnknownSymbol(b'4'))
        );
    }

    #[test]
    fn test_unassigned_bytes_rejected() {
        assert!(PeerMessage::try_from(b'N').is_err());
        assert!(PeerMessage::try_from(0).is_err());
    }

    #[test]
    fn test_handshake_kinds() {
        assert!(PeerMessage::Handshake.is_handshake());
        assert!(PeerMessage::HandshakeAck.is_handshake());
        assert!(!PeerMessage::DeathNotify.is_handshake());
    }
}
