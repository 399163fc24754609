//! Peer link
//!
//! The transport is a lossy, unacknowledged byte pipe. Sending never blocks
//! and receiving is a poll that may come back empty.

pub mod loopback;
pub mod protocol;

pub use loopback::LoopbackLink;
pub use protocol::{PeerMessage, ProtocolError};

/// Byte transport between two devices
pub trait Link {
    /// Queue a byte for the peer. Delivery is not guaranteed.
    fn send_byte(&mut self, byte: u8);

    /// Take the next received byte, if one is waiting
    fn try_recv_byte(&mut self) -> Option<u8>;
}

impl<L: Link + ?Sized> Link for &mut L {
    fn send_byte(&mut self, byte: u8) {
        (**self).send_byte(byte);
    }

    fn try_recv_byte(&mut self) -> Option<u8> {
        (**self).try_recv_byte()
    }
}

/// Message-level helpers over any byte transport
pub trait PeerLink: Link {
    fn send_message(&mut self, message: PeerMessage) {
        self.send_byte(message.to_byte());
    }

    /// Poll one byte and decode it. Unknown bytes are dropped.
    fn poll_message(&mut self) -> Option<PeerMessage> {
        let byte = self.try_recv_byte()?;
        match PeerMessage::try_from(byte) {
            Ok(message) => Some(message),
            Err(err) => {
                log::debug!("Dropping link byte: {}", err);
                None
            }
        }
    }
}

impl<L: Link + ?Sized> PeerLink for L {}

/// A link with nobody on the other end
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLink;

impl Link for NullLink {
    fn send_byte(&mut self, _byte: u8) {}

    fn try_recv_byte(&mut self) -> Option<u8> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LaneGap;

    #[test]
    fn test_poll_decodes_and_skips_garbage() {
        let (mut a, mut b) = LoopbackLink::pair();
        a.send_byte(b'x');
        a.send_message(PeerMessage::DropAt(LaneGap::new(1).unwrap()));

        assert_eq!(b.poll_message(), None);
        assert_eq!(
            b.poll_message(),
            Some(PeerMessage::DropAt(LaneGap::new(1).unwrap()))
        );
        assert_eq!(b.poll_message(), None);
    }

    #[test]
    fn test_null_link_is_silent() {
        let mut link = NullLink;
        link.send_message(PeerMessage::Handshake);
        assert_eq!(link.poll_message(), None);
    }
}
