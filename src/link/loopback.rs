//! In-memory link between two endpoints
//!
//! Stands in for the infrared transport in tests and the host demo. Each
//! endpoint writes into its peer's inbox; an optional seeded loss rate
//! drops bytes on send.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::Link;

type Queue = Rc<RefCell<VecDeque<u8>>>;

#[derive(Debug)]
pub struct LoopbackLink {
    inbox: Queue,
    outbox: Queue,
    loss: Option<(f64, Pcg32)>,
    /// Every byte handed to `send_byte`, delivered or not
    sent: Vec<u8>,
    dropped: u64,
}

impl LoopbackLink {
    /// Two endpoints with perfect delivery
    pub fn pair() -> (Self, Self) {
        let a_to_b: Queue = Rc::default();
        let b_to_a: Queue = Rc::default();
        (
            Self::endpoint(b_to_a.clone(), a_to_b.clone(), None),
            Self::endpoint(a_to_b, b_to_a, None),
        )
    }

    /// Two endpoints that each drop a `loss` fraction of sent bytes
    pub fn lossy_pair(loss: f64, seed: u64) -> (Self, Self) {
        let loss = loss.clamp(0.0, 1.0);
        let (mut a, mut b) = Self::pair();
        a.loss = Some((loss, Pcg32::seed_from_u64(seed)));
        b.loss = Some((loss, Pcg32::seed_from_u64(seed.wrapping_add(1))));
        (a, b)
    }

    fn endpoint(inbox: Queue, outbox: Queue, loss: Option<(f64, Pcg32)>) -> Self {
        Self {
            inbox,
            outbox,
            loss,
            sent: Vec::new(),
            dropped: 0,
        }
    }

    pub fn sent(&self) -> &[u8] {
        &self.sent
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Bytes waiting to be read by this endpoint
    pub fn pending(&self) -> usize {
        self.inbox.borrow().len()
    }
}

impl Link for LoopbackLink {
    fn send_byte(&mut self, byte: u8) {
        self.sent.push(byte);
        if let Some((rate, rng)) = self.loss.as_mut() {
            if rng.random_bool(*rate) {
                self.dropped += 1;
                return;
            }
        }
        self.outbox.borrow_mut().push_back(byte);
    }

    fn try_recv_byte(&mut self) -> Option<u8> {
        self.inbox.borrow_mut().pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_bidirectional_fifo() {
        let (mut a, mut b) = LoopbackLink::pair();
        a.send_byte(b'1');
        a.send_byte(b'2');
        b.send_byte(b'D');

        assert_eq!(b.pending(), 2);
        assert_eq!(b.try_recv_byte(), Some(b'1'));
        assert_eq!(b.try_recv_byte(), Some(b'2'));
        assert_eq!(b.try_recv_byte(), None);
        assert_eq!(a.try_recv_byte(), Some(b'D'));
        assert_eq!(a.sent(), b"12");
    }

    #[test]
    fn test_total_loss_delivers_nothing() {
        let (mut a, mut b) = LoopbackLink::lossy_pair(1.0, 7);
        for _ in 0..10 {
            a.send_byte(b'C');
        }
        assert_eq!(b.try_recv_byte(), None);
        assert_eq!(a.dropped(), 10);
        assert_eq!(a.sent().len(), 10);
    }

    #[test]
    fn test_partial_loss_is_deterministic() {
        let run = || {
            let (mut a, mut b) = LoopbackLink::lossy_pair(0.5, 42);
            for _ in 0..100 {
                a.send_byte(b'C');
            }
            let mut received = 0;
            while b.try_recv_byte().is_some() {
                received += 1;
            }
            received
        };
        let first = run();
        assert_eq!(first, run());
        assert!(first > 0 && first < 100);
    }
}
