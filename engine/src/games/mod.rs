//! Stateless minigame resolvers.
//!
//! Each resolver takes fully-parsed inputs plus a [`GameRng`] and returns the raw
//! outcome; the ledger settles balances and emits events. Nothing in this module
//! touches the store or the clock.

pub mod blackjack;
pub mod coinflip;
pub mod lottery;
pub mod rps;
pub mod slots;
pub mod wheel;
pub mod work;

mod serialization;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deterministic per-command randomness.
///
/// The process secret is XOR-folded with a stream id (the audit or session id) and a
/// step (the move number), so replaying a command reproduces its draws while distinct
/// commands diverge.
pub struct GameRng(ChaCha8Rng);

impl GameRng {
    pub fn new(secret: &[u8; 32], stream: u64, step: u32) -> Self {
        let mut seed = *secret;
        for (i, byte) in stream.to_be_bytes().into_iter().enumerate() {
            seed[i] ^= byte;
        }
        for (i, byte) in step.to_be_bytes().into_iter().enumerate() {
            seed[8 + i] ^= byte;
        }
        Self(ChaCha8Rng::from_seed(seed))
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.0.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_domain_replays_identically() {
        let secret = [5u8; 32];
        let mut a = GameRng::new(&secret, 10, 0);
        let mut b = GameRng::new(&secret, 10, 0);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_distinct_streams_diverge() {
        let secret = [5u8; 32];
        let mut a = GameRng::new(&secret, 10, 0);
        let mut b = GameRng::new(&secret, 11, 0);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn test_distinct_steps_diverge() {
        let secret = [5u8; 32];
        let mut a = GameRng::new(&secret, 10, 0);
        let mut b = GameRng::new(&secret, 10, 1);
        assert_ne!(a.next_u64(), b.next_u64());
    }
}
