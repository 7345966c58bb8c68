//! Fair coin flip.

use guildmint_types::CoinSide;
use rand::Rng;

use super::GameRng;

/// Flip the coin; each side lands with equal probability.
pub fn flip(rng: &mut GameRng) -> CoinSide {
    match rng.gen_range(0..2u8) {
        0 => CoinSide::Heads,
        _ => CoinSide::Tails,
    }
}
