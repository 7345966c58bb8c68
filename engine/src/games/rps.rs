//! Rock-paper-scissors against the house.

use guildmint_types::event::WagerOutcome;
use guildmint_types::RpsHand;
use rand::Rng;

use super::GameRng;

/// The house plays each hand with equal probability.
pub fn reply_hand(rng: &mut GameRng) -> RpsHand {
    match rng.gen_range(0..3u8) {
        0 => RpsHand::Rock,
        1 => RpsHand::Paper,
        _ => RpsHand::Scissors,
    }
}

/// Resolve the duel from the player's perspective.
pub fn resolve(player: RpsHand, reply: RpsHand) -> WagerOutcome {
    if player == reply {
        WagerOutcome::Draw
    } else if reply.beaten_by() == player {
        WagerOutcome::Won
    } else {
        WagerOutcome::Lost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_covers_the_full_matrix() {
        use RpsHand::*;
        let wins = [(Paper, Rock), (Rock, Scissors), (Scissors, Paper)];
        for (player, reply) in wins {
            assert_eq!(resolve(player, reply), WagerOutcome::Won);
            assert_eq!(resolve(reply, player), WagerOutcome::Lost);
        }
        for hand in [Rock, Paper, Scissors] {
            assert_eq!(resolve(hand, hand), WagerOutcome::Draw);
        }
    }

    #[test]
    fn test_house_plays_every_hand() {
        let mut seen = [false; 3];
        for stream in 0..100 {
            let mut rng = GameRng::new(&[4u8; 32], stream, 0);
            match reply_hand(&mut rng) {
                RpsHand::Rock => seen[0] = true,
                RpsHand::Paper => seen[1] = true,
                RpsHand::Scissors => seen[2] = true,
            }
        }
        assert_eq!(seen, [true; 3]);
    }
}
