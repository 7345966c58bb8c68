//! Blackjack hand state and settlement.
//!
//! Cards are bare ranks `1..=13` drawn uniformly with replacement (an infinite
//! shoe): ace is 1, face cards are 11..=13. House rules:
//! - Dealer draws to 17 and stands on all 17s.
//! - A two-card 21 settles immediately as a win; so does hitting to exactly 21.
//! - Wins pay even money; a push returns the stake.
//!
//! The in-flight hand round-trips through a versioned byte blob stored on the
//! session record, so a restarted service resumes hands exactly where they were.

use guildmint_types::economy::BLACKJACK_DEALER_STAND;
use guildmint_types::event::WagerOutcome;
use guildmint_types::BlackjackAction;
use rand::Rng;

use super::serialization::{StateReader, StateWriter};
use super::GameRng;

const STATE_VERSION: u8 = 1;

/// A hand of nothing but aces busts by twenty-two cards.
const MAX_HAND_CARDS: usize = 22;

/// An in-flight hand awaiting player action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlackjackState {
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
}

impl BlackjackState {
    pub fn serialize(&self) -> Vec<u8> {
        let mut writer = StateWriter::with_capacity(3 + self.player.len() + self.dealer.len());
        writer.push_u8(STATE_VERSION);
        writer.push_u8(self.player.len() as u8);
        writer.push_bytes(&self.player);
        writer.push_u8(self.dealer.len() as u8);
        writer.push_bytes(&self.dealer);
        writer.into_inner()
    }

    /// Decode a stored hand; `None` when the blob is malformed.
    pub fn parse(blob: &[u8]) -> Option<Self> {
        let mut reader = StateReader::new(blob);
        if reader.read_u8()? != STATE_VERSION {
            return None;
        }
        let player_len = reader.read_u8()? as usize;
        if player_len < 2 || player_len > MAX_HAND_CARDS {
            return None;
        }
        let player = reader.read_vec(player_len)?;
        let dealer_len = reader.read_u8()? as usize;
        if dealer_len < 2 || dealer_len > MAX_HAND_CARDS {
            return None;
        }
        let dealer = reader.read_vec(dealer_len)?;
        if reader.remaining() != 0 {
            return None;
        }
        if !player
            .iter()
            .chain(dealer.iter())
            .all(|&card| (1..=13).contains(&card))
        {
            return None;
        }
        Some(Self { player, dealer })
    }
}

/// The terminal outcome of a hand.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub player: Vec<u8>,
    pub dealer: Vec<u8>,
    pub player_total: u8,
    pub dealer_total: u8,
    pub outcome: WagerOutcome,
}

/// What a deal or move produced: either the hand continues or it settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue(BlackjackState),
    Settled(Settlement),
}

pub fn draw_rank(rng: &mut GameRng) -> u8 {
    rng.gen_range(1..=13)
}

/// Best total for `cards`: aces count 11, dropping to 1 while the hand would bust.
pub fn hand_total(cards: &[u8]) -> u8 {
    let mut total: u8 = 0;
    let mut aces: u8 = 0;
    for &card in cards {
        let value = match card {
            1 => {
                aces += 1;
                11
            }
            11..=13 => 10,
            rank => rank,
        };
        total = total.saturating_add(value);
    }
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }
    total
}

fn is_natural(cards: &[u8]) -> bool {
    cards.len() == 2 && hand_total(cards) == 21
}

/// Deal two cards each; a player natural settles on the spot.
pub fn deal(rng: &mut GameRng) -> MoveOutcome {
    let player = vec![draw_rank(rng), draw_rank(rng)];
    let dealer = vec![draw_rank(rng), draw_rank(rng)];
    let state = BlackjackState { player, dealer };
    if is_natural(&state.player) {
        return MoveOutcome::Settled(settle(state, WagerOutcome::Won));
    }
    MoveOutcome::Continue(state)
}

/// Apply one player action to an in-flight hand.
pub fn apply_move(
    mut state: BlackjackState,
    action: BlackjackAction,
    rng: &mut GameRng,
) -> MoveOutcome {
    match action {
        BlackjackAction::Hit => {
            state.player.push(draw_rank(rng));
            let total = hand_total(&state.player);
            if total > 21 {
                // Busts lose before the dealer acts, but the dealer still plays
                // out so the revealed hand is complete.
                dealer_playout(&mut state.dealer, rng);
                MoveOutcome::Settled(settle(state, WagerOutcome::Lost))
            } else if total == 21 {
                MoveOutcome::Settled(settle(state, WagerOutcome::Won))
            } else {
                MoveOutcome::Continue(state)
            }
        }
        BlackjackAction::Stand => {
            dealer_playout(&mut state.dealer, rng);
            let player_total = hand_total(&state.player);
            let dealer_total = hand_total(&state.dealer);
            let outcome = if dealer_total > 21 || player_total > dealer_total {
                WagerOutcome::Won
            } else if player_total == dealer_total {
                WagerOutcome::Draw
            } else {
                WagerOutcome::Lost
            };
            MoveOutcome::Settled(settle(state, outcome))
        }
    }
}

fn dealer_playout(dealer: &mut Vec<u8>, rng: &mut GameRng) {
    while hand_total(dealer) < BLACKJACK_DEALER_STAND {
        dealer.push(draw_rank(rng));
    }
}

fn settle(state: BlackjackState, outcome: WagerOutcome) -> Settlement {
    Settlement {
        player_total: hand_total(&state.player),
        dealer_total: hand_total(&state.dealer),
        outcome,
        player: state.player,
        dealer: state.dealer,
    }
}

/// Amount returned to the player for a settled hand under stake escrow.
pub fn payout_for(outcome: WagerOutcome, stake: u64) -> u64 {
    match outcome {
        WagerOutcome::Won => stake.saturating_mul(2),
        WagerOutcome::Draw => stake,
        WagerOutcome::Lost => 0,
    }
}

/// Display label for a rank.
pub fn card_label(rank: u8) -> &'static str {
    match rank {
        1 => "A",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        10 => "10",
        11 => "J",
        12 => "Q",
        13 => "K",
        _ => "?",
    }
}

pub fn hand_labels(cards: &[u8]) -> Vec<String> {
    cards.iter().map(|&card| card_label(card).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_aces_and_a_nine_total_twenty_one() {
        assert_eq!(hand_total(&[1, 1, 9]), 21);
    }

    #[test]
    fn test_face_cards_count_ten() {
        assert_eq!(hand_total(&[13, 12]), 20);
    }

    #[test]
    fn test_hand_with_no_soft_ace_busts() {
        assert_eq!(hand_total(&[13, 12, 2]), 22);
    }

    #[test]
    fn test_ace_drops_to_one_to_avoid_busting() {
        assert_eq!(hand_total(&[1, 9, 5]), 15);
    }

    #[test]
    fn test_natural_requires_exactly_two_cards() {
        assert!(is_natural(&[1, 13]));
        assert!(!is_natural(&[5, 6, 10]));
    }

    #[test]
    fn test_deal_invariants() {
        for stream in 0..300 {
            let mut rng = GameRng::new(&[12u8; 32], stream, 0);
            match deal(&mut rng) {
                MoveOutcome::Continue(state) => {
                    assert_eq!(state.player.len(), 2);
                    assert_eq!(state.dealer.len(), 2);
                    assert!(hand_total(&state.player) < 21);
                }
                MoveOutcome::Settled(settlement) => {
                    assert_eq!(settlement.outcome, WagerOutcome::Won);
                    assert_eq!(settlement.player_total, 21);
                    assert_eq!(settlement.player.len(), 2);
                }
            }
        }
    }

    #[test]
    fn test_stand_wins_when_dealer_is_pat_and_lower() {
        let state = BlackjackState {
            player: vec![10, 9],
            dealer: vec![10, 7],
        };
        let mut rng = GameRng::new(&[12u8; 32], 1, 1);
        match apply_move(state, BlackjackAction::Stand, &mut rng) {
            MoveOutcome::Settled(settlement) => {
                // Dealer already holds 17, so no cards are drawn.
                assert_eq!(settlement.dealer, vec![10, 7]);
                assert_eq!(settlement.outcome, WagerOutcome::Won);
                assert_eq!(settlement.player_total, 19);
                assert_eq!(settlement.dealer_total, 17);
            }
            other => panic!("stand must settle: {other:?}"),
        }
    }

    #[test]
    fn test_stand_pushes_on_equal_totals() {
        let state = BlackjackState {
            player: vec![10, 8],
            dealer: vec![9, 9],
        };
        let mut rng = GameRng::new(&[12u8; 32], 2, 1);
        match apply_move(state, BlackjackAction::Stand, &mut rng) {
            MoveOutcome::Settled(settlement) => {
                assert_eq!(settlement.outcome, WagerOutcome::Draw);
            }
            other => panic!("stand must settle: {other:?}"),
        }
    }

    #[test]
    fn test_stand_loses_to_a_higher_pat_dealer() {
        let state = BlackjackState {
            player: vec![10, 7],
            dealer: vec![10, 9],
        };
        let mut rng = GameRng::new(&[12u8; 32], 3, 1);
        match apply_move(state, BlackjackAction::Stand, &mut rng) {
            MoveOutcome::Settled(settlement) => {
                assert_eq!(settlement.outcome, WagerOutcome::Lost);
            }
            other => panic!("stand must settle: {other:?}"),
        }
    }

    #[test]
    fn test_dealer_draws_to_stand_threshold() {
        for stream in 0..100 {
            let state = BlackjackState {
                player: vec![10, 8],
                dealer: vec![2, 3],
            };
            let mut rng = GameRng::new(&[13u8; 32], stream, 1);
            match apply_move(state, BlackjackAction::Stand, &mut rng) {
                MoveOutcome::Settled(settlement) => {
                    assert!(settlement.dealer_total >= BLACKJACK_DEALER_STAND);
                    assert!(settlement.dealer.len() > 2);
                }
                other => panic!("stand must settle: {other:?}"),
            }
        }
    }

    #[test]
    fn test_hit_outcomes_match_totals() {
        for stream in 0..300 {
            let state = BlackjackState {
                player: vec![10, 6],
                dealer: vec![10, 7],
            };
            let mut rng = GameRng::new(&[14u8; 32], stream, 1);
            match apply_move(state, BlackjackAction::Hit, &mut rng) {
                MoveOutcome::Continue(state) => {
                    assert_eq!(state.player.len(), 3);
                    assert!(hand_total(&state.player) < 21);
                }
                MoveOutcome::Settled(settlement) => match settlement.outcome {
                    WagerOutcome::Won => assert_eq!(settlement.player_total, 21),
                    WagerOutcome::Lost => assert!(settlement.player_total > 21),
                    WagerOutcome::Draw => panic!("a hit never pushes"),
                },
            }
        }
    }

    #[test]
    fn test_state_roundtrip() {
        let state = BlackjackState {
            player: vec![1, 13, 5],
            dealer: vec![10, 2],
        };
        let blob = state.serialize();
        assert_eq!(BlackjackState::parse(&blob), Some(state));
    }

    #[test]
    fn test_parse_rejects_malformed_blobs() {
        // Wrong version.
        assert_eq!(BlackjackState::parse(&[9, 2, 1, 1, 2, 1, 1]), None);
        // Truncated hand.
        assert_eq!(BlackjackState::parse(&[1, 3, 1, 1]), None);
        // Trailing garbage.
        let mut blob = BlackjackState {
            player: vec![2, 3],
            dealer: vec![4, 5],
        }
        .serialize();
        blob.push(0);
        assert_eq!(BlackjackState::parse(&blob), None);
        // Out-of-range rank.
        assert_eq!(BlackjackState::parse(&[1, 2, 14, 3, 2, 4, 5]), None);
        // Empty.
        assert_eq!(BlackjackState::parse(&[]), None);
    }

    #[test]
    fn test_payouts_under_escrow() {
        assert_eq!(payout_for(WagerOutcome::Won, 40), 80);
        assert_eq!(payout_for(WagerOutcome::Draw, 40), 40);
        assert_eq!(payout_for(WagerOutcome::Lost, 40), 0);
    }

    #[test]
    fn test_card_labels() {
        assert_eq!(card_label(1), "A");
        assert_eq!(card_label(10), "10");
        assert_eq!(card_label(13), "K");
        assert_eq!(hand_labels(&[1, 12]), vec!["A", "Q"]);
    }
}
