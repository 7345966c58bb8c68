//! Scratch-off lottery tickets.
//!
//! Every tier carries three prize buckets whose integer-percent weights sum to 100;
//! the draw walks the cumulative bounds so each bucket lands exactly at its listed
//! odds. The loss bucket comes first and pays zero.

use guildmint_types::TicketTier;

use super::GameRng;
use crate::weighted::pick_weighted;

/// Prize table for `tier`: (prize, weight-percent).
pub fn prize_table(tier: TicketTier) -> [(u64, u64); 3] {
    match tier {
        TicketTier::Bronze => [(0, 75), (10, 20), (25, 5)],
        TicketTier::Silver => [(0, 60), (20, 30), (50, 10)],
        TicketTier::Gold => [(0, 50), (50, 35), (100, 15)],
        TicketTier::Platinum => [(0, 40), (100, 40), (250, 20)],
        TicketTier::Diamond => [(0, 30), (250, 50), (500, 20)],
    }
}

/// Scratch one ticket and return the prize, zero on a loss.
pub fn scratch(tier: TicketTier, rng: &mut GameRng) -> u64 {
    pick_weighted(&prize_table(tier), rng).copied().unwrap_or(0)
}
