//! Outbound events.
//!
//! Every applied command produces one or more events; the gateway renders them
//! into interaction replies and the log channel. Events are JSON at the edge and
//! are never persisted, so they carry serde derives rather than the store codec.

use serde::{Deserialize, Serialize};

use crate::command::{BlackjackAction, CoinSide, RpsHand, TicketTier};
use crate::ids::{RoleId, UserId};

/// How a wager ended, from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerOutcome {
    Won,
    Lost,
    Draw,
}

/// A role the gateway should grant as part of a purchase. Grant failures are the
/// gateway's problem; the purchase itself has already settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub user: UserId,
    pub role: RoleId,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    // Claims
    #[serde(rename = "daily_claimed")]
    DailyClaimed {
        user: UserId,
        amount: u64,
        balance: u64,
        next_claim_ms: u64,
    },
    #[serde(rename = "weekly_claimed")]
    WeeklyClaimed {
        user: UserId,
        amount: u64,
        balance: u64,
        next_claim_ms: u64,
    },
    #[serde(rename = "worked")]
    Worked {
        user: UserId,
        job: String,
        amount: u64,
        balance: u64,
    },

    // Single-command wagers
    #[serde(rename = "slots_resolved")]
    SlotsResolved {
        user: UserId,
        stake: u64,
        grid: [[String; 3]; 3],
        payout: u64,
        balance: u64,
    },
    #[serde(rename = "coinflip_resolved")]
    CoinFlipResolved {
        user: UserId,
        stake: u64,
        side: CoinSide,
        landed: CoinSide,
        outcome: WagerOutcome,
        payout: u64,
        balance: u64,
    },
    #[serde(rename = "rps_resolved")]
    RpsResolved {
        user: UserId,
        stake: u64,
        hand: RpsHand,
        reply: RpsHand,
        outcome: WagerOutcome,
        payout: u64,
        balance: u64,
    },
    #[serde(rename = "lottery_resolved")]
    LotteryResolved {
        user: UserId,
        tier: TicketTier,
        price: u64,
        prize: u64,
        balance: u64,
    },
    #[serde(rename = "spinwheel_resolved")]
    SpinWheelResolved {
        user: UserId,
        stake: u64,
        segment: String,
        payout: u64,
        balance: u64,
    },

    // Blackjack sessions
    #[serde(rename = "blackjack_started")]
    BlackjackStarted {
        session_id: u64,
        user: UserId,
        stake: u64,
        player: Vec<String>,
        dealer_up: String,
        player_total: u8,
        deadline_ms: u64,
    },
    #[serde(rename = "blackjack_moved")]
    BlackjackMoved {
        session_id: u64,
        action: BlackjackAction,
        move_number: u32,
        player: Vec<String>,
        player_total: u8,
        deadline_ms: u64,
    },
    #[serde(rename = "blackjack_settled")]
    BlackjackSettled {
        session_id: u64,
        user: UserId,
        stake: u64,
        player: Vec<String>,
        dealer: Vec<String>,
        player_total: u8,
        dealer_total: u8,
        outcome: WagerOutcome,
        payout: u64,
        balance: u64,
    },
    #[serde(rename = "blackjack_expired")]
    BlackjackExpired {
        session_id: u64,
        user: UserId,
        refunded: u64,
        balance: u64,
    },

    // Shop
    #[serde(rename = "item_purchased")]
    ItemPurchased {
        user: UserId,
        item: String,
        price: u64,
        balance: u64,
        sold: u32,
        remaining_stock: Option<u32>,
        role_grant: Option<RoleGrant>,
    },

    // Admin confirmations
    #[serde(rename = "item_added")]
    ItemAdded { name: String, price: u64 },
    #[serde(rename = "item_updated")]
    ItemUpdated { name: String },
    #[serde(rename = "item_removed")]
    ItemRemoved { name: String },
    #[serde(rename = "shop_cleared")]
    ShopCleared { removed: u32 },
    #[serde(rename = "coins_added")]
    CoinsAdded {
        target: UserId,
        amount: u64,
        balance: u64,
    },
    #[serde(rename = "coins_removed")]
    CoinsRemoved {
        target: UserId,
        amount: u64,
        balance: u64,
    },
    #[serde(rename = "coins_set")]
    CoinsSet { target: UserId, balance: u64 },
    #[serde(rename = "inventory_reset")]
    InventoryReset { target: UserId, lines_removed: u32 },
    #[serde(rename = "settings_updated")]
    SettingsUpdated {
        daily_reward: u64,
        weekly_reward: u64,
    },
    #[serde(rename = "economy_enabled")]
    EconomyEnabled,
    #[serde(rename = "economy_disabled")]
    EconomyDisabled,

    // Rejections
    #[serde(rename = "command_failed")]
    CommandFailed {
        user: UserId,
        code: u8,
        message: String,
    },
}

impl Event {
    /// Whether this event is a rejection rather than an applied change.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::CommandFailed { .. })
    }
}
