//! Inbound command surface.
//!
//! Commands arrive as JSON from the gateway frontend and are matched one-to-one
//! with the slash commands it registers, so the wire tags keep the registered
//! command names rather than the Rust variant names.

use serde::{Deserialize, Serialize};

use crate::ids::{ChannelId, GuildId, RoleId, UserId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinSide {
    Heads,
    Tails,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RpsHand {
    Rock,
    Paper,
    Scissors,
}

impl RpsHand {
    /// The hand this one loses to.
    pub fn beaten_by(&self) -> Self {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }
}

/// Scratch ticket tiers. Higher tiers cost more and pay more, with worse odds of
/// paying at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl TicketTier {
    pub fn price(&self) -> u64 {
        match self {
            Self::Bronze => 5,
            Self::Silver => 10,
            Self::Gold => 25,
            Self::Platinum => 50,
            Self::Diamond => 100,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackjackAction {
    Hit,
    Stand,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    // Claims
    #[serde(rename = "daily")]
    Daily,
    #[serde(rename = "weekly")]
    Weekly,
    #[serde(rename = "work")]
    Work,

    // Wagers
    #[serde(rename = "slots")]
    Slots { stake: u64 },
    #[serde(rename = "flipcoin")]
    FlipCoin { stake: u64, side: CoinSide },
    #[serde(rename = "rps")]
    Rps { stake: u64, hand: RpsHand },
    #[serde(rename = "lottery")]
    Lottery { tier: TicketTier },
    #[serde(rename = "spinwheel")]
    SpinWheel { stake: u64 },

    // Blackjack sessions
    #[serde(rename = "blackjack")]
    BlackjackDeal { stake: u64 },
    #[serde(rename = "blackjack_move")]
    BlackjackMove { session_id: u64, action: BlackjackAction },

    // Shop
    #[serde(rename = "buy")]
    Buy { item: String },

    // Admin: catalog
    #[serde(rename = "additem")]
    AddItem {
        name: String,
        price: u64,
        description: Option<String>,
        image_url: Option<String>,
        stock_cap: Option<u32>,
        user_cap: Option<u32>,
        role_reward: Option<RoleId>,
    },
    #[serde(rename = "edititem")]
    EditItem {
        name: String,
        price: Option<u64>,
        description: Option<String>,
        image_url: Option<String>,
        stock_cap: Option<u32>,
        user_cap: Option<u32>,
        role_reward: Option<RoleId>,
    },
    #[serde(rename = "removeitem")]
    RemoveItem { name: String },
    #[serde(rename = "clearshop")]
    ClearShop,

    // Admin: balances
    #[serde(rename = "addcoins")]
    AddCoins { target: UserId, amount: u64 },
    #[serde(rename = "removecoins")]
    RemoveCoins { target: UserId, amount: u64 },
    #[serde(rename = "setcoins")]
    SetCoins { target: UserId, amount: u64 },
    #[serde(rename = "resetinventory")]
    ResetInventory { target: UserId },

    // Admin: guild settings
    #[serde(rename = "setup")]
    Setup {
        daily_reward: u64,
        weekly_reward: u64,
        admin_role: Option<RoleId>,
        log_channel: Option<ChannelId>,
    },
    #[serde(rename = "enableeconomy")]
    EnableEconomy,
    #[serde(rename = "disableeconomy")]
    DisableEconomy,
}

impl Command {
    /// Commands that require the configured admin role (or a server admin).
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::AddItem { .. }
                | Self::EditItem { .. }
                | Self::RemoveItem { .. }
                | Self::ClearShop
                | Self::AddCoins { .. }
                | Self::RemoveCoins { .. }
                | Self::SetCoins { .. }
                | Self::ResetInventory { .. }
                | Self::Setup { .. }
                | Self::EnableEconomy
                | Self::DisableEconomy
        )
    }

    /// Admin commands stay available while the economy toggle is off; everything
    /// else is rejected so the guild can be paused without locking admins out.
    pub fn allowed_while_disabled(&self) -> bool {
        self.requires_admin()
    }
}

/// A command plus the interaction context the gateway resolved for it.
///
/// `actor_roles` is the actor's role list at the time of the interaction and
/// `actor_is_admin` reflects the platform-level administrator permission; the
/// engine never talks to the gateway to re-check either.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub guild: GuildId,
    pub channel: ChannelId,
    pub actor: UserId,
    pub actor_roles: Vec<RoleId>,
    pub actor_is_admin: bool,
    pub command: Command,
}
