//! JSON views served by the bot's HTTP API.
//!
//! These are projections of the stored records: balances become leaderboard rows,
//! claim timestamps become "next eligible" instants, and audit kinds become their
//! string labels. Anything a client can fetch lives here so the gateway and tests
//! share one shape.

use serde::{Deserialize, Serialize};

use crate::economy::{
    Account, AuditEntry, GuildSettings, ShopItem, DAILY_COOLDOWN_MS, WEEKLY_COOLDOWN_MS,
    WORK_COOLDOWN_MS,
};
use crate::event::Event;
use crate::ids::{ChannelId, GuildId, RoleId, UserId};

/// Events produced by one applied command, in emission order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryLine {
    pub item: String,
    pub quantity: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub user: UserId,
    pub balance: u64,
    pub inventory: Vec<InventoryLine>,
    pub next_daily_ms: u64,
    pub next_weekly_ms: u64,
    pub next_work_ms: u64,
}

impl AccountView {
    pub fn new(user: UserId, account: &Account) -> Self {
        Self {
            user,
            balance: account.balance,
            inventory: account
                .inventory
                .iter()
                .map(|line| InventoryLine {
                    item: line.item.clone(),
                    quantity: line.quantity,
                })
                .collect(),
            next_daily_ms: account.last_daily_ms.saturating_add(DAILY_COOLDOWN_MS),
            next_weekly_ms: account.last_weekly_ms.saturating_add(WEEKLY_COOLDOWN_MS),
            next_work_ms: account.last_work_ms.saturating_add(WORK_COOLDOWN_MS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopItemView {
    pub name: String,
    pub price: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub stock_cap: Option<u32>,
    pub user_cap: Option<u32>,
    pub remaining_stock: Option<u32>,
    pub role_reward: Option<RoleId>,
    pub sold: u32,
}

impl From<&ShopItem> for ShopItemView {
    fn from(item: &ShopItem) -> Self {
        Self {
            name: item.name.clone(),
            price: item.price,
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            stock_cap: item.stock_cap,
            user_cap: item.user_cap,
            remaining_stock: item.remaining_stock(),
            role_reward: item.role_reward,
            sold: item.sold,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub rank: u32,
    pub user: UserId,
    pub balance: u64,
}

/// Guild configuration as the gateway needs it: reward amounts for embeds, the
/// admin role for permission hints, and the log channel for routing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsView {
    pub guild: GuildId,
    pub daily_reward: u64,
    pub weekly_reward: u64,
    pub admin_role: Option<RoleId>,
    pub log_channel: Option<ChannelId>,
    pub economy_enabled: bool,
}

impl SettingsView {
    pub fn new(guild: GuildId, settings: &GuildSettings) -> Self {
        Self {
            guild,
            daily_reward: settings.daily_reward,
            weekly_reward: settings.weekly_reward,
            admin_role: settings.admin_role,
            log_channel: settings.log_channel,
            economy_enabled: settings.economy_enabled,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditView {
    pub id: u64,
    pub at_ms: u64,
    pub action: String,
    pub user: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<UserId>,
    pub delta: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&AuditEntry> for AuditView {
    fn from(entry: &AuditEntry) -> Self {
        Self {
            id: entry.id,
            at_ms: entry.at_ms,
            action: entry.kind.as_str().to_string(),
            user: entry.user,
            target: entry.target,
            delta: entry.delta,
            item: entry.item.clone(),
            description: entry.description.clone(),
        }
    }
}
