//! Shared types for the guildmint economy engine.
//!
//! Defines the economy data model (accounts, shop items, per-guild settings, audit entries,
//! blackjack sessions), the command/event surface executed by the engine, and the typed
//! key/value enums stored in the backing key-value store.
//!
//! Stored records use hand-written `commonware_codec` impls with tag bytes and
//! backwards-compatible trailing-field reads; the command/event surface carries serde derives
//! for the HTTP edge.

pub mod api;
pub mod command;
pub mod economy;
pub mod event;
mod ids;
pub mod store;

pub use command::{BlackjackAction, CoinSide, Command, Envelope, RpsHand, TicketTier};
pub use event::{Event, RoleGrant};
pub use ids::{ChannelId, GuildId, RoleId, UserId};
pub use store::{Key, KeySpace, Value};
