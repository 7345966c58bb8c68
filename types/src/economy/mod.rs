//! Economy domain types.
//!
//! Defines account/shop/settings/audit/session state and constants used by the engine and the
//! bot service.

mod account;
mod audit;
mod codec;
mod constants;
mod session;
mod settings;
mod shop;

pub use account::{Account, AccountInvariantError, OwnedItem};
pub use audit::{AuditEntry, AuditKind};
pub use codec::{
    opt_string_encode_size, read_opt_string, read_string, string_encode_size, write_opt_string,
    write_string,
};
pub use constants::*;
pub use session::BlackjackSession;
pub use settings::GuildSettings;
pub use shop::{ShopItem, ShopItemInvariantError};

#[cfg(test)]
mod tests;
