//! Fixtures shared by the engine's tests and the bot service's.

use guildmint_types::economy::{Account, ShopItem};
use guildmint_types::{ChannelId, Command, Envelope, GuildId, Key, RoleId, UserId, Value};

use crate::store::Memory;

/// Guild every fixture envelope runs in.
pub const GUILD: GuildId = GuildId(900);
/// Channel every fixture envelope arrives from.
pub const CHANNEL: ChannelId = ChannelId(901);
/// The ordinary member fixtures act as.
pub const MEMBER: UserId = UserId(10);
/// The administrator fixtures act as.
pub const ADMIN: UserId = UserId(11);

/// A store holding one member account with the given balance.
pub fn funded_store(balance: u64) -> Memory {
    Memory::seeded([(
        Key::Account(MEMBER),
        Value::Account(Account {
            balance,
            ..Default::default()
        }),
    )])
}

/// An envelope for [`MEMBER`] with no roles and no admin permission.
pub fn user_envelope(command: Command) -> Envelope {
    Envelope {
        guild: GUILD,
        channel: CHANNEL,
        actor: MEMBER,
        actor_roles: Vec::new(),
        actor_is_admin: false,
        command,
    }
}

/// An envelope for [`MEMBER`] holding the given roles, still without the
/// platform admin permission.
pub fn role_envelope(command: Command, roles: Vec<RoleId>) -> Envelope {
    Envelope {
        guild: GUILD,
        channel: CHANNEL,
        actor: MEMBER,
        actor_roles: roles,
        actor_is_admin: false,
        command,
    }
}

/// An envelope for [`ADMIN`] carrying the platform administrator permission.
pub fn admin_envelope(command: Command) -> Envelope {
    Envelope {
        guild: GUILD,
        channel: CHANNEL,
        actor: ADMIN,
        actor_roles: Vec::new(),
        actor_is_admin: true,
        command,
    }
}

/// A catalog entry with just a name and price; callers override the rest.
pub fn shop_item(name: &str, price: u64) -> ShopItem {
    ShopItem {
        name: name.to_string(),
        price,
        description: None,
        image_url: None,
        stock_cap: None,
        user_cap: None,
        role_reward: None,
        sold: 0,
    }
}
