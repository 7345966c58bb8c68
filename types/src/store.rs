//! Keys and values for the economy store.
//!
//! Every persisted record lives under a tagged [Key]; the tag byte doubles as the
//! keyspace prefix so scans can filter without decoding payloads.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

use crate::economy::{
    read_string, string_encode_size, write_string, Account, AuditEntry, BlackjackSession,
    GuildSettings, ShopItem, MAX_ITEM_NAME_LENGTH,
};
use crate::ids::{GuildId, UserId};

/// Coarse key grouping used by scans (leaderboards, shop listings, audit trails).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeySpace {
    Accounts,
    Items,
    Settings,
    Audit,
    Sessions,
}

#[derive(Hash, Eq, PartialEq, Ord, PartialOrd, Clone, Debug)]
pub enum Key {
    /// Per-user economy account (tag 0)
    Account(UserId),

    /// Shop catalog entry, keyed by item name (tag 1)
    Item(String),

    /// Per-guild settings (tag 2)
    Settings(GuildId),

    /// Append-only audit record (tag 3)
    Audit(u64),

    /// Active blackjack session (tag 4)
    Session(u64),
}

impl Key {
    pub fn space(&self) -> KeySpace {
        match self {
            Self::Account(_) => KeySpace::Accounts,
            Self::Item(_) => KeySpace::Items,
            Self::Settings(_) => KeySpace::Settings,
            Self::Audit(_) => KeySpace::Audit,
            Self::Session(_) => KeySpace::Sessions,
        }
    }
}

impl Write for Key {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(user) => {
                0u8.write(writer);
                user.write(writer);
            }
            Self::Item(name) => {
                1u8.write(writer);
                write_string(name, writer);
            }
            Self::Settings(guild) => {
                2u8.write(writer);
                guild.write(writer);
            }
            Self::Audit(id) => {
                3u8.write(writer);
                id.write(writer);
            }
            Self::Session(id) => {
                4u8.write(writer);
                id.write(writer);
            }
        }
    }
}

impl Read for Key {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let key = match reader.get_u8() {
            0 => Self::Account(UserId::read(reader)?),
            1 => Self::Item(read_string(reader, MAX_ITEM_NAME_LENGTH)?),
            2 => Self::Settings(GuildId::read(reader)?),
            3 => Self::Audit(u64::read(reader)?),
            4 => Self::Session(u64::read(reader)?),
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(key)
    }
}

impl EncodeSize for Key {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(_) => UserId::SIZE,
                Self::Item(name) => string_encode_size(name),
                Self::Settings(_) => GuildId::SIZE,
                Self::Audit(_) => u64::SIZE,
                Self::Session(_) => u64::SIZE,
            }
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum Value {
    /// Per-user economy account (tag 0)
    Account(Account),

    /// Shop catalog entry (tag 1)
    Item(ShopItem),

    /// Per-guild settings (tag 2)
    Settings(GuildSettings),

    /// Append-only audit record (tag 3)
    Audit(AuditEntry),

    /// Active blackjack session (tag 4)
    Session(BlackjackSession),
}

impl Write for Value {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Account(account) => {
                0u8.write(writer);
                account.write(writer);
            }
            Self::Item(item) => {
                1u8.write(writer);
                item.write(writer);
            }
            Self::Settings(settings) => {
                2u8.write(writer);
                settings.write(writer);
            }
            Self::Audit(entry) => {
                3u8.write(writer);
                entry.write(writer);
            }
            Self::Session(session) => {
                4u8.write(writer);
                session.write(writer);
            }
        }
    }
}

impl Read for Value {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = match reader.get_u8() {
            0 => Self::Account(Account::read(reader)?),
            1 => Self::Item(ShopItem::read(reader)?),
            2 => Self::Settings(GuildSettings::read(reader)?),
            3 => Self::Audit(AuditEntry::read(reader)?),
            4 => Self::Session(BlackjackSession::read(reader)?),
            i => return Err(Error::InvalidEnum(i)),
        };

        Ok(value)
    }
}

impl EncodeSize for Value {
    fn encode_size(&self) -> usize {
        u8::SIZE
            + match self {
                Self::Account(account) => account.encode_size(),
                Self::Item(item) => item.encode_size(),
                Self::Settings(settings) => settings.encode_size(),
                Self::Audit(entry) => entry.encode_size(),
                Self::Session(session) => session.encode_size(),
            }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{AuditEntry, AuditKind, BlackjackSession};
    use commonware_codec::Encode;

    #[test]
    fn test_key_roundtrip() {
        for key in [
            Key::Account(UserId(42)),
            Key::Item("Sword".to_string()),
            Key::Settings(GuildId(7)),
            Key::Audit(12),
            Key::Session(3),
        ] {
            let encoded = key.encode();
            assert_eq!(encoded.len(), key.encode_size());
            let decoded = Key::read(&mut &encoded[..]).unwrap();
            assert_eq!(key, decoded);
        }
    }

    #[test]
    fn test_key_encoding_is_stable() {
        assert_eq!(
            Key::Account(UserId(42)).encode().as_ref(),
            &[0u8, 0, 0, 0, 0, 0, 0, 0, 42]
        );
        assert_eq!(
            Key::Item("ab".to_string()).encode().as_ref(),
            &[1u8, 0, 0, 0, 2, b'a', b'b']
        );
        assert_eq!(
            Key::Audit(1).encode().as_ref(),
            &[3u8, 0, 0, 0, 0, 0, 0, 0, 1]
        );
    }

    #[test]
    fn test_key_space_matches_tag_grouping() {
        assert_eq!(Key::Account(UserId(1)).space(), KeySpace::Accounts);
        assert_eq!(Key::Item("x".to_string()).space(), KeySpace::Items);
        assert_eq!(Key::Settings(GuildId(1)).space(), KeySpace::Settings);
        assert_eq!(Key::Audit(1).space(), KeySpace::Audit);
        assert_eq!(Key::Session(1).space(), KeySpace::Sessions);
    }

    #[test]
    fn test_value_roundtrip() {
        let values = [
            Value::Account(Account {
                balance: 10,
                ..Default::default()
            }),
            Value::Item(ShopItem {
                name: "Sword".to_string(),
                price: 100,
                description: None,
                image_url: None,
                stock_cap: Some(5),
                user_cap: None,
                role_reward: None,
                sold: 0,
            }),
            Value::Settings(GuildSettings::default()),
            Value::Audit(AuditEntry {
                id: 1,
                at_ms: 2,
                kind: AuditKind::Daily,
                user: UserId(3),
                target: None,
                delta: 100,
                item: None,
                description: None,
            }),
            Value::Session(BlackjackSession {
                id: 1,
                owner: UserId(3),
                guild: GuildId(7),
                stake: 25,
                deadline_ms: 60_000,
                move_count: 0,
                state: vec![1, 2, 3],
            }),
        ];
        for value in values {
            let encoded = value.encode();
            assert_eq!(encoded.len(), value.encode_size());
            let decoded = Value::read(&mut &encoded[..]).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_value_rejects_unknown_tag() {
        let buf = [5u8];
        let err = Value::read(&mut &buf[..]).expect_err("should reject unknown tag");
        assert!(matches!(err, Error::InvalidEnum(5)));
    }
}
