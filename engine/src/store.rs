use anyhow::Result;
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, Read, ReadExt, Write};
use guildmint_types::{
    economy::{Account, GuildSettings, ShopItem},
    GuildId, Key, KeySpace, UserId, Value,
};
use std::future::Future;

#[cfg(any(test, feature = "mocks"))]
use std::collections::BTreeMap;

/// Backing key-value store for economy records.
///
/// The engine only reads and writes through this trait; durability, locking, and
/// batching live with the implementor. `scan` must return records ordered by key so
/// settlement output never depends on storage iteration order.
pub trait Store {
    fn get(&self, key: &Key) -> impl Future<Output = Result<Option<Value>>>;
    fn insert(&mut self, key: Key, value: Value) -> impl Future<Output = Result<()>>;
    fn delete(&mut self, key: &Key) -> impl Future<Output = Result<()>>;
    fn scan(&self, space: KeySpace) -> impl Future<Output = Result<Vec<(Key, Value)>>>;

    fn apply(&mut self, changes: Vec<(Key, Status)>) -> impl Future<Output = Result<()>> {
        async {
            for (key, status) in changes {
                match status {
                    Status::Update(value) => self.insert(key, value).await?,
                    Status::Delete => self.delete(&key).await?,
                }
            }
            Ok(())
        }
    }
}

/// In-memory store used by tests and fixtures.
#[cfg(any(test, feature = "mocks"))]
#[derive(Default)]
pub struct Memory {
    records: BTreeMap<Key, Value>,
}

#[cfg(any(test, feature = "mocks"))]
impl Memory {
    /// Build a store preloaded with the given records.
    pub fn seeded(records: impl IntoIterator<Item = (Key, Value)>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

#[cfg(any(test, feature = "mocks"))]
impl Store for Memory {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.records.get(key).cloned())
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.records.insert(key, value);
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.records.remove(key);
        Ok(())
    }

    async fn scan(&self, space: KeySpace) -> Result<Vec<(Key, Value)>> {
        Ok(self
            .records
            .iter()
            .filter(|(key, _)| key.space() == space)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

/// A buffered mutation produced by settlement and applied as part of a commit batch.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(clippy::large_enum_variant)]
pub enum Status {
    Update(Value),
    Delete,
}

impl Write for Status {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Status::Update(value) => {
                0u8.write(writer);
                value.write(writer);
            }
            Status::Delete => 1u8.write(writer),
        }
    }
}

impl Read for Status {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Status::Update(Value::read(reader)?)),
            1 => Ok(Status::Delete),
            _ => Err(Error::InvalidEnum(kind)),
        }
    }
}

impl EncodeSize for Status {
    fn encode_size(&self) -> usize {
        1 + match self {
            Status::Update(value) => value.encode_size(),
            Status::Delete => 0,
        }
    }
}

/// Load a user's account, falling back to a fresh default for first-touch users.
pub async fn load_account<S: Store>(store: &S, user: UserId) -> Result<Account> {
    Ok(match store.get(&Key::Account(user)).await? {
        Some(Value::Account(account)) => account,
        _ => Account::default(),
    })
}

/// Load a guild's settings, falling back to the defaults when setup has not run.
pub async fn load_settings<S: Store>(store: &S, guild: GuildId) -> Result<GuildSettings> {
    Ok(match store.get(&Key::Settings(guild)).await? {
        Some(Value::Settings(settings)) => settings,
        _ => GuildSettings::default(),
    })
}

/// Load a shop item by name; `None` when the catalog has no such entry.
pub async fn load_item<S: Store>(store: &S, name: &str) -> Result<Option<ShopItem>> {
    Ok(match store.get(&Key::Item(name.to_string())).await? {
        Some(Value::Item(item)) => Some(item),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonware_codec::Encode;

    #[test]
    fn test_status_roundtrip() {
        let statuses = [
            Status::Update(Value::Account(Account {
                balance: 42,
                ..Default::default()
            })),
            Status::Delete,
        ];
        for status in statuses {
            let encoded = status.encode();
            assert_eq!(encoded.len(), status.encode_size());
            let decoded = Status::read(&mut &encoded[..]).unwrap();
            assert_eq!(status, decoded);
        }
    }

    #[test]
    fn test_status_rejects_unknown_tag() {
        let buf = [2u8];
        let err = Status::read(&mut &buf[..]).expect_err("should reject unknown tag");
        assert!(matches!(err, Error::InvalidEnum(2)));
    }

    #[tokio::test]
    async fn test_memory_scan_filters_and_orders() {
        let mut store = Memory::default();
        store
            .insert(
                Key::Item("beta".to_string()),
                Value::Item(ShopItem {
                    name: "beta".to_string(),
                    price: 10,
                    description: None,
                    image_url: None,
                    stock_cap: None,
                    user_cap: None,
                    role_reward: None,
                    sold: 0,
                }),
            )
            .await
            .unwrap();
        store
            .insert(
                Key::Item("alpha".to_string()),
                Value::Item(ShopItem {
                    name: "alpha".to_string(),
                    price: 5,
                    description: None,
                    image_url: None,
                    stock_cap: None,
                    user_cap: None,
                    role_reward: None,
                    sold: 0,
                }),
            )
            .await
            .unwrap();
        store
            .insert(
                Key::Account(UserId(1)),
                Value::Account(Account::default()),
            )
            .await
            .unwrap();

        let items = store.scan(KeySpace::Items).await.unwrap();
        let names: Vec<_> = items
            .iter()
            .map(|(key, _)| match key {
                Key::Item(name) => name.as_str(),
                _ => panic!("scan leaked a non-item key"),
            })
            .collect();
        assert_eq!(names, vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn test_load_account_defaults_for_unknown_user() {
        let store = Memory::default();
        let account = load_account(&store, UserId(9)).await.unwrap();
        assert_eq!(account, Account::default());
    }
}
