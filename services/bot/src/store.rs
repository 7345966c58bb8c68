use anyhow::{Context, Result};
use commonware_codec::{EncodeSize, ReadExt, Write};
use guildmint_engine::Store;
use guildmint_types::{Key, KeySpace, Value};
use std::collections::BTreeMap;
use std::path::Path;

const SNAPSHOT_VERSION: u8 = 1;

/// In-process record store with whole-file snapshot persistence.
///
/// Every record lives in memory; a snapshot is one versioned blob of all rows
/// in key order. The service only snapshots between commit batches, so a
/// snapshot is always command-consistent.
#[derive(Default)]
pub struct Records {
    rows: BTreeMap<Key, Value>,
}

impl Records {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serialize every record into one snapshot blob.
    pub fn encode(&self) -> Vec<u8> {
        let rows_size: usize = self
            .rows
            .iter()
            .map(|(key, value)| key.encode_size() + value.encode_size())
            .sum();
        let mut buf = Vec::with_capacity(1 + 4 + rows_size);
        SNAPSHOT_VERSION.write(&mut buf);
        (self.rows.len() as u32).write(&mut buf);
        for (key, value) in &self.rows {
            key.write(&mut buf);
            value.write(&mut buf);
        }
        buf
    }

    /// Rebuild a store from a snapshot blob.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let reader = &mut &bytes[..];
        let version = u8::read(reader).context("snapshot header")?;
        if version != SNAPSHOT_VERSION {
            anyhow::bail!("unsupported snapshot version {version}");
        }
        let count = u32::read(reader).context("snapshot row count")?;
        let mut rows = BTreeMap::new();
        for _ in 0..count {
            let key = Key::read(reader).context("snapshot key")?;
            let value = Value::read(reader).context("snapshot value")?;
            rows.insert(key, value);
        }
        Ok(Self { rows })
    }

    /// Load a snapshot from disk; a missing file is an empty store.
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Self::decode(&bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).context("read snapshot"),
        }
    }

    /// Write a snapshot through a temp file so a crash mid-write never leaves
    /// a truncated snapshot behind.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, self.encode())
            .await
            .context("write snapshot")?;
        tokio::fs::rename(&tmp, path)
            .await
            .context("publish snapshot")?;
        Ok(())
    }
}

impl Store for Records {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(self.rows.get(key).cloned())
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.rows.insert(key, value);
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.rows.remove(key);
        Ok(())
    }

    async fn scan(&self, space: KeySpace) -> Result<Vec<(Key, Value)>> {
        Ok(self
            .rows
            .iter()
            .filter(|(key, _)| key.space() == space)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildmint_types::economy::{Account, AuditEntry, AuditKind, GuildSettings};
    use guildmint_types::{GuildId, UserId};

    fn sample() -> Records {
        let mut store = Records::default();
        store.rows.insert(
            Key::Account(UserId(3)),
            Value::Account(Account {
                balance: 250,
                ..Default::default()
            }),
        );
        store.rows.insert(
            Key::Settings(GuildId(9)),
            Value::Settings(GuildSettings {
                daily_reward: 42,
                ..Default::default()
            }),
        );
        store.rows.insert(
            Key::Audit(7),
            Value::Audit(AuditEntry {
                id: 7,
                at_ms: 1_700_000_000_000,
                kind: AuditKind::Daily,
                user: UserId(3),
                target: None,
                delta: 100,
                item: None,
                description: Some("Claimed the daily reward".into()),
            }),
        );
        store
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let store = sample();
        let decoded = Records::decode(&store.encode()).unwrap();
        assert_eq!(decoded.rows, store.rows);
    }

    #[test]
    fn test_decode_rejects_unknown_version() {
        let mut blob = sample().encode();
        blob[0] = 9;
        assert!(Records::decode(&blob).is_err());
    }

    #[test]
    fn test_decode_rejects_truncated_blob() {
        let blob = sample().encode();
        assert!(Records::decode(&blob[..blob.len() - 1]).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let path = std::env::temp_dir().join(format!("guildmint-none-{}.snap", std::process::id()));
        let store = Records::load(&path).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("guildmint-store-{}.snap", std::process::id()));
        let store = sample();
        store.save(&path).await.unwrap();
        let reloaded = Records::load(&path).await.unwrap();
        assert_eq!(reloaded.rows, store.rows);
        let _ = tokio::fs::remove_file(&path).await;
    }
}
