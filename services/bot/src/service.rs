use anyhow::{Context, Result};
use guildmint_engine::{load_account, load_settings, Ledger, Sequences, Status, Store};
use guildmint_types::api::{AccountView, AuditView, LeaderboardRow, SettingsView, ShopItemView};
use guildmint_types::{Envelope, Event, GuildId, Key, KeySpace, UserId, Value};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tracing::info;

use crate::locks::{lock_keys, KeyLocks, LockKey};
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::store::Records;

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub struct ServiceConfig {
    /// Seed material for game randomness.
    pub secret: [u8; 32],
    /// Where to persist the record snapshot; `None` keeps everything in memory.
    pub snapshot_path: Option<PathBuf>,
}

/// The settlement service behind the HTTP API.
///
/// Commands settle under per-key locks so two commands touching the same
/// account, the catalog, or the session table never interleave, while
/// commands with disjoint keys run concurrently. The store itself sits behind
/// a read-write lock: settlement reads through a shared guard and batches its
/// writes, then the commit takes the exclusive guard just long enough to apply
/// the batch and write the snapshot.
pub struct Service {
    store: RwLock<Records>,
    locks: KeyLocks,
    sequences: Sequences,
    metrics: Metrics,
    config: ServiceConfig,
}

impl Service {
    /// Load the snapshot (or start empty) and resume id sequences from the
    /// highest audit and session ids on record.
    pub async fn init(config: ServiceConfig) -> Result<Self> {
        let store = match &config.snapshot_path {
            Some(path) => Records::load(path).await?,
            None => Records::default(),
        };

        let sequences = Sequences::new();
        for (key, _) in store.scan(KeySpace::Audit).await? {
            if let Key::Audit(id) = key {
                sequences.observe_audit(id);
            }
        }
        for (key, _) in store.scan(KeySpace::Sessions).await? {
            if let Key::Session(id) = key {
                sequences.observe_session(id);
            }
        }

        info!(records = store.len(), "store loaded");
        Ok(Self {
            store: RwLock::new(store),
            locks: KeyLocks::default(),
            sequences,
            metrics: Metrics::default(),
            config,
        })
    }

    /// Settle one command and commit its changes.
    ///
    /// Returns the settlement events, failures included; an `Err` means the
    /// store itself misbehaved and nothing was committed.
    pub async fn apply_command(&self, envelope: &Envelope, now_ms: u64) -> Result<Vec<Event>> {
        let started = Instant::now();
        let wanted = lock_keys(envelope);
        let _guards = self.locks.acquire(&wanted).await;

        let (events, changes) = {
            let store = self.store.read().await;
            let mut ledger = Ledger::new(&*store, &self.sequences, self.config.secret, now_ms);
            match ledger.apply(envelope).await {
                Ok(events) => (events, ledger.commit()),
                Err(err) => {
                    self.metrics.record_store_fault();
                    return Err(err);
                }
            }
        };
        if let Err(err) = self.commit(changes).await {
            self.metrics.record_store_fault();
            return Err(err);
        }

        let rejected = events.iter().any(|event| event.is_failure());
        self.metrics.record_command(started.elapsed(), rejected);
        Ok(events)
    }

    /// Refund every blackjack hand whose deadline has passed.
    ///
    /// Scans without locks, then re-checks each candidate under its owner's
    /// account lock and the session lock, so a hand settled by a racing move
    /// command is skipped rather than double-credited.
    pub async fn expire_due_sessions(&self, now_ms: u64) -> Result<u64> {
        let due: Vec<(u64, UserId)> = {
            let store = self.store.read().await;
            store
                .scan(KeySpace::Sessions)
                .await?
                .into_iter()
                .filter_map(|(_, value)| match value {
                    Value::Session(session) if session.deadline_ms <= now_ms => {
                        Some((session.id, session.owner))
                    }
                    _ => None,
                })
                .collect()
        };

        let mut expired = 0u64;
        for (session_id, owner) in due {
            let wanted = BTreeSet::from([LockKey::Account(owner), LockKey::Sessions]);
            let _guards = self.locks.acquire(&wanted).await;
            let (events, changes) = {
                let store = self.store.read().await;
                let mut ledger =
                    Ledger::new(&*store, &self.sequences, self.config.secret, now_ms);
                let events = ledger.expire_session_if_due(session_id).await?;
                (events, ledger.commit())
            };
            if events.is_empty() {
                continue;
            }
            self.commit(changes).await?;
            expired += 1;
        }

        if expired > 0 {
            self.metrics.record_expired(expired);
            info!(expired, "refunded timed-out blackjack hands");
        }
        Ok(expired)
    }

    async fn commit(&self, changes: Vec<(Key, Status)>) -> Result<()> {
        let mut store = self.store.write().await;
        store.apply(changes).await?;
        if let Some(path) = &self.config.snapshot_path {
            store.save(path).await.context("persist snapshot")?;
        }
        Ok(())
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub async fn account_view(&self, user: UserId) -> Result<AccountView> {
        let store = self.store.read().await;
        let account = load_account(&*store, user).await?;
        Ok(AccountView::new(user, &account))
    }

    pub async fn settings_view(&self, guild: GuildId) -> Result<SettingsView> {
        let store = self.store.read().await;
        let settings = load_settings(&*store, guild).await?;
        Ok(SettingsView::new(guild, &settings))
    }

    pub async fn shop_view(&self) -> Result<Vec<ShopItemView>> {
        let store = self.store.read().await;
        Ok(store
            .scan(KeySpace::Items)
            .await?
            .iter()
            .filter_map(|(_, value)| match value {
                Value::Item(item) => Some(ShopItemView::from(item)),
                _ => None,
            })
            .collect())
    }

    pub async fn leaderboard_view(&self, limit: usize) -> Result<Vec<LeaderboardRow>> {
        let store = self.store.read().await;
        let mut rows: Vec<(UserId, u64)> = store
            .scan(KeySpace::Accounts)
            .await?
            .into_iter()
            .filter_map(|(key, value)| match (key, value) {
                (Key::Account(user), Value::Account(account)) => Some((user, account.balance)),
                _ => None,
            })
            .collect();
        // Highest balance first; user id breaks ties so ranks are stable.
        rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        Ok(rows
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(idx, (user, balance))| LeaderboardRow {
                rank: (idx + 1) as u32,
                user,
                balance,
            })
            .collect())
    }

    /// The most recent audit rows, newest first.
    pub async fn audit_view(&self, limit: usize) -> Result<Vec<AuditView>> {
        let store = self.store.read().await;
        let rows = store.scan(KeySpace::Audit).await?;
        Ok(rows
            .iter()
            .rev()
            .take(limit)
            .filter_map(|(_, value)| match value {
                Value::Audit(entry) => Some(AuditView::from(entry)),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildmint_engine::mocks::{admin_envelope, user_envelope, MEMBER};
    use guildmint_types::economy::DAILY_COOLDOWN_MS;
    use guildmint_types::Command;

    const SECRET: [u8; 32] = [3u8; 32];
    const NOW: u64 = 1_700_000_000_000;

    fn config(snapshot_path: Option<PathBuf>) -> ServiceConfig {
        ServiceConfig {
            secret: SECRET,
            snapshot_path,
        }
    }

    #[tokio::test]
    async fn test_apply_command_updates_views_and_metrics() {
        let service = Service::init(config(None)).await.unwrap();

        let events = service
            .apply_command(&user_envelope(Command::Daily), NOW)
            .await
            .unwrap();
        assert_eq!(events.len(), 1);
        assert!(!events[0].is_failure());

        let account = service.account_view(MEMBER).await.unwrap();
        assert_eq!(account.balance, 100);
        assert_eq!(account.next_daily_ms, NOW + DAILY_COOLDOWN_MS);

        let audit = service.audit_view(10).await.unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].action, "daily");
        assert_eq!(audit[0].delta, 100);

        let board = service.leaderboard_view(10).await.unwrap();
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].user, MEMBER);

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.commands_applied, 1);
        assert_eq!(snapshot.commands_rejected, 0);
        assert_eq!(snapshot.settle.count, 1);
    }

    #[tokio::test]
    async fn test_failure_events_count_as_rejected() {
        let service = Service::init(config(None)).await.unwrap();

        let events = service
            .apply_command(&user_envelope(Command::Slots { stake: 50 }), NOW)
            .await
            .unwrap();
        assert!(events[0].is_failure());

        let snapshot = service.metrics_snapshot();
        assert_eq!(snapshot.commands_applied, 1);
        assert_eq!(snapshot.commands_rejected, 1);
    }

    #[tokio::test]
    async fn test_snapshot_restores_state_and_sequences() {
        let path = std::env::temp_dir().join(format!(
            "guildmint-service-{}.snap",
            std::process::id()
        ));
        let _ = tokio::fs::remove_file(&path).await;

        let service = Service::init(config(Some(path.clone()))).await.unwrap();
        service
            .apply_command(&user_envelope(Command::Daily), NOW)
            .await
            .unwrap();
        drop(service);

        let revived = Service::init(config(Some(path.clone()))).await.unwrap();
        assert_eq!(revived.account_view(MEMBER).await.unwrap().balance, 100);

        // Ids keep counting from the snapshot rather than restarting at one.
        revived
            .apply_command(&user_envelope(Command::Work), NOW)
            .await
            .unwrap();
        let audit = revived.audit_view(10).await.unwrap();
        assert_eq!(audit.len(), 2);
        assert_eq!(audit[0].id, 2);
        assert_eq!(audit[1].id, 1);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_sweep_refunds_abandoned_hands() {
        let service = Service::init(config(None)).await.unwrap();
        service
            .apply_command(
                &admin_envelope(Command::AddCoins {
                    target: MEMBER,
                    amount: 1_000,
                }),
                NOW,
            )
            .await
            .unwrap();

        // Deals are deterministic in (secret, user, time); walk timestamps
        // until one leaves an open hand instead of settling a natural.
        let mut open = None;
        for offset in 0..20 {
            let at = NOW + offset;
            let balance = service.account_view(MEMBER).await.unwrap().balance;
            let events = service
                .apply_command(&user_envelope(Command::BlackjackDeal { stake: 30 }), at)
                .await
                .unwrap();
            if let Event::BlackjackStarted { deadline_ms, .. } = &events[0] {
                open = Some((balance, *deadline_ms));
                break;
            }
        }
        let (balance_before, deadline_ms) = open.unwrap();

        assert_eq!(service.expire_due_sessions(deadline_ms - 1).await.unwrap(), 0);
        assert_eq!(service.expire_due_sessions(deadline_ms).await.unwrap(), 1);
        assert_eq!(
            service.account_view(MEMBER).await.unwrap().balance,
            balance_before
        );

        // The refunded hand is gone, so a second sweep finds nothing.
        assert_eq!(service.expire_due_sessions(deadline_ms).await.unwrap(), 0);
        assert_eq!(service.metrics_snapshot().sessions_expired, 1);
    }
}
