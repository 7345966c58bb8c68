use anyhow::Result;
use guildmint_types::economy::{
    Account, AuditEntry, AuditKind, BlackjackSession, GuildSettings, ShopItem,
};
use guildmint_types::{
    ChannelId, Command, Envelope, Event, GuildId, Key, KeySpace, RoleId, UserId, Value,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::games::GameRng;
use crate::store::{Status, Store};

mod handlers;


/// Monotonic id sources shared by every ledger the service builds.
///
/// Both counters hand out strictly increasing ids across concurrent commands; seed
/// them from the highest persisted id before serving traffic.
#[derive(Debug, Default)]
pub struct Sequences {
    audit: AtomicU64,
    session: AtomicU64,
}

impl Sequences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the audit floor to at least `id`; used when replaying persisted records.
    pub fn observe_audit(&self, id: u64) {
        self.audit.fetch_max(id, Ordering::Relaxed);
    }

    pub fn observe_session(&self, id: u64) {
        self.session.fetch_max(id, Ordering::Relaxed);
    }

    pub fn next_audit(&self) -> u64 {
        self.audit.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn next_session(&self) -> u64 {
        self.session.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// Buffered settlement of one command (or one expiry sweep).
///
/// All reads go through the pending overlay, so a handler observes its own writes;
/// nothing reaches the backing store until the caller applies [`Ledger::commit`].
/// The caller must hold the per-key locks for everything the command can touch for
/// the whole apply-and-commit span.
pub struct Ledger<'a, S: Store> {
    store: &'a S,
    pending: BTreeMap<Key, Status>,

    sequences: &'a Sequences,
    secret: [u8; 32],
    now_ms: u64,
}

impl<'a, S: Store> Ledger<'a, S> {
    pub fn new(store: &'a S, sequences: &'a Sequences, secret: [u8; 32], now_ms: u64) -> Self {
        Self {
            store,
            pending: BTreeMap::new(),

            sequences,
            secret,
            now_ms,
        }
    }

    fn insert(&mut self, key: Key, value: Value) {
        self.pending.insert(key, Status::Update(value));
    }

    fn remove(&mut self, key: &Key) {
        self.pending.insert(key.clone(), Status::Delete);
    }

    fn rng(&self, stream: u64, step: u32) -> GameRng {
        GameRng::new(&self.secret, stream, step)
    }

    async fn account(&self, user: UserId) -> Result<Account> {
        Ok(match self.get(&Key::Account(user)).await? {
            Some(Value::Account(account)) => account,
            _ => Account::default(),
        })
    }

    async fn settings(&self, guild: GuildId) -> Result<GuildSettings> {
        Ok(match self.get(&Key::Settings(guild)).await? {
            Some(Value::Settings(settings)) => settings,
            _ => GuildSettings::default(),
        })
    }

    async fn item(&self, name: &str) -> Result<Option<ShopItem>> {
        Ok(match self.get(&Key::Item(name.to_string())).await? {
            Some(Value::Item(item)) => Some(item),
            _ => None,
        })
    }

    async fn session(&self, id: u64) -> Result<Option<BlackjackSession>> {
        Ok(match self.get(&Key::Session(id)).await? {
            Some(Value::Session(session)) => Some(session),
            _ => None,
        })
    }

    /// The player's active session, if any. Sessions are few and short-lived, so a
    /// keyspace walk is fine here.
    async fn session_for_user(&self, user: UserId) -> Result<Option<BlackjackSession>> {
        for (_, value) in self.scan(KeySpace::Sessions).await? {
            if let Value::Session(session) = value {
                if session.owner == user {
                    return Ok(Some(session));
                }
            }
        }
        Ok(None)
    }

    /// Append one audit row under a fresh id and return that id.
    #[allow(clippy::too_many_arguments)]
    fn audit(
        &mut self,
        kind: AuditKind,
        user: UserId,
        target: Option<UserId>,
        delta: i64,
        item: Option<String>,
        description: Option<String>,
    ) -> u64 {
        let id = self.sequences.next_audit();
        self.audit_with_id(id, kind, user, target, delta, item, description);
        id
    }

    /// Append one audit row under a pre-allocated id (games allocate early so the
    /// same id seeds their randomness domain).
    #[allow(clippy::too_many_arguments)]
    fn audit_with_id(
        &mut self,
        id: u64,
        kind: AuditKind,
        user: UserId,
        target: Option<UserId>,
        delta: i64,
        item: Option<String>,
        description: Option<String>,
    ) {
        let entry = AuditEntry {
            id,
            at_ms: self.now_ms,
            kind,
            user,
            target,
            delta,
            item,
            description,
        };
        self.insert(Key::Audit(id), Value::Audit(entry));
    }

    /// Settle one command and return the events it produced.
    ///
    /// Business rejections (cooldowns, funds, stock) come back as
    /// [`Event::CommandFailed`] with nothing buffered; `Err` is reserved for store
    /// faults, after which the ledger must be dropped uncommitted.
    pub async fn apply(&mut self, envelope: &Envelope) -> Result<Vec<Event>> {
        let settings = self.settings(envelope.guild).await?;

        if envelope.command.requires_admin() && !is_admin(envelope, &settings) {
            return Ok(vec![Event::CommandFailed {
                user: envelope.actor,
                code: guildmint_types::economy::ERROR_PERMISSION_DENIED,
                message: "Administrator permissions required".to_string(),
            }]);
        }
        if !settings.economy_enabled && !envelope.command.allowed_while_disabled() {
            return Ok(vec![Event::CommandFailed {
                user: envelope.actor,
                code: guildmint_types::economy::ERROR_ECONOMY_DISABLED,
                message: "The economy is disabled in this server".to_string(),
            }]);
        }

        match &envelope.command {
            Command::Daily => self.handle_daily(envelope, &settings).await,
            Command::Weekly => self.handle_weekly(envelope, &settings).await,
            Command::Work => self.handle_work(envelope).await,
            Command::Slots { stake } => self.handle_slots(envelope, *stake).await,
            Command::FlipCoin { stake, side } => {
                self.handle_flip_coin(envelope, *stake, *side).await
            }
            Command::Rps { stake, hand } => self.handle_rps(envelope, *stake, *hand).await,
            Command::Lottery { tier } => self.handle_lottery(envelope, *tier).await,
            Command::SpinWheel { stake } => self.handle_spin_wheel(envelope, *stake).await,
            Command::BlackjackDeal { stake } => self.handle_blackjack_deal(envelope, *stake).await,
            Command::BlackjackMove { session_id, action } => {
                self.handle_blackjack_move(envelope, *session_id, *action).await
            }
            Command::Buy { item } => self.handle_buy(envelope, item).await,
            Command::AddItem {
                name,
                price,
                description,
                image_url,
                stock_cap,
                user_cap,
                role_reward,
            } => {
                self.handle_add_item(
                    envelope,
                    name,
                    *price,
                    description.as_deref(),
                    image_url.as_deref(),
                    *stock_cap,
                    *user_cap,
                    *role_reward,
                )
                .await
            }
            Command::EditItem {
                name,
                price,
                description,
                image_url,
                stock_cap,
                user_cap,
                role_reward,
            } => {
                self.handle_edit_item(
                    envelope,
                    name,
                    *price,
                    description.as_deref(),
                    image_url.as_deref(),
                    *stock_cap,
                    *user_cap,
                    *role_reward,
                )
                .await
            }
            Command::RemoveItem { name } => self.handle_remove_item(envelope, name).await,
            Command::ClearShop => self.handle_clear_shop(envelope).await,
            Command::AddCoins { target, amount } => {
                self.handle_add_coins(envelope, *target, *amount).await
            }
            Command::RemoveCoins { target, amount } => {
                self.handle_remove_coins(envelope, *target, *amount).await
            }
            Command::SetCoins { target, amount } => {
                self.handle_set_coins(envelope, *target, *amount).await
            }
            Command::ResetInventory { target } => {
                self.handle_reset_inventory(envelope, *target).await
            }
            Command::Setup {
                daily_reward,
                weekly_reward,
                admin_role,
                log_channel,
            } => {
                self.handle_setup(
                    envelope,
                    *daily_reward,
                    *weekly_reward,
                    *admin_role,
                    *log_channel,
                )
                .await
            }
            Command::EnableEconomy => self.handle_set_economy_enabled(envelope, true).await,
            Command::DisableEconomy => self.handle_set_economy_enabled(envelope, false).await,
        }
    }

    /// Refund and delete one session if its deadline has passed.
    ///
    /// Returns no events when the session is gone or still live, so a sweep can
    /// re-check candidates from a stale scan without holding every lock at once.
    pub async fn expire_session_if_due(&mut self, session_id: u64) -> Result<Vec<Event>> {
        let Some(session) = self.session(session_id).await? else {
            return Ok(Vec::new());
        };
        if session.deadline_ms > self.now_ms {
            return Ok(Vec::new());
        }
        self.expire_session(session).await
    }

    /// Refund and delete every session whose deadline has passed.
    ///
    /// The service runs this on a timer; a move against an expired session takes the
    /// same path inline.
    pub async fn expire_sessions(&mut self) -> Result<Vec<Event>> {
        let mut events = Vec::new();
        for (_, value) in self.scan(KeySpace::Sessions).await? {
            let Value::Session(session) = value else {
                continue;
            };
            if session.deadline_ms > self.now_ms {
                continue;
            }
            events.extend(self.expire_session(session).await?);
        }
        Ok(events)
    }

    async fn expire_session(&mut self, session: BlackjackSession) -> Result<Vec<Event>> {
        let mut account = self.account(session.owner).await?;
        account.balance = account.balance.saturating_add(session.stake);
        let balance = account.balance;
        self.insert(Key::Account(session.owner), Value::Account(account));
        self.remove(&Key::Session(session.id));

        debug!(
            session = session.id,
            owner = session.owner.0,
            refunded = session.stake,
            "blackjack session timed out"
        );

        Ok(vec![Event::BlackjackExpired {
            session_id: session.id,
            user: session.owner,
            refunded: session.stake,
            balance,
        }])
    }

    pub fn commit(self) -> Vec<(Key, Status)> {
        self.pending.into_iter().collect()
    }
}

fn is_admin(envelope: &Envelope, settings: &GuildSettings) -> bool {
    if envelope.actor_is_admin {
        return true;
    }
    settings
        .admin_role
        .map_or(false, |role| envelope.actor_roles.contains(&role))
}

impl<'a, S: Store> Store for Ledger<'a, S> {
    async fn get(&self, key: &Key) -> Result<Option<Value>> {
        Ok(match self.pending.get(key) {
            Some(Status::Update(value)) => Some(value.clone()),
            Some(Status::Delete) => None,
            None => self.store.get(key).await?,
        })
    }

    async fn insert(&mut self, key: Key, value: Value) -> Result<()> {
        self.pending.insert(key, Status::Update(value));
        Ok(())
    }

    async fn delete(&mut self, key: &Key) -> Result<()> {
        self.pending.insert(key.clone(), Status::Delete);
        Ok(())
    }

    async fn scan(&self, space: KeySpace) -> Result<Vec<(Key, Value)>> {
        let mut rows: BTreeMap<Key, Value> = self.store.scan(space).await?.into_iter().collect();
        for (key, status) in &self.pending {
            if key.space() != space {
                continue;
            }
            match status {
                Status::Update(value) => {
                    rows.insert(key.clone(), value.clone());
                }
                Status::Delete => {
                    rows.remove(key);
                }
            }
        }
        Ok(rows.into_iter().collect())
    }
}
