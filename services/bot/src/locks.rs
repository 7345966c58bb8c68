use guildmint_types::{Command, Envelope, GuildId, UserId};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// A unit of mutual exclusion for one command.
///
/// Variant order is lock order: guards are always taken in ascending `Ord`
/// position, so two commands that share any subset of keys cannot deadlock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LockKey {
    Settings(GuildId),
    Account(UserId),
    Catalog,
    Sessions,
}

/// The lock set a command must hold while it settles.
///
/// Every command locks its actor's account. Catalog and session commands take a
/// whole-space lock rather than per-item or per-session keys: catalog writes
/// check for duplicates across all items, and dealing a hand scans for the
/// actor's existing session, so narrower keys would not make those reads safe.
pub fn lock_keys(envelope: &Envelope) -> BTreeSet<LockKey> {
    let mut keys = BTreeSet::from([LockKey::Account(envelope.actor)]);
    match &envelope.command {
        Command::Daily
        | Command::Weekly
        | Command::Work
        | Command::Slots { .. }
        | Command::FlipCoin { .. }
        | Command::Rps { .. }
        | Command::Lottery { .. }
        | Command::SpinWheel { .. } => {}
        Command::BlackjackDeal { .. } | Command::BlackjackMove { .. } => {
            keys.insert(LockKey::Sessions);
        }
        Command::Buy { .. }
        | Command::AddItem { .. }
        | Command::EditItem { .. }
        | Command::RemoveItem { .. }
        | Command::ClearShop => {
            keys.insert(LockKey::Catalog);
        }
        Command::AddCoins { target, .. }
        | Command::RemoveCoins { target, .. }
        | Command::SetCoins { target, .. }
        | Command::ResetInventory { target } => {
            keys.insert(LockKey::Account(*target));
        }
        Command::Setup { .. } | Command::EnableEconomy | Command::DisableEconomy => {
            keys.insert(LockKey::Settings(envelope.guild));
        }
    }
    keys
}

/// Registry of per-key async mutexes.
///
/// Entries are created on first use and never evicted; the key space is small
/// (one per active account plus a handful of singletons), so the map stays
/// proportional to the guild's population.
#[derive(Default)]
pub struct KeyLocks {
    locks: Mutex<HashMap<LockKey, Arc<tokio::sync::Mutex<()>>>>,
}

impl KeyLocks {
    /// Acquire every lock in the set, in ascending key order.
    ///
    /// The returned guards release on drop. Callers must pass the full set for
    /// the command up front; acquiring incrementally would break the ordering
    /// guarantee.
    pub async fn acquire(&self, keys: &BTreeSet<LockKey>) -> Vec<OwnedMutexGuard<()>> {
        let handles: Vec<_> = {
            let mut locks = self.locks.lock().unwrap();
            keys.iter()
                .map(|key| {
                    locks
                        .entry(*key)
                        .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                        .clone()
                })
                .collect()
        };
        let mut guards = Vec::with_capacity(handles.len());
        for handle in handles {
            guards.push(handle.lock_owned().await);
        }
        guards
    }
}
