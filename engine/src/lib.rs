//! Guildmint settlement engine.
//!
//! This crate contains the deterministic command settlement logic (`Ledger`) and the
//! stateless minigame resolvers used by the bot service.
//!
//! ## Determinism requirements
//! - Do not use wall-clock time inside settlement; the caller supplies `now_ms`.
//! - Do not use ambient randomness; every draw derives from the configured secret plus a
//!   per-command domain (see [`GameRng`]).
//! - Avoid iteration order of hash-based collections influencing outputs.
//!
//! ## Settlement pipeline (example)
//! ```rust,ignore
//! # #[cfg(feature = "mocks")]
//! # {
//! use guildmint_engine::{Ledger, Sequences, Store};
//! use guildmint_engine::mocks::{funded_store, user_envelope};
//! use guildmint_types::Command;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut store = funded_store(500);
//! let sequences = Sequences::new();
//! // 1) Acquire the per-key locks for everything the command may touch.
//! // 2) Apply the command against an overlay and inspect the emitted events.
//! let mut ledger = Ledger::new(&store, &sequences, [7u8; 32], 1_000);
//! let events = ledger.apply(&user_envelope(Command::Daily)).await?;
//! // 3) Commit the buffered mutations as a single batch.
//! store.apply(ledger.commit()).await?;
//! # Ok(())
//! # }
//! # }
//! ```

pub mod games;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

mod cooldown;

mod ledger;

mod store;

mod weighted;

pub use cooldown::{check_cooldown, Cooldown};
pub use games::GameRng;
pub use ledger::{Ledger, Sequences};
pub use store::{load_account, load_item, load_settings, Status, Store};
pub use weighted::pick_weighted;

#[cfg(any(test, feature = "mocks"))]
pub use store::Memory;
