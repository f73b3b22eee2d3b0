//! Royalty Settlement Engine
//!
//! Converts recorded royalty deposits into per-recipient claimable credits
//! according to each song's split table, and pays credits out through an
//! external custody ledger.
//!
//! # Flow
//!
//! 1. **Configure**: an owner or operator sets a song's splits, then locks
//!    them
//! 2. **Deposit**: a depositor records inbound royalties, funds are pulled
//!    through the custody ledger
//! 3. **Settle**: the engine marks the deposit distributed, then credits
//!    each active recipient their floored share
//! 4. **Claim**: recipients drain their claimable balances; the engine
//!    instructs the custody ledger to transfer
//!
//! # Example
//!
//! ```no_run
//! use settlement::{Config, SettlementEngine};
//! use settlement::auth::Role;
//! use settlement::testing::{FlakyLedger, StaticOwners, StaticRoles};
//! use royalty_core::{Address, AssetId, EntityId, SplitInput};
//! use std::sync::Arc;
//!
//! fn main() -> settlement::Result<()> {
//!     let song = EntityId::new(1);
//!     let engine = SettlementEngine::new(
//!         Config::default(),
//!         &royalty_core::Config::default(),
//!         Arc::new(StaticOwners::single(song, "OWNER")),
//!         Arc::new(StaticRoles::new(&[("DEP", Role::Depositor)])),
//!         Arc::new(FlakyLedger::default()),
//!     );
//!
//!     let owner = Address::new("OWNER");
//!     engine.configure_splits(&owner, song, &[
//!         SplitInput::new(Address::new("ARTIST"), 7000, "artist"),
//!         SplitInput::new(Address::new("PRODUCER"), 3000, "producer"),
//!     ])?;
//!
//!     let id = engine.record_deposit(
//!         &Address::new("DEP"), song, 1000, AssetId::native(), "spotify", "US",
//!     )?;
//!     let outcome = engine.settle(id)?;
//!     println!("credited {} recipients", outcome.credited.len());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod testing;
pub mod types;

// Re-exports
pub use config::Config;
pub use engine::SettlementEngine;
pub use error::{Error, Result};
pub use types::{BatchOutcome, SettlementOutcome};
