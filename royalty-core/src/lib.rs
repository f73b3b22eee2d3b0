//! TuneSplit Royalty Core
//!
//! Bookkeeping primitives for royalty split accounting: basis-point
//! percentage math, per-song split tables with locking, an append-only
//! deposit ledger, and per-recipient claimable balances.
//!
//! # Architecture
//!
//! - **Split tables**: per-entity arenas of recipient shares, tombstoned on
//!   removal so slot indices stay stable
//! - **Deposit ledger**: append-only, monotonic ids, one-way `distributed`
//!   flag
//! - **Claimable balances**: per-(recipient, asset) accumulators drained by
//!   claims
//!
//! # Invariants
//!
//! - Active split percentages per entity always sum to `total_allocated`
//!   and never exceed 10,000 basis points
//! - A locked table is never mutated again
//! - Payout allocation floors, so credits never exceed the deposit amount
//! - A deposit's `distributed` flag flips at most once, false → true

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod balances;
pub mod config;
pub mod deposits;
pub mod error;
pub mod percentage;
pub mod splits;
pub mod types;

// Re-exports
pub use balances::ClaimableBalanceStore;
pub use config::Config;
pub use deposits::DepositLedger;
pub use error::{Error, Result};
pub use percentage::{allocate, Bps, BASIS_POINTS};
pub use splits::{SplitRegistry, SplitTable};
pub use types::{Address, AssetId, Deposit, DepositId, EntityId, SplitInput, SplitRecord};
