//! Result types for settlement operations

use chrono::{DateTime, Utc};
use royalty_core::{Address, AssetId, DepositId, EntityId};
use serde::{Deserialize, Serialize};

/// Outcome of settling one deposit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Deposit that was settled
    pub deposit_id: DepositId,

    /// Entity the deposit belonged to
    pub entity_id: EntityId,

    /// Asset the deposit was made in
    pub asset: AssetId,

    /// Original deposit amount
    pub deposit_amount: u128,

    /// Per-recipient credits applied, in split insertion order
    ///
    /// Recipients whose floored share was zero are absent.
    pub credited: Vec<(Address, u128)>,

    /// Sum of applied credits
    pub total_credited: u128,

    /// Floor-rounding remainder retained by the pool
    pub dust: u128,

    /// When settlement ran
    pub settled_at: DateTime<Utc>,
}

/// Aggregate outcome of a best-effort batch settlement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Deposits settled
    pub settled: usize,

    /// Deposits skipped (unknown id or already distributed)
    pub skipped: usize,

    /// Total credited across the batch
    pub total_credited: u128,
}
