//! Core types for royalty accounting
//!
//! Amounts are exact integers (`u128` atomic units); percentages are basis
//! points. Ids are opaque `u64` values handed out by external registries,
//! except deposit ids which this crate assigns monotonically starting at 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Royalty-bearing entity (a song) identified by an opaque id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Create new entity id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get raw id
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deposit identifier; ids start at 1, 0 is reserved for "not found"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DepositId(u64);

impl DepositId {
    /// Create new deposit id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get raw id
    pub fn get(&self) -> u64 {
        self.0
    }

    /// The reserved "not found" id
    pub fn is_nil(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for DepositId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recipient address (wallet address, account id, etc.)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Create new address
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the zero-address equivalent (empty string)
    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset identifier (native asset or token code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create new asset id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The native asset, always on the supported-asset allow-list
    pub fn native() -> Self {
        Self("NATIVE".to_string())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One recipient's share of an entity's deposits
///
/// Records are tombstoned on removal (`active = false`, percentage zeroed)
/// rather than deleted, so arena slots remain stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    /// Recipient address
    pub recipient: Address,

    /// Share in basis points (0 only for tombstones)
    pub percentage: u32,

    /// Role label ("artist", "producer", ...)
    pub role: String,

    /// Whether this record participates in payouts
    pub active: bool,
}

/// One entry of a bulk split configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitInput {
    /// Recipient address
    pub recipient: Address,

    /// Share in basis points
    pub percentage: u32,

    /// Role label
    pub role: String,
}

impl SplitInput {
    /// Create new split entry
    pub fn new(recipient: Address, percentage: u32, role: impl Into<String>) -> Self {
        Self {
            recipient,
            percentage,
            role: role.into(),
        }
    }
}

/// One inbound royalty payment tagged to an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Deposit id (monotonic, starts at 1)
    pub id: DepositId,

    /// Entity the royalties belong to
    pub entity_id: EntityId,

    /// Amount in atomic units (non-zero)
    pub amount: u128,

    /// Asset the deposit was made in
    pub asset: AssetId,

    /// Originating source ("spotify", "radio", ...)
    pub source: String,

    /// Originating region (ISO country code or free-form)
    pub region: String,

    /// When the deposit was recorded
    pub recorded_at: DateTime<Utc>,

    /// Whether this deposit has been settled (one-way flag)
    pub distributed: bool,
}
