//! Split tables and the per-entity split registry
//!
//! A split table is an arena of recipient records plus an index from
//! recipient address to the most recently added slot. Removal tombstones a
//! record in place instead of deleting it, so slot indices referenced
//! elsewhere stay valid; a slot is never reused for a different recipient.
//!
//! # Invariants
//!
//! - `total_allocated` always equals the sum of active percentages and
//!   never exceeds 10,000 bps
//! - At most one *active* record per recipient per table
//! - `lock()` is terminal: a locked table rejects every mutation

use crate::{
    percentage::{allocate, Bps, BASIS_POINTS},
    types::{Address, EntityId, SplitInput, SplitRecord},
    Config, Error, Result,
};
use dashmap::DashMap;
use std::collections::HashMap;

/// Split table for one entity
#[derive(Debug, Clone)]
pub struct SplitTable {
    /// Entity this table belongs to
    entity_id: EntityId,

    /// Record arena; slots are append-only
    records: Vec<SplitRecord>,

    /// Recipient → most recently added slot
    index: HashMap<Address, usize>,

    /// Whether the table is locked against mutation
    locked: bool,

    /// Denormalized sum of active percentages (bps)
    total_allocated: u32,
}

impl SplitTable {
    /// Create an empty, unlocked table
    pub fn new(entity_id: EntityId) -> Self {
        Self {
            entity_id,
            records: Vec::new(),
            index: HashMap::new(),
            locked: false,
            total_allocated: 0,
        }
    }

    fn ensure_unlocked(&self) -> Result<()> {
        if self.locked {
            return Err(Error::SplitsLocked(self.entity_id.get()));
        }
        Ok(())
    }

    /// Slot of the recipient's active record, if any
    fn active_slot(&self, recipient: &Address) -> Option<usize> {
        self.index
            .get(recipient)
            .copied()
            .filter(|&slot| self.records[slot].active)
    }

    /// Replace the whole table atomically
    ///
    /// Validation fails fast on the first offending entry; on any error the
    /// previous records are untouched. The running percentage sum is checked
    /// at every prefix, not just at the end.
    pub fn configure(&mut self, entries: &[SplitInput]) -> Result<()> {
        self.ensure_unlocked()?;

        if entries.is_empty() {
            return Err(Error::EmptySplitList);
        }

        let mut records = Vec::with_capacity(entries.len());
        let mut index = HashMap::with_capacity(entries.len());
        let mut total: u32 = 0;

        for entry in entries {
            if entry.recipient.is_null() {
                return Err(Error::InvalidRecipient);
            }
            let pct = Bps::new(entry.percentage)?;
            if index.contains_key(&entry.recipient) {
                return Err(Error::RecipientAlreadyExists(
                    entry.recipient.to_string(),
                ));
            }
            total += pct.get();
            if total > BASIS_POINTS {
                return Err(Error::TotalExceeds100Percent(total));
            }
            index.insert(entry.recipient.clone(), records.len());
            records.push(SplitRecord {
                recipient: entry.recipient.clone(),
                percentage: pct.get(),
                role: entry.role.clone(),
                active: true,
            });
        }

        self.records = records;
        self.index = index;
        self.total_allocated = total;
        Ok(())
    }

    /// Append one recipient
    pub fn add_recipient(
        &mut self,
        recipient: Address,
        percentage: u32,
        role: impl Into<String>,
    ) -> Result<()> {
        self.ensure_unlocked()?;

        if recipient.is_null() {
            return Err(Error::InvalidRecipient);
        }
        let pct = Bps::new(percentage)?;
        if self.active_slot(&recipient).is_some() {
            return Err(Error::RecipientAlreadyExists(recipient.to_string()));
        }
        let total = self.total_allocated + pct.get();
        if total > BASIS_POINTS {
            return Err(Error::TotalExceeds100Percent(total));
        }

        self.index.insert(recipient.clone(), self.records.len());
        self.records.push(SplitRecord {
            recipient,
            percentage: pct.get(),
            role: role.into(),
            active: true,
        });
        self.total_allocated = total;
        Ok(())
    }

    /// Tombstone a recipient's active record and free its allocation
    ///
    /// The primary owner is structurally protected from removal. A removed
    /// recipient may be re-added later; the new record gets a fresh slot.
    pub fn remove_recipient(
        &mut self,
        recipient: &Address,
        primary_owner: &Address,
    ) -> Result<()> {
        self.ensure_unlocked()?;

        let slot = self
            .active_slot(recipient)
            .ok_or_else(|| Error::RecipientNotFound(recipient.to_string()))?;
        if recipient == primary_owner {
            return Err(Error::CannotRemovePrimaryOwner(recipient.to_string()));
        }

        let record = &mut self.records[slot];
        self.total_allocated -= record.percentage;
        record.percentage = 0;
        record.active = false;
        Ok(())
    }

    /// Change a recipient's percentage
    pub fn update_split(&mut self, recipient: &Address, new_percentage: u32) -> Result<()> {
        self.ensure_unlocked()?;

        let slot = self
            .active_slot(recipient)
            .ok_or_else(|| Error::RecipientNotFound(recipient.to_string()))?;
        let pct = Bps::new(new_percentage)?;

        let old = self.records[slot].percentage;
        let total = self.total_allocated - old + pct.get();
        if total > BASIS_POINTS {
            return Err(Error::TotalExceeds100Percent(total));
        }

        self.records[slot].percentage = pct.get();
        self.total_allocated = total;
        Ok(())
    }

    /// Irreversibly lock the table
    pub fn lock(&mut self) -> Result<()> {
        self.ensure_unlocked()?;
        self.locked = true;
        Ok(())
    }

    /// Active records in insertion order
    pub fn splits(&self) -> Vec<SplitRecord> {
        self.records.iter().filter(|r| r.active).cloned().collect()
    }

    /// A single recipient's active record
    pub fn recipient_split(&self, recipient: &Address) -> Result<SplitRecord> {
        self.active_slot(recipient)
            .map(|slot| self.records[slot].clone())
            .ok_or_else(|| Error::RecipientNotFound(recipient.to_string()))
    }

    /// Whether the table is locked
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Sum of active percentages in bps
    pub fn total_allocated(&self) -> u32 {
        self.total_allocated
    }

    /// Number of active records
    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.active).count()
    }

    /// Pure payout calculation: floored share per active record
    ///
    /// Entries follow the arena's insertion order. An empty table yields an
    /// empty list; the whole amount then becomes dust.
    pub fn payout_shares(&self, amount: u128) -> Vec<(Address, u128)> {
        self.records
            .iter()
            .filter(|r| r.active)
            .map(|r| (r.recipient.clone(), allocate(amount, r.percentage)))
            .collect()
    }
}

/// Registry of split tables, one per entity
///
/// Tables are created empty on the first configuration touch. Each mutating
/// operation holds exactly one shard lock for its duration, so every public
/// operation is atomic to concurrent callers.
#[derive(Debug)]
pub struct SplitRegistry {
    tables: DashMap<EntityId, SplitTable>,
    max_recipients: usize,
}

impl SplitRegistry {
    /// Create a registry from core configuration
    pub fn new(config: &Config) -> Self {
        Self {
            tables: DashMap::new(),
            max_recipients: config.max_recipients_per_table,
        }
    }

    /// Run a mutation against the entity's table, creating it if absent
    fn with_table_mut<T>(
        &self,
        entity_id: EntityId,
        f: impl FnOnce(&mut SplitTable) -> Result<T>,
    ) -> Result<T> {
        let mut entry = self
            .tables
            .entry(entity_id)
            .or_insert_with(|| SplitTable::new(entity_id));
        f(entry.value_mut())
    }

    /// Bulk-replace an entity's splits
    pub fn configure(&self, entity_id: EntityId, entries: &[SplitInput]) -> Result<()> {
        if entries.len() > self.max_recipients {
            return Err(Error::TooManyRecipients {
                limit: self.max_recipients,
            });
        }
        self.with_table_mut(entity_id, |table| table.configure(entries))
    }

    /// Add one recipient to an entity's splits
    pub fn add_recipient(
        &self,
        entity_id: EntityId,
        recipient: Address,
        percentage: u32,
        role: impl Into<String>,
    ) -> Result<()> {
        let limit = self.max_recipients;
        self.with_table_mut(entity_id, |table| {
            if table.active_count() >= limit {
                return Err(Error::TooManyRecipients { limit });
            }
            table.add_recipient(recipient, percentage, role)
        })
    }

    /// Remove one recipient (primary owner is protected)
    pub fn remove_recipient(
        &self,
        entity_id: EntityId,
        recipient: &Address,
        primary_owner: &Address,
    ) -> Result<()> {
        self.with_table_mut(entity_id, |table| {
            table.remove_recipient(recipient, primary_owner)
        })
    }

    /// Update one recipient's percentage
    pub fn update_split(
        &self,
        entity_id: EntityId,
        recipient: &Address,
        new_percentage: u32,
    ) -> Result<()> {
        self.with_table_mut(entity_id, |table| {
            table.update_split(recipient, new_percentage)
        })
    }

    /// Irreversibly lock an entity's splits
    pub fn lock(&self, entity_id: EntityId) -> Result<()> {
        self.with_table_mut(entity_id, |table| table.lock())
    }

    /// Active records for an entity (empty if never configured)
    pub fn splits(&self, entity_id: EntityId) -> Vec<SplitRecord> {
        self.tables
            .get(&entity_id)
            .map(|t| t.splits())
            .unwrap_or_default()
    }

    /// A single recipient's active record
    pub fn recipient_split(
        &self,
        entity_id: EntityId,
        recipient: &Address,
    ) -> Result<SplitRecord> {
        self.tables
            .get(&entity_id)
            .ok_or_else(|| Error::RecipientNotFound(recipient.to_string()))
            .and_then(|t| t.recipient_split(recipient))
    }

    /// Whether an entity's table is locked (false if never configured)
    pub fn is_locked(&self, entity_id: EntityId) -> bool {
        self.tables
            .get(&entity_id)
            .map(|t| t.is_locked())
            .unwrap_or(false)
    }

    /// Sum of active percentages in bps (0 if never configured)
    pub fn total_allocated(&self, entity_id: EntityId) -> u32 {
        self.tables
            .get(&entity_id)
            .map(|t| t.total_allocated())
            .unwrap_or(0)
    }

    /// Payout shares for a deposit amount against the entity's table
    pub fn payout_shares(&self, entity_id: EntityId, amount: u128) -> Vec<(Address, u128)> {
        self.tables
            .get(&entity_id)
            .map(|t| t.payout_shares(amount))
            .unwrap_or_default()
    }
}
