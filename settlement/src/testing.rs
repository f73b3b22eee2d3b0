//! In-memory test doubles for the external collaborator traits
//!
//! Useful for unit tests and for integrators wiring the engine before the
//! real song registry and payment rail exist.

use crate::auth::{AuthorizationPolicy, Role, SongOwnerLookup, TransferLedger};
use crate::Result;
use parking_lot::Mutex;
use royalty_core::{Address, AssetId, EntityId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// Owner lookup backed by a fixed map
#[derive(Debug, Default)]
pub struct StaticOwners {
    owners: HashMap<EntityId, Address>,
}

impl StaticOwners {
    /// Registry with a single entity
    pub fn single(entity_id: EntityId, owner: impl Into<String>) -> Self {
        let mut owners = HashMap::new();
        owners.insert(entity_id, Address::new(owner));
        Self { owners }
    }

    /// Register another entity
    pub fn insert(&mut self, entity_id: EntityId, owner: impl Into<String>) {
        self.owners.insert(entity_id, Address::new(owner));
    }
}

impl SongOwnerLookup for StaticOwners {
    fn owner_of(&self, entity_id: EntityId) -> Result<Address> {
        self.owners
            .get(&entity_id)
            .cloned()
            .ok_or_else(|| royalty_core::Error::EntityNotFound(entity_id.get()).into())
    }
}

/// Role policy backed by a fixed grant set
#[derive(Debug, Default)]
pub struct StaticRoles {
    grants: HashSet<(Address, Role)>,
}

impl StaticRoles {
    /// Policy from a list of (address, role) grants
    pub fn new(grants: &[(&str, Role)]) -> Self {
        Self {
            grants: grants
                .iter()
                .map(|(addr, role)| (Address::new(*addr), *role))
                .collect(),
        }
    }
}

impl AuthorizationPolicy for StaticRoles {
    fn has_role(&self, caller: &Address, role: Role) -> bool {
        self.grants.contains(&(caller.clone(), role))
    }
}

/// Transfer ledger that records every movement and can be told to fail
#[derive(Debug, Default)]
pub struct FlakyLedger {
    transfers: Mutex<Vec<(AssetId, Address, u128)>>,
    pulls: Mutex<Vec<(AssetId, Address, u128)>>,
    transfers_fail: AtomicBool,
    pulls_fail: AtomicBool,
}

impl FlakyLedger {
    /// Toggle failure of outbound transfers
    pub fn fail_transfers(&self, fail: bool) {
        self.transfers_fail.store(fail, Ordering::SeqCst);
    }

    /// Toggle failure of inbound pulls
    pub fn fail_pulls(&self, fail: bool) {
        self.pulls_fail.store(fail, Ordering::SeqCst);
    }

    /// Every successful outbound transfer so far
    pub fn transfers(&self) -> Vec<(AssetId, Address, u128)> {
        self.transfers.lock().clone()
    }

    /// Every successful inbound pull so far
    pub fn pulls(&self) -> Vec<(AssetId, Address, u128)> {
        self.pulls.lock().clone()
    }
}

impl TransferLedger for FlakyLedger {
    fn transfer(&self, asset: &AssetId, to: &Address, amount: u128) -> Result<()> {
        if self.transfers_fail.load(Ordering::SeqCst) {
            return Err(crate::Error::TransferFailed("ledger offline".to_string()));
        }
        self.transfers
            .lock()
            .push((asset.clone(), to.clone(), amount));
        Ok(())
    }

    fn pull_from(&self, asset: &AssetId, from: &Address, amount: u128) -> Result<()> {
        if self.pulls_fail.load(Ordering::SeqCst) {
            return Err(crate::Error::TransferFailed("ledger offline".to_string()));
        }
        self.pulls
            .lock()
            .push((asset.clone(), from.clone(), amount));
        Ok(())
    }
}
