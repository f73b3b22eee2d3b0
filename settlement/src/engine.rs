//! Main settlement engine
//!
//! Orchestrates split configuration, deposit intake, settlement, and
//! claims over the core bookkeeping stores. Authorization, song ownership,
//! and fund custody are delegated to injected collaborators.
//!
//! # Settlement ordering
//!
//! `settle` marks the deposit distributed *before* crediting any balance.
//! The flag flip is a compare-and-swap inside the deposit ledger, so a
//! concurrent or repeated call observes `AlreadyDistributed` and can never
//! double-credit, even if crediting is interrupted partway.

use crate::{
    auth::{AccessRule, AuthorizationPolicy, SongOwnerLookup, TransferLedger},
    config::Config,
    types::{BatchOutcome, SettlementOutcome},
    Error, Result,
};
use chrono::Utc;
use dashmap::DashMap;
use royalty_core::{
    Address, AssetId, ClaimableBalanceStore, Deposit, DepositId, DepositLedger, EntityId,
    SplitInput, SplitRecord, SplitRegistry,
};
use std::sync::Arc;

/// Settlement engine
pub struct SettlementEngine {
    /// Per-entity split tables
    splits: Arc<SplitRegistry>,

    /// Deposit ledger
    deposits: Arc<DepositLedger>,

    /// Claimable balances
    balances: Arc<ClaimableBalanceStore>,

    /// Song ownership registry
    owners: Arc<dyn SongOwnerLookup>,

    /// Role membership
    policy: Arc<dyn AuthorizationPolicy>,

    /// Custody boundary
    ledger: Arc<dyn TransferLedger>,

    /// Accumulated floor-rounding dust per entity
    dust_totals: DashMap<EntityId, u128>,

    /// Configuration
    config: Config,
}

impl std::fmt::Debug for SettlementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("service_name", &self.config.service_name)
            .finish_non_exhaustive()
    }
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(
        config: Config,
        core_config: &royalty_core::Config,
        owners: Arc<dyn SongOwnerLookup>,
        policy: Arc<dyn AuthorizationPolicy>,
        ledger: Arc<dyn TransferLedger>,
    ) -> Self {
        Self {
            splits: Arc::new(SplitRegistry::new(core_config)),
            deposits: Arc::new(DepositLedger::new(core_config)),
            balances: Arc::new(ClaimableBalanceStore::new()),
            owners,
            policy,
            ledger,
            dust_totals: DashMap::new(),
            config,
        }
    }

    /// Resolve the entity's primary owner and check a split-mutation rule
    fn authorize_split_mutation(&self, caller: &Address, entity_id: EntityId) -> Result<Address> {
        let owner = self.owners.owner_of(entity_id)?;
        AccessRule::OwnerOrOperator.check(self.policy.as_ref(), caller, Some(&owner))?;
        Ok(owner)
    }

    // --- Split surface ---

    /// Replace an entity's splits wholesale
    pub fn configure_splits(
        &self,
        caller: &Address,
        entity_id: EntityId,
        entries: &[SplitInput],
    ) -> Result<()> {
        self.authorize_split_mutation(caller, entity_id)?;
        self.splits.configure(entity_id, entries)?;
        tracing::info!(
            entity_id = entity_id.get(),
            recipients = entries.len(),
            "splits configured"
        );
        Ok(())
    }

    /// Add one recipient to an entity's splits
    pub fn add_recipient(
        &self,
        caller: &Address,
        entity_id: EntityId,
        recipient: Address,
        percentage: u32,
        role: impl Into<String>,
    ) -> Result<()> {
        self.authorize_split_mutation(caller, entity_id)?;
        self.splits
            .add_recipient(entity_id, recipient.clone(), percentage, role)?;
        tracing::info!(
            entity_id = entity_id.get(),
            recipient = %recipient,
            percentage,
            "recipient added"
        );
        Ok(())
    }

    /// Remove one recipient; the primary owner cannot be removed
    pub fn remove_recipient(
        &self,
        caller: &Address,
        entity_id: EntityId,
        recipient: &Address,
    ) -> Result<()> {
        let owner = self.authorize_split_mutation(caller, entity_id)?;
        self.splits.remove_recipient(entity_id, recipient, &owner)?;
        tracing::info!(
            entity_id = entity_id.get(),
            recipient = %recipient,
            "recipient removed"
        );
        Ok(())
    }

    /// Change one recipient's percentage
    pub fn update_split(
        &self,
        caller: &Address,
        entity_id: EntityId,
        recipient: &Address,
        new_percentage: u32,
    ) -> Result<()> {
        self.authorize_split_mutation(caller, entity_id)?;
        self.splits
            .update_split(entity_id, recipient, new_percentage)?;
        tracing::info!(
            entity_id = entity_id.get(),
            recipient = %recipient,
            new_percentage,
            "split updated"
        );
        Ok(())
    }

    /// Irreversibly lock an entity's splits
    pub fn lock_splits(&self, caller: &Address, entity_id: EntityId) -> Result<()> {
        self.authorize_split_mutation(caller, entity_id)?;
        self.splits.lock(entity_id)?;
        tracing::info!(entity_id = entity_id.get(), "splits locked");
        Ok(())
    }

    /// Active split records for an entity
    pub fn get_splits(&self, entity_id: EntityId) -> Vec<SplitRecord> {
        self.splits.splits(entity_id)
    }

    /// One recipient's active split record
    pub fn get_recipient_split(
        &self,
        entity_id: EntityId,
        recipient: &Address,
    ) -> Result<SplitRecord> {
        Ok(self.splits.recipient_split(entity_id, recipient)?)
    }

    /// Whether an entity's splits are locked
    pub fn is_locked(&self, entity_id: EntityId) -> bool {
        self.splits.is_locked(entity_id)
    }

    /// Sum of an entity's active percentages in bps
    pub fn total_allocated(&self, entity_id: EntityId) -> u32 {
        self.splits.total_allocated(entity_id)
    }

    // --- Deposit surface ---

    /// Record a royalty deposit, pulling funds through the custody ledger
    ///
    /// Validation runs before the pull so a rejected deposit never moves
    /// funds.
    pub fn record_deposit(
        &self,
        caller: &Address,
        entity_id: EntityId,
        amount: u128,
        asset: AssetId,
        source: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<DepositId> {
        AccessRule::DepositorOnly.check(self.policy.as_ref(), caller, None)?;
        self.deposits.validate(amount, &asset)?;

        self.ledger
            .pull_from(&asset, caller, amount)
            .map_err(|e| Error::TransferFailed(e.to_string()))?;

        let id = self
            .deposits
            .record(entity_id, amount, asset, source, region)?;
        tracing::info!(
            deposit_id = id.get(),
            entity_id = entity_id.get(),
            amount,
            "deposit recorded"
        );
        Ok(id)
    }

    /// Fetch one deposit
    pub fn get_deposit(&self, id: DepositId) -> Result<Deposit> {
        Ok(self.deposits.get(id)?)
    }

    /// All deposits for an entity, in id order
    pub fn get_entity_deposits(&self, entity_id: EntityId) -> Vec<Deposit> {
        self.deposits.entity_deposits(entity_id)
    }

    // --- Settlement ---

    /// Settle one deposit into per-recipient claimable credits
    ///
    /// Permissionless: settlement only moves value in the direction the
    /// split table already dictates, so anyone may trigger it.
    pub fn settle(&self, deposit_id: DepositId) -> Result<SettlementOutcome> {
        // Effects before interactions: flip the flag first so a repeated
        // call can never double-credit.
        let deposit = self.deposits.mark_distributed(deposit_id)?;

        let shares = self.splits.payout_shares(deposit.entity_id, deposit.amount);
        let mut credited = Vec::with_capacity(shares.len());
        let mut total_credited: u128 = 0;

        for (recipient, amount) in shares {
            if amount == 0 {
                continue;
            }
            self.balances.credit(&recipient, &deposit.asset, amount);
            total_credited += amount;
            credited.push((recipient, amount));
        }

        let dust = deposit.amount - total_credited;
        if dust > 0 {
            self.dust_totals
                .entry(deposit.entity_id)
                .and_modify(|t| *t = t.saturating_add(dust))
                .or_insert(dust);
        }

        tracing::info!(
            deposit_id = deposit_id.get(),
            entity_id = deposit.entity_id.get(),
            total_credited,
            dust,
            recipients = credited.len(),
            "deposit settled"
        );

        Ok(SettlementOutcome {
            deposit_id,
            entity_id: deposit.entity_id,
            asset: deposit.asset,
            deposit_amount: deposit.amount,
            credited,
            total_credited,
            dust,
            settled_at: Utc::now(),
        })
    }

    /// Best-effort batch settlement
    ///
    /// Unknown and already-distributed deposits are skipped, never
    /// escalated; partial progress is kept.
    pub fn batch_settle(&self, deposit_ids: &[DepositId]) -> Result<BatchOutcome> {
        if deposit_ids.len() > self.config.max_batch_size {
            return Err(Error::BatchLimitExceeded {
                requested: deposit_ids.len(),
                limit: self.config.max_batch_size,
            });
        }

        let mut outcome = BatchOutcome::default();
        for &id in deposit_ids {
            match self.settle(id) {
                Ok(settled) => {
                    outcome.settled += 1;
                    outcome.total_credited += settled.total_credited;
                }
                Err(e) => {
                    outcome.skipped += 1;
                    tracing::warn!(deposit_id = id.get(), error = %e, "skipping deposit in batch");
                }
            }
        }

        tracing::info!(
            settled = outcome.settled,
            skipped = outcome.skipped,
            total_credited = outcome.total_credited,
            "batch settlement complete"
        );
        Ok(outcome)
    }

    /// Accumulated floor-rounding dust for an entity
    ///
    /// Auditability read only; settlement math never redistributes dust.
    pub fn total_dust(&self, entity_id: EntityId) -> u128 {
        self.dust_totals.get(&entity_id).map(|d| *d).unwrap_or(0)
    }

    // --- Claims ---

    /// Claim one asset's balance and push it through the custody ledger
    ///
    /// If the external transfer fails the claimable balance is restored
    /// before the error is returned, so funds are never silently lost.
    pub fn claim(&self, caller: &Address, asset: &AssetId) -> Result<u128> {
        let amount = self.balances.claim(caller, asset)?;

        if let Err(e) = self.ledger.transfer(asset, caller, amount) {
            self.balances.restore(caller, asset, amount);
            tracing::warn!(
                recipient = %caller,
                asset = %asset,
                amount,
                error = %e,
                "transfer failed, claimable balance restored"
            );
            return Err(Error::TransferFailed(e.to_string()));
        }

        tracing::info!(recipient = %caller, asset = %asset, amount, "balance claimed");
        Ok(amount)
    }

    /// Claim every asset with a nonzero balance
    ///
    /// Best-effort: a failed transfer restores that asset's balance and is
    /// skipped; the result lists only what actually went out.
    pub fn claim_all(&self, caller: &Address) -> Vec<(AssetId, u128)> {
        let drained = self.balances.claim_all(caller);
        let mut transferred = Vec::with_capacity(drained.len());

        for (asset, amount) in drained {
            match self.ledger.transfer(&asset, caller, amount) {
                Ok(()) => transferred.push((asset, amount)),
                Err(e) => {
                    self.balances.restore(caller, &asset, amount);
                    tracing::warn!(
                        recipient = %caller,
                        asset = %asset,
                        amount,
                        error = %e,
                        "transfer failed in claim_all, balance restored"
                    );
                }
            }
        }

        transferred
    }

    /// Current claimable balance for one (recipient, asset) pair
    pub fn balance_of(&self, recipient: &Address, asset: &AssetId) -> u128 {
        self.balances.balance_of(recipient, asset)
    }

    /// All nonzero claimable balances for a recipient
    pub fn all_balances(&self, recipient: &Address) -> Vec<(AssetId, u128)> {
        self.balances.all_balances(recipient)
    }
}
