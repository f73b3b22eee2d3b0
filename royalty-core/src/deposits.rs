//! Append-only deposit ledger
//!
//! Deposits are immutable once recorded except for the `distributed` flag,
//! which flips exactly once (false → true) via a compare-and-swap under the
//! ledger's write lock. Ids are monotonic starting at 1; id 0 is reserved
//! for "not found".
//!
//! Per-entity, per-source, and per-region running totals are informational
//! aggregates for reporting, not correctness-critical state.

use crate::{
    types::{AssetId, Deposit, DepositId, EntityId},
    Config, Error, Result,
};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::RwLock;

/// Append-only record of inbound royalty deposits
#[derive(Debug)]
pub struct DepositLedger {
    /// Deposit arena; id = slot index + 1
    deposits: RwLock<Vec<Deposit>>,

    /// Asset allow-list (always contains the native asset)
    supported_assets: Vec<AssetId>,

    /// Running total deposited per entity
    entity_totals: DashMap<EntityId, u128>,

    /// Running total deposited per source
    source_totals: DashMap<String, u128>,

    /// Running total deposited per region
    region_totals: DashMap<String, u128>,
}

impl DepositLedger {
    /// Create a ledger from core configuration
    pub fn new(config: &Config) -> Self {
        let mut supported_assets = config.supported_assets.clone();
        if !supported_assets.contains(&AssetId::native()) {
            supported_assets.push(AssetId::native());
        }
        Self {
            deposits: RwLock::new(Vec::new()),
            supported_assets,
            entity_totals: DashMap::new(),
            source_totals: DashMap::new(),
            region_totals: DashMap::new(),
        }
    }

    /// Validate a prospective deposit without recording it
    pub fn validate(&self, amount: u128, asset: &AssetId) -> Result<()> {
        if amount == 0 {
            return Err(Error::InvalidAmount);
        }
        if !self.supported_assets.contains(asset) {
            return Err(Error::UnsupportedAsset(asset.to_string()));
        }
        Ok(())
    }

    /// Record a deposit and return its id
    pub fn record(
        &self,
        entity_id: EntityId,
        amount: u128,
        asset: AssetId,
        source: impl Into<String>,
        region: impl Into<String>,
    ) -> Result<DepositId> {
        self.validate(amount, &asset)?;
        let source = source.into();
        let region = region.into();

        let id = {
            let mut deposits = self.deposits.write();
            let id = DepositId::new(deposits.len() as u64 + 1);
            deposits.push(Deposit {
                id,
                entity_id,
                amount,
                asset,
                source: source.clone(),
                region: region.clone(),
                recorded_at: Utc::now(),
                distributed: false,
            });
            id
        };

        self.entity_totals
            .entry(entity_id)
            .and_modify(|t| *t = t.saturating_add(amount))
            .or_insert(amount);
        self.source_totals
            .entry(source.clone())
            .and_modify(|t| *t = t.saturating_add(amount))
            .or_insert(amount);
        self.region_totals
            .entry(region.clone())
            .and_modify(|t| *t = t.saturating_add(amount))
            .or_insert(amount);

        tracing::debug!(
            deposit_id = id.get(),
            entity_id = entity_id.get(),
            amount,
            source,
            region,
            "deposit recorded"
        );
        Ok(id)
    }

    /// Fetch one deposit by id
    pub fn get(&self, id: DepositId) -> Result<Deposit> {
        let deposits = self.deposits.read();
        if id.is_nil() || id.get() as usize > deposits.len() {
            return Err(Error::DepositNotFound(id.get()));
        }
        Ok(deposits[id.get() as usize - 1].clone())
    }

    /// All deposits for one entity, in id order
    pub fn entity_deposits(&self, entity_id: EntityId) -> Vec<Deposit> {
        self.deposits
            .read()
            .iter()
            .filter(|d| d.entity_id == entity_id)
            .cloned()
            .collect()
    }

    /// Flip the `distributed` flag false → true and return a snapshot
    ///
    /// This is the compare-and-swap that makes settlement at-most-once: the
    /// check and the flip happen under one write lock, and a deposit whose
    /// flag is already set fails with `AlreadyDistributed`.
    pub fn mark_distributed(&self, id: DepositId) -> Result<Deposit> {
        let mut deposits = self.deposits.write();
        if id.is_nil() || id.get() as usize > deposits.len() {
            return Err(Error::DepositNotFound(id.get()));
        }
        let deposit = &mut deposits[id.get() as usize - 1];
        if deposit.distributed {
            return Err(Error::AlreadyDistributed(id.get()));
        }
        deposit.distributed = true;
        Ok(deposit.clone())
    }

    /// Total ever deposited against an entity
    pub fn entity_total(&self, entity_id: EntityId) -> u128 {
        self.entity_totals
            .get(&entity_id)
            .map(|v| *v)
            .unwrap_or(0)
    }

    /// Total ever deposited from a source
    pub fn source_total(&self, source: &str) -> u128 {
        self.source_totals.get(source).map(|v| *v).unwrap_or(0)
    }

    /// Total ever deposited from a region
    pub fn region_total(&self, region: &str) -> u128 {
        self.region_totals.get(region).map(|v| *v).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> DepositLedger {
        DepositLedger::new(&Config::default())
    }

    #[test]
    fn test_record_assigns_monotonic_ids_from_one() {
        let ledger = ledger();
        let e = EntityId::new(1);
        for expected in 1..=5u64 {
            let id = ledger
                .record(e, 100, AssetId::native(), "spotify", "US")
                .unwrap();
            assert_eq!(id.get(), expected);
        }
    }

    #[test]
    fn test_record_rejects_zero_amount() {
        let ledger = ledger();
        let err = ledger
            .record(EntityId::new(1), 0, AssetId::native(), "spotify", "US")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidAmount));
    }

    #[test]
    fn test_record_rejects_unsupported_asset() {
        let ledger = ledger();
        let err = ledger
            .record(
                EntityId::new(1),
                100,
                AssetId::new("SHADY"),
                "spotify",
                "US",
            )
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedAsset(_)));
    }

    #[test]
    fn test_native_asset_always_supported() {
        let config = Config {
            supported_assets: vec![AssetId::new("USDC")],
            ..Config::default()
        };
        let ledger = DepositLedger::new(&config);
        assert!(ledger.validate(1, &AssetId::native()).is_ok());
        assert!(ledger.validate(1, &AssetId::new("USDC")).is_ok());
    }

    #[test]
    fn test_get_zero_id_always_fails() {
        let ledger = ledger();
        assert!(matches!(
            ledger.get(DepositId::new(0)),
            Err(Error::DepositNotFound(0))
        ));
        assert!(matches!(
            ledger.get(DepositId::new(7)),
            Err(Error::DepositNotFound(7))
        ));
    }

    #[test]
    fn test_mark_distributed_flips_once() {
        let ledger = ledger();
        let id = ledger
            .record(EntityId::new(1), 500, AssetId::native(), "radio", "DE")
            .unwrap();

        let deposit = ledger.mark_distributed(id).unwrap();
        assert!(deposit.distributed);
        assert!(ledger.get(id).unwrap().distributed);

        let err = ledger.mark_distributed(id).unwrap_err();
        assert!(matches!(err, Error::AlreadyDistributed(_)));
    }

    #[test]
    fn test_entity_deposits_in_id_order() {
        let ledger = ledger();
        let e1 = EntityId::new(1);
        let e2 = EntityId::new(2);
        ledger.record(e1, 10, AssetId::native(), "a", "US").unwrap();
        ledger.record(e2, 20, AssetId::native(), "a", "US").unwrap();
        ledger.record(e1, 30, AssetId::native(), "b", "EU").unwrap();

        let deposits = ledger.entity_deposits(e1);
        assert_eq!(deposits.len(), 2);
        assert_eq!(deposits[0].amount, 10);
        assert_eq!(deposits[1].amount, 30);
    }

    #[test]
    fn test_aggregate_totals() {
        let ledger = ledger();
        let e = EntityId::new(1);
        ledger.record(e, 100, AssetId::native(), "spotify", "US").unwrap();
        ledger.record(e, 50, AssetId::native(), "spotify", "DE").unwrap();
        ledger.record(e, 25, AssetId::native(), "radio", "US").unwrap();

        assert_eq!(ledger.entity_total(e), 175);
        assert_eq!(ledger.source_total("spotify"), 150);
        assert_eq!(ledger.source_total("radio"), 25);
        assert_eq!(ledger.region_total("US"), 125);
        assert_eq!(ledger.region_total("vanuatu"), 0);
    }
}
