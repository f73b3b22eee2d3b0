//! Claimable balance store
//!
//! Balances are keyed by `(recipient, asset)` and only ever move in two
//! ways: credited by settlement and zeroed by a claim. A per-recipient
//! index of every asset ever credited backs `claim_all` and `all_balances`.
//!
//! The store never restores a claimed balance on its own; whether a failed
//! downstream transfer re-credits the recipient is the caller's policy.

use crate::{
    types::{Address, AssetId},
    Error, Result,
};
use dashmap::DashMap;

/// Per-recipient, per-asset accumulator of funds owed
#[derive(Debug, Default)]
pub struct ClaimableBalanceStore {
    /// (recipient, asset) → claimable amount
    balances: DashMap<(Address, AssetId), u128>,

    /// Recipient → assets with nonzero history, in first-touch order
    assets: DashMap<Address, Vec<AssetId>>,
}

impl ClaimableBalanceStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to a recipient's claimable balance
    ///
    /// Zero credits are ignored. The first credit for an asset registers it
    /// in the recipient's asset index.
    pub fn credit(&self, recipient: &Address, asset: &AssetId, amount: u128) {
        if amount == 0 {
            return;
        }

        self.balances
            .entry((recipient.clone(), asset.clone()))
            .and_modify(|b| *b = b.saturating_add(amount))
            .or_insert(amount);

        let mut index = self.assets.entry(recipient.clone()).or_default();
        if !index.contains(asset) {
            index.push(asset.clone());
        }
    }

    /// Atomically zero a balance and return the claimed amount
    pub fn claim(&self, recipient: &Address, asset: &AssetId) -> Result<u128> {
        let claimed = self
            .balances
            .get_mut(&(recipient.clone(), asset.clone()))
            .and_then(|mut balance| {
                if *balance == 0 {
                    None
                } else {
                    Some(std::mem::take(&mut *balance))
                }
            });

        claimed.ok_or_else(|| Error::NoClaimableBalance {
            recipient: recipient.to_string(),
            asset: asset.to_string(),
        })
    }

    /// Drain every asset with a nonzero balance for one recipient
    ///
    /// Zero entries are skipped silently; the result lists what was
    /// actually claimed, in first-touch asset order.
    pub fn claim_all(&self, recipient: &Address) -> Vec<(AssetId, u128)> {
        let assets = self
            .assets
            .get(recipient)
            .map(|index| index.clone())
            .unwrap_or_default();

        assets
            .into_iter()
            .filter_map(|asset| {
                self.claim(recipient, &asset)
                    .ok()
                    .map(|amount| (asset, amount))
            })
            .collect()
    }

    /// Re-credit a previously claimed amount
    ///
    /// Used by callers whose downstream transfer failed after the claim
    /// already zeroed the balance.
    pub fn restore(&self, recipient: &Address, asset: &AssetId, amount: u128) {
        self.credit(recipient, asset, amount);
    }

    /// Current claimable balance (0 if never credited)
    pub fn balance_of(&self, recipient: &Address, asset: &AssetId) -> u128 {
        self.balances
            .get(&(recipient.clone(), asset.clone()))
            .map(|b| *b)
            .unwrap_or(0)
    }

    /// All nonzero balances for one recipient, in first-touch asset order
    pub fn all_balances(&self, recipient: &Address) -> Vec<(AssetId, u128)> {
        let assets = self
            .assets
            .get(recipient)
            .map(|index| index.clone())
            .unwrap_or_default();

        assets
            .into_iter()
            .filter_map(|asset| {
                let balance = self.balance_of(recipient, &asset);
                (balance > 0).then_some((asset, balance))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::new(s)
    }

    #[test]
    fn test_credit_accumulates() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        store.credit(&a, &AssetId::native(), 100);
        store.credit(&a, &AssetId::native(), 50);
        assert_eq!(store.balance_of(&a, &AssetId::native()), 150);
    }

    #[test]
    fn test_zero_credit_is_noop() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        store.credit(&a, &AssetId::native(), 0);
        assert_eq!(store.balance_of(&a, &AssetId::native()), 0);
        assert!(store.all_balances(&a).is_empty());
    }

    #[test]
    fn test_claim_round_trip() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        store.credit(&a, &AssetId::native(), 700);

        assert_eq!(store.claim(&a, &AssetId::native()).unwrap(), 700);
        assert_eq!(store.balance_of(&a, &AssetId::native()), 0);

        let err = store.claim(&a, &AssetId::native()).unwrap_err();
        assert!(matches!(err, Error::NoClaimableBalance { .. }));
    }

    #[test]
    fn test_claim_unknown_recipient() {
        let store = ClaimableBalanceStore::new();
        assert!(store.claim(&addr("ghost"), &AssetId::native()).is_err());
    }

    #[test]
    fn test_claim_all_drains_every_asset() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        let usdc = AssetId::new("USDC");
        store.credit(&a, &AssetId::native(), 100);
        store.credit(&a, &usdc, 200);

        let claimed = store.claim_all(&a);
        assert_eq!(claimed, vec![(AssetId::native(), 100), (usdc.clone(), 200)]);
        assert!(store.all_balances(&a).is_empty());

        // Second drain has nothing left
        assert!(store.claim_all(&a).is_empty());
    }

    #[test]
    fn test_claim_all_skips_zeroed_assets() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        let usdc = AssetId::new("USDC");
        store.credit(&a, &AssetId::native(), 100);
        store.credit(&a, &usdc, 200);
        store.claim(&a, &AssetId::native()).unwrap();

        assert_eq!(store.claim_all(&a), vec![(usdc, 200)]);
    }

    #[test]
    fn test_restore_after_failed_transfer() {
        let store = ClaimableBalanceStore::new();
        let a = addr("A");
        store.credit(&a, &AssetId::native(), 300);
        let amount = store.claim(&a, &AssetId::native()).unwrap();
        store.restore(&a, &AssetId::native(), amount);
        assert_eq!(store.balance_of(&a, &AssetId::native()), 300);
    }
}
