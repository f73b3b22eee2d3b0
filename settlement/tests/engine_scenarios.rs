//! End-to-end settlement scenarios
//!
//! Exercises the full configure → deposit → settle → claim flow against
//! in-memory collaborators, including the documented failure paths.

use royalty_core::{Address, AssetId, DepositId, EntityId, SplitInput};
use settlement::auth::Role;
use settlement::testing::{FlakyLedger, StaticOwners, StaticRoles};
use settlement::{Config, Error, SettlementEngine};
use std::sync::Arc;

const SONG: u64 = 1;

fn addr(s: &str) -> Address {
    Address::new(s)
}

fn setup() -> (SettlementEngine, Arc<FlakyLedger>) {
    let mut owners = StaticOwners::single(EntityId::new(SONG), "OWNER");
    owners.insert(EntityId::new(2), "OWNER2");

    let policy = StaticRoles::new(&[
        ("OP", Role::Operator),
        ("DEP", Role::Depositor),
        ("ROOT", Role::Admin),
    ]);
    let ledger = Arc::new(FlakyLedger::default());

    let engine = SettlementEngine::new(
        Config::default(),
        &royalty_core::Config::default(),
        Arc::new(owners),
        Arc::new(policy),
        ledger.clone(),
    );
    (engine, ledger)
}

fn deposit(engine: &SettlementEngine, entity: u64, amount: u128) -> DepositId {
    engine
        .record_deposit(
            &addr("DEP"),
            EntityId::new(entity),
            amount,
            AssetId::native(),
            "spotify",
            "US",
        )
        .unwrap()
}

#[test]
fn seventy_thirty_split_of_thousand() {
    let (engine, ledger) = setup();
    let song = EntityId::new(SONG);

    engine
        .configure_splits(
            &addr("OWNER"),
            song,
            &[
                SplitInput::new(addr("R1"), 7000, "artist"),
                SplitInput::new(addr("R2"), 3000, "producer"),
            ],
        )
        .unwrap();

    let id = deposit(&engine, SONG, 1000);
    let outcome = engine.settle(id).unwrap();

    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 700);
    assert_eq!(engine.balance_of(&addr("R2"), &AssetId::native()), 300);
    assert_eq!(outcome.total_credited, 1000);
    assert_eq!(outcome.dust, 0);

    // Claim pays out through the custody ledger
    assert_eq!(engine.claim(&addr("R1"), &AssetId::native()).unwrap(), 700);
    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 0);
    assert_eq!(
        ledger.transfers(),
        vec![(AssetId::native(), addr("R1"), 700)]
    );
}

#[test]
fn over_allocation_rejected_and_table_unchanged() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);

    let err = engine
        .configure_splits(
            &addr("OWNER"),
            song,
            &[
                SplitInput::new(addr("R1"), 7000, "artist"),
                SplitInput::new(addr("R2"), 4000, "producer"),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(royalty_core::Error::TotalExceeds100Percent(11_000))
    ));
    assert!(engine.get_splits(song).is_empty());
    assert_eq!(engine.total_allocated(song), 0);
}

#[test]
fn locked_table_rejects_every_mutation() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);
    let owner = addr("OWNER");

    engine
        .configure_splits(&owner, song, &[SplitInput::new(addr("R1"), 5000, "artist")])
        .unwrap();
    engine.lock_splits(&owner, song).unwrap();
    assert!(engine.is_locked(song));

    let err = engine
        .update_split(&owner, song, &addr("R1"), 5000)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Core(royalty_core::Error::SplitsLocked(SONG))
    ));
    assert!(engine
        .add_recipient(&owner, song, addr("R2"), 1000, "producer")
        .is_err());
    assert!(engine.remove_recipient(&owner, song, &addr("R1")).is_err());
    assert!(engine.lock_splits(&owner, song).is_err());

    // Locked tables still settle
    let id = deposit(&engine, SONG, 200);
    assert_eq!(engine.settle(id).unwrap().total_credited, 100);
}

#[test]
fn primary_owner_cannot_be_removed() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);
    let owner = addr("OWNER");

    engine
        .configure_splits(
            &owner,
            song,
            &[
                SplitInput::new(owner.clone(), 6000, "artist"),
                SplitInput::new(addr("R2"), 4000, "producer"),
            ],
        )
        .unwrap();

    let err = engine.remove_recipient(&owner, song, &owner).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(royalty_core::Error::CannotRemovePrimaryOwner(_))
    ));

    // Non-owner recipients are removable, and an operator may do it
    engine.remove_recipient(&addr("OP"), song, &addr("R2")).unwrap();
    assert_eq!(engine.total_allocated(song), 6000);
}

#[test]
fn settle_is_at_most_once() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);

    engine
        .configure_splits(
            &addr("OWNER"),
            song,
            &[SplitInput::new(addr("R1"), 10_000, "artist")],
        )
        .unwrap();
    let id = deposit(&engine, SONG, 1000);

    engine.settle(id).unwrap();
    let err = engine.settle(id).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(royalty_core::Error::AlreadyDistributed(_))
    ));

    // Exactly one settlement's worth of credit
    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 1000);
}

#[test]
fn batch_settle_skips_bad_ids() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);

    engine
        .configure_splits(
            &addr("OWNER"),
            song,
            &[SplitInput::new(addr("R1"), 10_000, "artist")],
        )
        .unwrap();

    let d1 = deposit(&engine, SONG, 100);
    let d2 = deposit(&engine, SONG, 200);
    engine.settle(d1).unwrap(); // already distributed when the batch runs

    let outcome = engine
        .batch_settle(&[d1, d2, DepositId::new(0), DepositId::new(99)])
        .unwrap();
    assert_eq!(outcome.settled, 1);
    assert_eq!(outcome.skipped, 3);
    assert_eq!(outcome.total_credited, 200);
    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 300);
}

#[test]
fn splits_mutate_between_deposits() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);
    let owner = addr("OWNER");

    engine
        .add_recipient(&owner, song, addr("R1"), 5000, "artist")
        .unwrap();
    let d1 = deposit(&engine, SONG, 1000);
    engine.settle(d1).unwrap();

    // Updating the split only affects later deposits
    engine.update_split(&owner, song, &addr("R1"), 2500).unwrap();
    let d2 = deposit(&engine, SONG, 1000);
    engine.settle(d2).unwrap();

    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 750);
    assert_eq!(engine.total_dust(song), 500 + 750);
}

#[test]
fn claim_all_drains_multiple_assets() {
    let usdc = AssetId::new("USDC");
    let core_config = royalty_core::Config {
        supported_assets: vec![AssetId::native(), usdc.clone()],
        ..royalty_core::Config::default()
    };
    let song = EntityId::new(SONG);
    let ledger = Arc::new(FlakyLedger::default());
    let engine = SettlementEngine::new(
        Config::default(),
        &core_config,
        Arc::new(StaticOwners::single(song, "OWNER")),
        Arc::new(StaticRoles::new(&[("DEP", Role::Depositor)])),
        ledger.clone(),
    );

    engine
        .configure_splits(
            &Address::new("OWNER"),
            song,
            &[SplitInput::new(addr("R1"), 10_000, "artist")],
        )
        .unwrap();

    let d1 = engine
        .record_deposit(&addr("DEP"), song, 100, AssetId::native(), "s", "US")
        .unwrap();
    let d2 = engine
        .record_deposit(&addr("DEP"), song, 250, usdc.clone(), "s", "US")
        .unwrap();
    engine.batch_settle(&[d1, d2]).unwrap();

    let claimed = engine.claim_all(&addr("R1"));
    assert_eq!(claimed, vec![(AssetId::native(), 100), (usdc, 250)]);
    assert!(engine.all_balances(&addr("R1")).is_empty());
    assert_eq!(ledger.transfers().len(), 2);
}

#[test]
fn claim_all_restores_failed_assets() {
    let (engine, ledger) = setup();
    let song = EntityId::new(SONG);

    engine
        .configure_splits(
            &addr("OWNER"),
            song,
            &[SplitInput::new(addr("R1"), 10_000, "artist")],
        )
        .unwrap();
    let id = deposit(&engine, SONG, 400);
    engine.settle(id).unwrap();

    ledger.fail_transfers(true);
    assert!(engine.claim_all(&addr("R1")).is_empty());
    // Balance survives the outage
    assert_eq!(engine.balance_of(&addr("R1"), &AssetId::native()), 400);
}

#[test]
fn claim_of_zero_balance_fails() {
    let (engine, _) = setup();
    let err = engine.claim(&addr("NOBODY"), &AssetId::native()).unwrap_err();
    assert!(matches!(
        err,
        Error::Core(royalty_core::Error::NoClaimableBalance { .. })
    ));
}

#[test]
fn admin_satisfies_every_rule() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);
    let root = addr("ROOT");

    engine
        .add_recipient(&root, song, addr("R1"), 1000, "artist")
        .unwrap();
    engine
        .record_deposit(&root, song, 50, AssetId::native(), "s", "US")
        .unwrap();
}

#[test]
fn removed_recipient_gets_nothing_readded_gets_new_rate() {
    let (engine, _) = setup();
    let song = EntityId::new(SONG);
    let owner = addr("OWNER");

    engine
        .configure_splits(
            &owner,
            song,
            &[
                SplitInput::new(addr("R1"), 5000, "artist"),
                SplitInput::new(addr("R2"), 5000, "producer"),
            ],
        )
        .unwrap();
    engine.remove_recipient(&owner, song, &addr("R2")).unwrap();

    let d1 = deposit(&engine, SONG, 1000);
    engine.settle(d1).unwrap();
    assert_eq!(engine.balance_of(&addr("R2"), &AssetId::native()), 0);

    engine
        .add_recipient(&owner, song, addr("R2"), 1000, "producer")
        .unwrap();
    let d2 = deposit(&engine, SONG, 1000);
    engine.settle(d2).unwrap();
    assert_eq!(engine.balance_of(&addr("R2"), &AssetId::native()), 100);
    assert_eq!(
        engine
            .get_recipient_split(song, &addr("R2"))
            .unwrap()
            .percentage,
        1000
    );
}
