//! External collaborator seams: ownership lookup, roles, and the custody
//! ledger
//!
//! The engine never holds funds and never decides who owns a song. Both
//! concerns sit behind injected traits so the presentation layer can bind
//! them to whatever registry and payment rail it runs against.
//!
//! Role checks are expressed as [`AccessRule`] values evaluated per
//! operation instead of a global role bitmap: split mutations use
//! `OwnerOrOperator`, deposit intake uses `DepositorOnly`. `Admin`
//! satisfies every rule.

use crate::{Error, Result};
use royalty_core::{Address, AssetId, EntityId};

/// Platform roles recognized by authorization rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Platform operator, may manage splits on any entity
    Operator,
    /// May record royalty deposits
    Depositor,
}

/// Resolves an entity to its primary owner
///
/// Implemented by the external song registry.
pub trait SongOwnerLookup: Send + Sync {
    /// Primary owner of the entity, or `EntityNotFound`
    fn owner_of(&self, entity_id: EntityId) -> Result<Address>;
}

/// Answers role membership queries for a caller
pub trait AuthorizationPolicy: Send + Sync {
    /// Whether the caller holds the role
    fn has_role(&self, caller: &Address, role: Role) -> bool;
}

/// Per-operation access rule evaluated against the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Entity primary owner, platform operator, or admin
    OwnerOrOperator,
    /// Depositor role (or admin)
    DepositorOnly,
    /// Admin role only
    AdminOnly,
}

impl AccessRule {
    /// Check the rule, returning `Unauthorized` on failure
    ///
    /// `owner` is only consulted by `OwnerOrOperator`; other rules ignore
    /// it.
    pub fn check(
        &self,
        policy: &dyn AuthorizationPolicy,
        caller: &Address,
        owner: Option<&Address>,
    ) -> Result<()> {
        let allowed = match self {
            AccessRule::OwnerOrOperator => {
                owner.is_some_and(|o| o == caller)
                    || policy.has_role(caller, Role::Operator)
                    || policy.has_role(caller, Role::Admin)
            }
            AccessRule::DepositorOnly => {
                policy.has_role(caller, Role::Depositor) || policy.has_role(caller, Role::Admin)
            }
            AccessRule::AdminOnly => policy.has_role(caller, Role::Admin),
        };

        if allowed {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.to_string()))
        }
    }
}

/// Asset movement primitives at the custody boundary
///
/// Transfer failures surface to callers as `TransferFailed`; any rollback
/// of bookkeeping state is the engine's policy, not the ledger's.
pub trait TransferLedger: Send + Sync {
    /// Push funds out to a recipient
    fn transfer(&self, asset: &AssetId, to: &Address, amount: u128) -> Result<()>;

    /// Pull funds in from a depositor
    fn pull_from(&self, asset: &AssetId, from: &Address, amount: u128) -> Result<()>;
}
