//! Single-edge vote delegation.
//!
//! Each identity may point at most one delegate. Edges may form chains and
//! cycles; nothing prevents a cycle at write time. Resolution follows edges
//! for at most [`MAX_DELEGATION_HOPS`] hops and returns wherever it stopped,
//! so under adversarial graphs the result is the identity reached at the hop
//! bound rather than a "final" delegate.

use std::collections::HashMap;
use agora_types::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::debug;
use crate::error::GovernanceError;

/// Maximum number of delegation edges followed during resolution.
pub const MAX_DELEGATION_HOPS: usize = 10;

/// Delegation graph: delegator -> delegate.
#[derive(Debug, Default, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DelegationGraph {
    delegations: HashMap<Address, Address>,
}

impl DelegationGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a delegation from `voter` to `target`.
    ///
    /// # Errors
    /// - `InvalidTarget` if target is the null identity or the voter itself
    /// - `AlreadyDelegated` if the voter already has an outgoing edge
    pub fn delegate(&mut self, voter: Address, target: Address) -> Result<(), GovernanceError> {
        if target.is_zero() {
            return Err(GovernanceError::InvalidTarget(
                "cannot delegate to the zero identity".to_string(),
            ));
        }
        if target == voter {
            return Err(GovernanceError::InvalidTarget(
                "cannot delegate to self".to_string(),
            ));
        }
        if self.delegations.contains_key(&voter) {
            return Err(GovernanceError::AlreadyDelegated);
        }

        self.delegations.insert(voter, target);
        Ok(())
    }

    /// Remove the voter's outgoing edge, returning the former delegate.
    pub fn revoke(&mut self, voter: &Address) -> Result<Address, GovernanceError> {
        self.delegations
            .remove(voter)
            .ok_or(GovernanceError::NoDelegation)
    }

    /// Effective voting identity for `start`.
    pub fn resolve(&self, start: Address) -> Address {
        self.resolve_with_hops(start).0
    }

    /// Effective voting identity for `start` and the number of hops taken.
    ///
    /// Never takes more than [`MAX_DELEGATION_HOPS`] hops. Cycles are not
    /// detected: a two-cycle A <-> B resolves A to A (even hop count).
    pub fn resolve_with_hops(&self, start: Address) -> (Address, usize) {
        let mut current = start;
        let mut hops = 0;

        while hops < MAX_DELEGATION_HOPS {
            match self.delegations.get(&current) {
                Some(next) => {
                    current = *next;
                    hops += 1;
                }
                None => break,
            }
        }

        if hops == MAX_DELEGATION_HOPS {
            debug!(%start, resolved = %current, "delegation resolution hit hop bound");
        }

        (current, hops)
    }

    /// Direct delegate of `voter`, if any.
    pub fn delegate_of(&self, voter: &Address) -> Option<Address> {
        self.delegations.get(voter).copied()
    }

    /// Check if an address has delegated.
    pub fn is_delegating(&self, voter: &Address) -> bool {
        self.delegations.contains_key(voter)
    }

    /// Direct delegators of `delegate`, in address order.
    pub fn delegators_of(&self, delegate: &Address) -> Vec<Address> {
        let mut result: Vec<Address> = self
            .delegations
            .iter()
            .filter(|(_, to)| *to == delegate)
            .map(|(from, _)| *from)
            .collect();
        result.sort();
        result
    }

    /// Reject decoded edges that `delegate` would never have inserted.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        for (from, to) in &self.delegations {
            if from.is_zero() || to.is_zero() {
                return Err(GovernanceError::Snapshot(
                    "delegation edge touches the zero identity".to_string(),
                ));
            }
            if from == to {
                return Err(GovernanceError::Snapshot(format!(
                    "{} delegates to itself",
                    from
                )));
            }
        }
        Ok(())
    }
}
