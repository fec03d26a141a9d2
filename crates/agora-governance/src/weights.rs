//! Per-identity voting weights.
//!
//! A stored weight of zero and an absent entry are the same thing: both
//! read back as [`DEFAULT_WEIGHT`]. There is no way to take voting rights
//! away by setting a weight to zero.

use std::collections::HashMap;
use agora_types::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use crate::error::GovernanceError;

/// Weight applied to identities with no (or zero) stored weight.
pub const DEFAULT_WEIGHT: u64 = 1;

/// Identity -> voting weight.
#[derive(Debug, Default, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WeightRegistry {
    weights: HashMap<Address, u64>,
}

impl WeightRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a weight. Zero is accepted and reads back as the default.
    ///
    /// The administrator check happens in the caller.
    pub fn set_weight(&mut self, identity: Address, weight: u64) -> Result<(), GovernanceError> {
        if identity.is_zero() {
            return Err(GovernanceError::ZeroIdentity);
        }
        self.weights.insert(identity, weight);
        Ok(())
    }

    /// Effective weight of `identity`.
    pub fn weight_of(&self, identity: &Address) -> u64 {
        match self.weights.get(identity) {
            Some(&w) if w > 0 => w,
            _ => DEFAULT_WEIGHT,
        }
    }

    /// Number of stored entries, zero-valued ones included.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Reject decoded entries that `set_weight` would never have stored.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        if self.weights.contains_key(&Address::ZERO) {
            return Err(GovernanceError::Snapshot(
                "weight stored for the zero identity".to_string(),
            ));
        }
        Ok(())
    }
}
