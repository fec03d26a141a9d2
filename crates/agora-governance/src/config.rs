//! Governance configuration.

use agora_types::Address;
use serde::{Deserialize, Serialize};
use crate::error::GovernanceError;

/// Initial weight assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub identity: Address,
    pub weight: u64,
}

/// Construction parameters for a `Governor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Administrator identity
    pub admin: Address,
    /// Minimum combined yes + no weight for execution
    pub quorum: u64,
    /// Start with proposal creation paused
    #[serde(default)]
    pub start_paused: bool,
    /// Weights to seed the registry with
    #[serde(default)]
    pub weights: Vec<WeightEntry>,
}

impl GovernanceConfig {
    /// Config with an administrator and quorum, nothing else.
    pub fn new(admin: Address, quorum: u64) -> Self {
        Self {
            admin,
            quorum,
            start_paused: false,
            weights: Vec::new(),
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        if self.admin.is_zero() {
            return Err(GovernanceError::InvalidConfig(
                "admin cannot be the zero identity".to_string(),
            ));
        }
        if let Some(idx) = self.weights.iter().position(|e| e.identity.is_zero()) {
            return Err(GovernanceError::InvalidConfig(format!(
                "weight entry {} has the zero identity",
                idx
            )));
        }
        Ok(())
    }
}
