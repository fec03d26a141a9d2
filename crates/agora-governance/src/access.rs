//! Administrator capability and pause switch.

use agora_types::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use crate::error::GovernanceError;

/// Capability check consulted by admin-only operations.
pub trait AccessGate {
    /// Whether `who` is the administrator.
    fn is_admin(&self, who: &Address) -> bool;

    /// Whether proposal creation is currently paused.
    fn is_paused(&self) -> bool;

    /// Fail with `Unauthorized` unless `who` is the administrator.
    fn require_admin(&self, who: &Address) -> Result<(), GovernanceError> {
        if self.is_admin(who) {
            Ok(())
        } else {
            Err(GovernanceError::Unauthorized(format!(
                "{} is not the administrator",
                who
            )))
        }
    }
}

/// Holder of the administrator identity and the paused flag.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AdminGate {
    admin: Address,
    paused: bool,
}

impl AdminGate {
    /// Create a gate owned by `admin`.
    pub fn new(admin: Address) -> Result<Self, GovernanceError> {
        if admin.is_zero() {
            return Err(GovernanceError::ZeroIdentity);
        }
        Ok(Self { admin, paused: false })
    }

    /// Current administrator.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Hand the administrator role to `new_admin`.
    ///
    /// Returns the previous administrator.
    pub fn transfer(
        &mut self,
        caller: &Address,
        new_admin: Address,
    ) -> Result<Address, GovernanceError> {
        self.require_admin(caller)?;
        if new_admin.is_zero() {
            return Err(GovernanceError::ZeroIdentity);
        }
        let previous = self.admin;
        self.admin = new_admin;
        Ok(previous)
    }

    pub fn pause(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        self.require_admin(caller)?;
        if self.paused {
            return Err(GovernanceError::AlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        self.require_admin(caller)?;
        if !self.paused {
            return Err(GovernanceError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    /// Reject a decoded gate with no usable administrator.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        if self.admin.is_zero() {
            return Err(GovernanceError::Snapshot(
                "admin is the zero identity".to_string(),
            ));
        }
        Ok(())
    }
}

impl AccessGate for AdminGate {
    fn is_admin(&self, who: &Address) -> bool {
        *who == self.admin
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
