//! The governance context.
//!
//! `Governor` owns the weight registry, the delegation graph, the proposal
//! registry and the access gate, and exposes every governance operation as a
//! method. Mutating methods take `&mut self`, so operations are applied one
//! at a time in call order and each either completes or fails without
//! touching state. Callers pass the identity that submitted the operation;
//! authenticating it is the host's job.

use agora_types::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use tracing::{debug, info};
use crate::access::{AccessGate, AdminGate};
use crate::clock::Clock;
use crate::config::GovernanceConfig;
use crate::delegation::DelegationGraph;
use crate::error::GovernanceError;
use crate::events::{EventSink, GovernanceEvent};
use crate::lifecycle::LifecycleController;
use crate::proposal::{Proposal, ProposalRegistry, VoteChoice};
use crate::voting::{VoteReceipt, VotingEngine};
use crate::weights::WeightRegistry;

/// All persistent governance state.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct GovernorState {
    quorum: u64,
    access: AdminGate,
    weights: WeightRegistry,
    delegation: DelegationGraph,
    proposals: ProposalRegistry,
}

impl GovernorState {
    /// Check the invariants every operation preserves.
    ///
    /// Decoding only proves the bytes have the right shape; this rejects
    /// states no sequence of operations could have produced.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        self.access.validate()?;
        self.weights.validate()?;
        self.delegation.validate()?;
        self.proposals.validate()?;
        Ok(())
    }
}

/// Governance context: state plus its clock and event sink.
pub struct Governor<C: Clock, S: EventSink> {
    state: GovernorState,
    clock: C,
    sink: S,
}

impl<C: Clock, S: EventSink> Governor<C, S> {
    /// Create a governor administered by `admin` with the given quorum.
    pub fn new(admin: Address, quorum: u64, clock: C, sink: S) -> Result<Self, GovernanceError> {
        Self::from_config(&GovernanceConfig::new(admin, quorum), clock, sink)
    }

    /// Create a governor from configuration, seeding initial weights.
    pub fn from_config(
        config: &GovernanceConfig,
        clock: C,
        sink: S,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;

        let mut access = AdminGate::new(config.admin)?;
        if config.start_paused {
            access.pause(&config.admin)?;
        }
        let mut weights = WeightRegistry::new();
        for entry in &config.weights {
            weights.set_weight(entry.identity, entry.weight)?;
        }

        info!(
            admin = %config.admin,
            quorum = config.quorum,
            weights = config.weights.len(),
            "governor initialized"
        );

        Ok(Self {
            state: GovernorState {
                quorum: config.quorum,
                access,
                weights,
                delegation: DelegationGraph::new(),
                proposals: ProposalRegistry::new(),
            },
            clock,
            sink,
        })
    }

    /// Rebuild a governor from bytes produced by [`Governor::snapshot`].
    ///
    /// Fails with `Snapshot` if the bytes do not decode or the decoded
    /// state breaks an invariant.
    pub fn restore(bytes: &[u8], clock: C, sink: S) -> Result<Self, GovernanceError> {
        let state = borsh::from_slice::<GovernorState>(bytes)
            .map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        state.validate()?;
        debug!(proposals = state.proposals.count(), "governor restored");
        Ok(Self { state, clock, sink })
    }

    /// Encode the full governance state for an external store.
    pub fn snapshot(&self) -> Result<Vec<u8>, GovernanceError> {
        borsh::to_vec(&self.state).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Consume the governor, returning its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    // ---- weights ----

    /// Set the voting weight of `identity`. Admin only.
    ///
    /// Zero is stored but reads back as the default weight of 1.
    pub fn set_weight(
        &mut self,
        caller: Address,
        identity: Address,
        weight: u64,
    ) -> Result<(), GovernanceError> {
        self.state.access.require_admin(&caller)?;
        self.state.weights.set_weight(identity, weight)?;
        debug!(%identity, weight, "weight set");
        Ok(())
    }

    pub fn weight_of(&self, identity: &Address) -> u64 {
        self.state.weights.weight_of(identity)
    }

    // ---- delegation ----

    /// Delegate `caller`'s vote to `target`.
    pub fn delegate(&mut self, caller: Address, target: Address) -> Result<(), GovernanceError> {
        self.state.delegation.delegate(caller, target)?;
        self.sink.emit(GovernanceEvent::Delegated {
            from: caller,
            to: target,
        });
        Ok(())
    }

    /// Remove `caller`'s delegation.
    pub fn revoke_delegation(&mut self, caller: Address) -> Result<(), GovernanceError> {
        let previous = self.state.delegation.revoke(&caller)?;
        self.sink.emit(GovernanceEvent::DelegationRevoked {
            from: caller,
            previous,
        });
        Ok(())
    }

    /// Direct delegate of `identity`, if any.
    pub fn delegate_of(&self, identity: &Address) -> Option<Address> {
        self.state.delegation.delegate_of(identity)
    }

    /// Identities delegating directly to `identity`, in address order.
    pub fn delegators_of(&self, identity: &Address) -> Vec<Address> {
        self.state.delegation.delegators_of(identity)
    }

    /// Identity a vote from `identity` would be counted for.
    pub fn resolve(&self, identity: Address) -> Address {
        self.state.delegation.resolve(identity)
    }

    // ---- lifecycle ----

    fn lifecycle(&mut self) -> LifecycleController<'_, AdminGate> {
        LifecycleController::new(
            &mut self.state.proposals,
            &self.state.access,
            self.state.quorum,
        )
    }

    /// Open a proposal for `duration_minutes`. Admin only, not while paused.
    pub fn create_proposal(
        &mut self,
        caller: Address,
        description: impl Into<String>,
        duration_minutes: u64,
    ) -> Result<u64, GovernanceError> {
        let now = self.clock.now();
        let description = description.into();
        let id = self
            .lifecycle()
            .create(&caller, description.clone(), duration_minutes, now)?;
        let end_time = self.state.proposals.get(id)?.end_time();

        self.sink.emit(GovernanceEvent::ProposalCreated {
            id,
            description,
            end_time,
        });
        Ok(id)
    }

    /// Cast `caller`'s vote, counted for its resolved delegate.
    pub fn vote(
        &mut self,
        caller: Address,
        id: u64,
        choice: impl Into<VoteChoice>,
    ) -> Result<VoteReceipt, GovernanceError> {
        let now = self.clock.now();
        let receipt = VotingEngine::new(
            &mut self.state.proposals,
            &self.state.delegation,
            &self.state.weights,
        )
        .cast_vote(id, caller, choice.into(), now)?;

        self.sink.emit(GovernanceEvent::VoteRecorded {
            id,
            voter: receipt.voter,
            choice: receipt.choice,
            weight: receipt.weight,
        });
        Ok(receipt)
    }

    /// Execute a proposal whose window has elapsed; returns whether it passed.
    ///
    /// Open to any caller.
    pub fn execute(&mut self, caller: Address, id: u64) -> Result<bool, GovernanceError> {
        let now = self.clock.now();
        let passed = self.lifecycle().execute(id, now)?;
        debug!(%caller, id, "execution requested");
        self.sink.emit(GovernanceEvent::ProposalExecuted { id, passed });
        Ok(passed)
    }

    /// Cancel an open proposal. Admin only.
    pub fn cancel(&mut self, caller: Address, id: u64) -> Result<(), GovernanceError> {
        let now = self.clock.now();
        self.lifecycle().cancel(&caller, id, now)?;
        self.sink.emit(GovernanceEvent::ProposalCanceled { id });
        Ok(())
    }

    /// Extend an open proposal by `extra_minutes`. Admin only.
    pub fn extend(
        &mut self,
        caller: Address,
        id: u64,
        extra_minutes: u64,
    ) -> Result<u64, GovernanceError> {
        let now = self.clock.now();
        let new_end_time = self.lifecycle().extend(&caller, id, extra_minutes, now)?;
        self.sink.emit(GovernanceEvent::VotingExtended { id, new_end_time });
        Ok(new_end_time)
    }

    // ---- administration ----

    pub fn pause(&mut self, caller: Address) -> Result<(), GovernanceError> {
        self.state.access.pause(&caller)?;
        info!(%caller, "governance paused");
        self.sink.emit(GovernanceEvent::Paused { by: caller });
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<(), GovernanceError> {
        self.state.access.unpause(&caller)?;
        info!(%caller, "governance unpaused");
        self.sink.emit(GovernanceEvent::Unpaused { by: caller });
        Ok(())
    }

    /// Hand the administrator role to `new_admin`. Admin only.
    pub fn transfer_admin(
        &mut self,
        caller: Address,
        new_admin: Address,
    ) -> Result<(), GovernanceError> {
        let previous = self.state.access.transfer(&caller, new_admin)?;
        info!(%previous, new = %new_admin, "admin transferred");
        self.sink.emit(GovernanceEvent::AdminTransferred {
            previous,
            new: new_admin,
        });
        Ok(())
    }

    pub fn admin(&self) -> Address {
        self.state.access.admin()
    }

    pub fn is_paused(&self) -> bool {
        self.state.access.is_paused()
    }

    pub fn quorum(&self) -> u64 {
        self.state.quorum
    }

    // ---- queries ----

    pub fn get_proposal(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.state.proposals.get(id)
    }

    /// Whether the resolved `identity` has a counted vote on proposal `id`.
    pub fn has_voted(&self, id: u64, identity: &Address) -> Result<bool, GovernanceError> {
        self.state.proposals.get(id)?;
        Ok(self.state.proposals.has_voted(id, identity))
    }

    /// Resolved identities that voted on proposal `id`.
    pub fn voters(&self, id: u64) -> Result<Vec<Address>, GovernanceError> {
        self.state.proposals.get(id)?;
        Ok(self.state.proposals.voters(id))
    }

    /// `(yes, no)` tallies.
    pub fn vote_counts(&self, id: u64) -> Result<(u64, u64), GovernanceError> {
        let proposal = self.state.proposals.get(id)?;
        Ok((proposal.yes_votes(), proposal.no_votes()))
    }

    /// Seconds until voting closes, 0 once closed.
    pub fn time_left(&self, id: u64) -> Result<u64, GovernanceError> {
        let now = self.clock.now();
        Ok(self.state.proposals.get(id)?.time_left(now))
    }

    /// Outcome of an executed proposal.
    pub fn did_pass(&self, id: u64) -> Result<bool, GovernanceError> {
        self.state
            .proposals
            .get(id)?
            .passed()
            .ok_or(GovernanceError::NotExecuted)
    }

    pub fn description(&self, id: u64) -> Result<&str, GovernanceError> {
        Ok(self.state.proposals.get(id)?.description())
    }

    /// Every proposal id, ascending.
    pub fn all_proposal_ids(&self) -> Vec<u64> {
        self.state.proposals.all_ids()
    }
}
