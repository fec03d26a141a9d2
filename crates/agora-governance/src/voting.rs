//! Vote casting.
//!
//! A caller's vote is counted for the identity its delegation resolves to,
//! with that identity's weight. Each resolved identity is counted at most
//! once per proposal, however many callers route to it: the first caller to
//! arrive casts the vote and every later one is rejected.

use agora_types::Address;
use tracing::{debug, info};
use crate::delegation::DelegationGraph;
use crate::error::GovernanceError;
use crate::proposal::{ProposalRegistry, VoteChoice};
use crate::weights::WeightRegistry;

/// Outcome of a counted vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteReceipt {
    pub proposal_id: u64,
    /// Identity that submitted the vote
    pub caller: Address,
    /// Resolved identity the vote was counted for
    pub voter: Address,
    pub choice: VoteChoice,
    pub weight: u64,
}

/// Casts votes against the proposal registry.
///
/// Reads delegation and weights, never writes them.
pub struct VotingEngine<'a> {
    proposals: &'a mut ProposalRegistry,
    delegation: &'a DelegationGraph,
    weights: &'a WeightRegistry,
}

impl<'a> VotingEngine<'a> {
    pub fn new(
        proposals: &'a mut ProposalRegistry,
        delegation: &'a DelegationGraph,
        weights: &'a WeightRegistry,
    ) -> Self {
        Self {
            proposals,
            delegation,
            weights,
        }
    }

    /// Cast `caller`'s vote on proposal `proposal_id` at time `now`.
    ///
    /// # Errors
    /// - `ProposalNotFound` for an unknown id
    /// - `ProposalCanceled` if the proposal was canceled
    /// - `VotingClosed` once `now` reaches the end time
    /// - `AlreadyVoted` if the resolved identity was already counted
    /// - `TallyOverflow` if the weight does not fit the tally
    pub fn cast_vote(
        &mut self,
        proposal_id: u64,
        caller: Address,
        choice: VoteChoice,
        now: u64,
    ) -> Result<VoteReceipt, GovernanceError> {
        let proposal = self.proposals.get(proposal_id)?;
        if proposal.is_canceled() {
            return Err(GovernanceError::ProposalCanceled);
        }
        // Canceled is ruled out above, so this is the window or execution
        if !proposal.is_open(now) {
            return Err(GovernanceError::VotingClosed);
        }

        let (voter, hops) = self.delegation.resolve_with_hops(caller);
        if self.proposals.has_voted(proposal_id, &voter) {
            debug!(proposal_id, %caller, %voter, "rejected duplicate vote");
            return Err(GovernanceError::AlreadyVoted);
        }

        let weight = self.weights.weight_of(&voter);
        self.proposals.record_vote(proposal_id, voter, choice, weight)?;

        info!(proposal_id, %caller, %voter, hops, ?choice, weight, "vote recorded");

        Ok(VoteReceipt {
            proposal_id,
            caller,
            voter,
            choice,
            weight,
        })
    }
}
