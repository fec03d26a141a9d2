//! Proposal records and the registry that owns them.
//!
//! A proposal is Open from creation until it is either Executed or
//! Canceled; both are terminal and mutually exclusive. The registry is a
//! plain state container: business rules are checked by the voting engine
//! and the lifecycle controller before they call the crate-private mutators.

use std::collections::BTreeSet;
use agora_types::Address;
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use crate::error::GovernanceError;

/// A yes/no ballot choice.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

impl From<bool> for VoteChoice {
    fn from(support: bool) -> Self {
        if support {
            VoteChoice::Yes
        } else {
            VoteChoice::No
        }
    }
}

/// Display status derived from the flags and the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    /// Voting window is open
    Open,
    /// Window elapsed, waiting for execution
    Closed,
    /// Proposal was executed
    Executed,
    /// Proposal was canceled
    Canceled,
}

impl ProposalStatus {
    /// Check if the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProposalStatus::Executed | ProposalStatus::Canceled)
    }
}

/// One governance question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, BorshSerialize, BorshDeserialize)]
pub struct Proposal {
    id: u64,
    description: String,
    created_at: u64,
    end_time: u64,
    yes_votes: u64,
    no_votes: u64,
    voters_count: u64,
    executed: bool,
    canceled: bool,
    passed: bool,
}

impl Proposal {
    fn new(id: u64, description: String, created_at: u64, end_time: u64) -> Self {
        Self {
            id,
            description,
            created_at,
            end_time,
            yes_votes: 0,
            no_votes: 0,
            voters_count: 0,
            executed: false,
            canceled: false,
            passed: false,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Clock reading when the proposal was created.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Voting is closed from this timestamp on.
    pub fn end_time(&self) -> u64 {
        self.end_time
    }

    pub fn yes_votes(&self) -> u64 {
        self.yes_votes
    }

    pub fn no_votes(&self) -> u64 {
        self.no_votes
    }

    /// Combined weight counted toward quorum.
    pub fn total_votes(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }

    /// Distinct resolved identities that voted.
    pub fn voters_count(&self) -> u64 {
        self.voters_count
    }

    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    /// Executed or canceled.
    pub fn is_terminal(&self) -> bool {
        self.executed || self.canceled
    }

    /// Outcome recorded at execution; `None` before.
    pub fn passed(&self) -> Option<bool> {
        self.executed.then_some(self.passed)
    }

    /// Whether votes are still accepted at `now`.
    pub fn is_open(&self, now: u64) -> bool {
        !self.is_terminal() && now < self.end_time
    }

    /// Seconds left in the voting window, 0 once it has elapsed.
    pub fn time_left(&self, now: u64) -> u64 {
        self.end_time.saturating_sub(now)
    }

    pub fn status(&self, now: u64) -> ProposalStatus {
        if self.canceled {
            ProposalStatus::Canceled
        } else if self.executed {
            ProposalStatus::Executed
        } else if now >= self.end_time {
            ProposalStatus::Closed
        } else {
            ProposalStatus::Open
        }
    }
}

/// Registry owning all proposals and their vote receipts.
///
/// Ids are assigned sequentially from 1 and proposals are never removed,
/// so proposal `id` lives at index `id - 1`. Receipts are kept apart from
/// the records, keyed by `(proposal id, resolved identity)`.
#[derive(Debug, Default, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ProposalRegistry {
    proposals: Vec<Proposal>,
    receipts: BTreeSet<(u64, Address)>,
}

impl ProposalRegistry {
    /// Create a new registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new open proposal and return its id.
    ///
    /// No validation happens here; the lifecycle controller checks the
    /// caller and the deadline.
    pub fn create(&mut self, description: String, end_time: u64, now: u64) -> u64 {
        let id = self.proposals.len() as u64 + 1;
        self.proposals.push(Proposal::new(id, description, now, end_time));
        id
    }

    /// Get a proposal.
    pub fn get(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.index(id)
            .and_then(|idx| self.proposals.get(idx))
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        self.index(id)
            .and_then(|idx| self.proposals.get_mut(idx))
            .ok_or(GovernanceError::ProposalNotFound(id))
    }

    fn index(&self, id: u64) -> Option<usize> {
        id.checked_sub(1).and_then(|i| usize::try_from(i).ok())
    }

    /// Whether `identity` has a counted vote on proposal `id`.
    pub fn has_voted(&self, id: u64, identity: &Address) -> bool {
        self.receipts.contains(&(id, *identity))
    }

    /// Resolved identities that voted on proposal `id`, in address order.
    pub fn voters(&self, id: u64) -> Vec<Address> {
        self.receipts_for(id).map(|(_, voter)| *voter).collect()
    }

    fn receipts_for(&self, id: u64) -> impl Iterator<Item = &(u64, Address)> + '_ {
        self.receipts
            .range((id, Address::ZERO)..=(id, Address::from_bytes([0xff; 20])))
    }

    /// All assigned ids in creation order.
    pub fn all_ids(&self) -> Vec<u64> {
        self.proposals.iter().map(|p| p.id).collect()
    }

    /// Number of proposals created so far.
    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Record a counted vote.
    ///
    /// Either the receipt, the voter count and the tally all change or
    /// nothing does.
    pub(crate) fn record_vote(
        &mut self,
        id: u64,
        voter: Address,
        choice: VoteChoice,
        weight: u64,
    ) -> Result<(), GovernanceError> {
        let proposal = self.get_mut(id)?;
        let tally = match choice {
            VoteChoice::Yes => proposal.yes_votes,
            VoteChoice::No => proposal.no_votes,
        };
        let new_tally = tally.checked_add(weight).ok_or(GovernanceError::TallyOverflow)?;
        let new_count = proposal
            .voters_count
            .checked_add(1)
            .ok_or(GovernanceError::TallyOverflow)?;

        match choice {
            VoteChoice::Yes => proposal.yes_votes = new_tally,
            VoteChoice::No => proposal.no_votes = new_tally,
        }
        proposal.voters_count = new_count;
        self.receipts.insert((id, voter));
        Ok(())
    }

    pub(crate) fn mark_executed(&mut self, id: u64, passed: bool) -> Result<(), GovernanceError> {
        let proposal = self.get_mut(id)?;
        proposal.executed = true;
        proposal.passed = passed;
        Ok(())
    }

    pub(crate) fn mark_canceled(&mut self, id: u64) -> Result<(), GovernanceError> {
        self.get_mut(id)?.canceled = true;
        Ok(())
    }

    pub(crate) fn set_end_time(&mut self, id: u64, end_time: u64) -> Result<(), GovernanceError> {
        self.get_mut(id)?.end_time = end_time;
        Ok(())
    }

    /// Check a decoded registry against the invariants the mutators keep.
    pub(crate) fn validate(&self) -> Result<(), GovernanceError> {
        let invalid = |msg: String| Err(GovernanceError::Snapshot(msg));

        for (idx, proposal) in self.proposals.iter().enumerate() {
            let expected = idx as u64 + 1;
            if proposal.id != expected {
                return invalid(format!("proposal in slot {} has id {}", expected, proposal.id));
            }
            if proposal.executed && proposal.canceled {
                return invalid(format!("proposal {} is both executed and canceled", proposal.id));
            }
            if proposal.passed && !proposal.executed {
                return invalid(format!("proposal {} passed without being executed", proposal.id));
            }
            let receipts = self.receipts_for(proposal.id).count() as u64;
            if receipts != proposal.voters_count {
                return invalid(format!(
                    "proposal {} counts {} voters but has {} receipts",
                    proposal.id, proposal.voters_count, receipts
                ));
            }
        }

        if let Some((id, voter)) = self
            .receipts
            .iter()
            .find(|(id, _)| *id == 0 || *id > self.count())
        {
            return invalid(format!("receipt for {} on unknown proposal {}", voter, id));
        }
        Ok(())
    }
}
