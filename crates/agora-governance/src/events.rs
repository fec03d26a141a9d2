//! Notifications emitted after successful state changes.
//!
//! Delivery is up to the sink; the core never reads events back.

use agora_types::Address;
use serde::Serialize;
use tracing::info;
use crate::proposal::VoteChoice;

/// Governance notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GovernanceEvent {
    ProposalCreated {
        id: u64,
        description: String,
        end_time: u64,
    },
    VoteRecorded {
        id: u64,
        voter: Address,
        choice: VoteChoice,
        weight: u64,
    },
    ProposalExecuted {
        id: u64,
        passed: bool,
    },
    ProposalCanceled {
        id: u64,
    },
    VotingExtended {
        id: u64,
        new_end_time: u64,
    },
    AdminTransferred {
        previous: Address,
        new: Address,
    },
    Paused {
        by: Address,
    },
    Unpaused {
        by: Address,
    },
    Delegated {
        from: Address,
        to: Address,
    },
    DelegationRevoked {
        from: Address,
        previous: Address,
    },
}

impl GovernanceEvent {
    /// Short event name.
    pub fn name(&self) -> &'static str {
        match self {
            GovernanceEvent::ProposalCreated { .. } => "proposal_created",
            GovernanceEvent::VoteRecorded { .. } => "vote_recorded",
            GovernanceEvent::ProposalExecuted { .. } => "proposal_executed",
            GovernanceEvent::ProposalCanceled { .. } => "proposal_canceled",
            GovernanceEvent::VotingExtended { .. } => "voting_extended",
            GovernanceEvent::AdminTransferred { .. } => "admin_transferred",
            GovernanceEvent::Paused { .. } => "paused",
            GovernanceEvent::Unpaused { .. } => "unpaused",
            GovernanceEvent::Delegated { .. } => "delegated",
            GovernanceEvent::DelegationRevoked { .. } => "delegation_revoked",
        }
    }
}

/// Receiver of governance notifications.
pub trait EventSink {
    fn emit(&mut self, event: GovernanceEvent);
}

/// Collects events in memory.
impl EventSink for Vec<GovernanceEvent> {
    fn emit(&mut self, event: GovernanceEvent) {
        self.push(event);
    }
}

/// Logs every event through `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: GovernanceEvent) {
        info!(target: "agora::events", kind = event.name(), ?event, "governance event");
    }
}
