use thiserror::Error;

/// Errors that can occur in governance operations.
///
/// Every precondition has its own variant so callers can branch on the
/// cause. [`GovernanceError::kind`] groups them into coarse categories.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GovernanceError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Governance is paused")]
    Paused,

    #[error("Governance is already paused")]
    AlreadyPaused,

    #[error("Governance is not paused")]
    NotPaused,

    #[error("Proposal not found: {0}")]
    ProposalNotFound(u64),

    #[error("Proposal was canceled")]
    ProposalCanceled,

    #[error("Proposal already canceled")]
    AlreadyCanceled,

    #[error("Proposal already executed")]
    AlreadyExecuted,

    #[error("Voting is closed")]
    VotingClosed,

    #[error("Voting period ended")]
    VotingEnded,

    #[error("Voting period has not ended")]
    VotingNotEnded,

    #[error("Proposal not executed yet")]
    NotExecuted,

    #[error("Already voted")]
    AlreadyVoted,

    #[error("Already delegating; revoke the current delegation first")]
    AlreadyDelegated,

    #[error("No active delegation")]
    NoDelegation,

    #[error("Invalid delegation target: {0}")]
    InvalidTarget(String),

    #[error("Zero identity not allowed")]
    ZeroIdentity,

    #[error("Quorum not reached: {actual} < {required}")]
    QuorumNotReached { actual: u64, required: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Vote tally overflow")]
    TallyOverflow,

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Coarse failure categories for callers that do not need the exact cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Capability check failed
    Unauthorized,
    /// Operation not allowed in the current proposal or system state
    InvalidState,
    /// Unknown proposal or missing delegation
    NotFound,
    /// Resolved identity already voted on the proposal
    AlreadyVoted,
    /// Delegation edge already present
    Delegation,
    /// Combined tally below quorum
    QuorumNotMet,
    /// Bad input value
    InvalidArgument,
    /// Encoding or arithmetic failure
    Internal,
}

impl GovernanceError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GovernanceError::Unauthorized(_) => ErrorKind::Unauthorized,
            GovernanceError::Paused
            | GovernanceError::AlreadyPaused
            | GovernanceError::NotPaused
            | GovernanceError::ProposalCanceled
            | GovernanceError::AlreadyCanceled
            | GovernanceError::AlreadyExecuted
            | GovernanceError::VotingClosed
            | GovernanceError::VotingEnded
            | GovernanceError::VotingNotEnded
            | GovernanceError::NotExecuted => ErrorKind::InvalidState,
            GovernanceError::ProposalNotFound(_) | GovernanceError::NoDelegation => {
                ErrorKind::NotFound
            }
            GovernanceError::AlreadyVoted => ErrorKind::AlreadyVoted,
            GovernanceError::AlreadyDelegated => ErrorKind::Delegation,
            GovernanceError::QuorumNotReached { .. } => ErrorKind::QuorumNotMet,
            GovernanceError::InvalidTarget(_)
            | GovernanceError::ZeroIdentity
            | GovernanceError::InvalidParameter(_)
            | GovernanceError::InvalidConfig(_) => ErrorKind::InvalidArgument,
            GovernanceError::TallyOverflow | GovernanceError::Snapshot(_) => ErrorKind::Internal,
        }
    }
}
