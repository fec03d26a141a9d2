//! Agora Governance - Proposal, delegation and quorum-gated voting core.
//!
//! This crate provides:
//! - Time-boxed proposals created by an administrator
//! - Weighted yes/no voting with one counted vote per resolved identity
//! - Single-edge delegation resolved over at most 10 hops
//! - Quorum-gated execution with mutually exclusive terminal states
//!
//! [`Governor`] owns all state and is the entry point for every operation.

pub mod access;
pub mod clock;
pub mod config;
pub mod delegation;
pub mod error;
pub mod events;
pub mod governor;
pub mod lifecycle;
pub mod proposal;
pub mod voting;
pub mod weights;

pub use access::{AccessGate, AdminGate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{GovernanceConfig, WeightEntry};
pub use delegation::{DelegationGraph, MAX_DELEGATION_HOPS};
pub use error::{ErrorKind, GovernanceError};
pub use events::{EventSink, GovernanceEvent, TracingSink};
pub use governor::{Governor, GovernorState};
pub use lifecycle::LifecycleController;
pub use proposal::{Proposal, ProposalRegistry, ProposalStatus, VoteChoice};
pub use voting::{VoteReceipt, VotingEngine};
pub use weights::{WeightRegistry, DEFAULT_WEIGHT};
