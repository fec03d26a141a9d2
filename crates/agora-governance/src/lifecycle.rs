//! Proposal lifecycle: create, cancel, extend, execute.
//!
//! Open -> Executed | Canceled. Nothing leaves a terminal state.

use agora_types::Address;
use tracing::info;
use crate::access::AccessGate;
use crate::error::GovernanceError;
use crate::proposal::{Proposal, ProposalRegistry};

const SECONDS_PER_MINUTE: u64 = 60;

fn minutes_to_secs(minutes: u64) -> Result<u64, GovernanceError> {
    minutes
        .checked_mul(SECONDS_PER_MINUTE)
        .ok_or_else(|| GovernanceError::InvalidParameter(format!("{} minutes is too long", minutes)))
}

/// Drives lifecycle transitions against the proposal registry.
pub struct LifecycleController<'a, G: AccessGate> {
    proposals: &'a mut ProposalRegistry,
    access: &'a G,
    quorum: u64,
}

impl<'a, G: AccessGate> LifecycleController<'a, G> {
    pub fn new(proposals: &'a mut ProposalRegistry, access: &'a G, quorum: u64) -> Self {
        Self {
            proposals,
            access,
            quorum,
        }
    }

    /// Open a new proposal running for `duration_minutes` from `now`.
    ///
    /// Admin only, rejected while paused.
    pub fn create(
        &mut self,
        caller: &Address,
        description: String,
        duration_minutes: u64,
        now: u64,
    ) -> Result<u64, GovernanceError> {
        self.access.require_admin(caller)?;
        if self.access.is_paused() {
            return Err(GovernanceError::Paused);
        }
        if duration_minutes == 0 {
            return Err(GovernanceError::InvalidParameter(
                "duration must be positive".to_string(),
            ));
        }
        let end_time = now
            .checked_add(minutes_to_secs(duration_minutes)?)
            .ok_or_else(|| GovernanceError::InvalidParameter("end time overflows".to_string()))?;

        let id = self.proposals.create(description, end_time, now);
        info!(id, end_time, "proposal created");
        Ok(id)
    }

    /// Cancel an open proposal before its window elapses. Admin only.
    pub fn cancel(&mut self, caller: &Address, id: u64, now: u64) -> Result<(), GovernanceError> {
        self.access.require_admin(caller)?;
        Self::require_open(self.proposals.get(id)?, now)?;

        self.proposals.mark_canceled(id)?;
        info!(id, "proposal canceled");
        Ok(())
    }

    /// Push the end time of an open proposal out by `extra_minutes`.
    ///
    /// Admin only. The end time only ever grows. Returns the new end time.
    pub fn extend(
        &mut self,
        caller: &Address,
        id: u64,
        extra_minutes: u64,
        now: u64,
    ) -> Result<u64, GovernanceError> {
        self.access.require_admin(caller)?;
        if extra_minutes == 0 {
            return Err(GovernanceError::InvalidParameter(
                "extension must be positive".to_string(),
            ));
        }
        let proposal = self.proposals.get(id)?;
        Self::require_open(proposal, now)?;

        let new_end_time = proposal
            .end_time()
            .checked_add(minutes_to_secs(extra_minutes)?)
            .ok_or_else(|| GovernanceError::InvalidParameter("end time overflows".to_string()))?;

        self.proposals.set_end_time(id, new_end_time)?;
        info!(id, new_end_time, "voting extended");
        Ok(new_end_time)
    }

    /// Execute a proposal whose window has elapsed.
    ///
    /// Anyone may call. Requires `yes + no >= quorum`; returns whether the
    /// proposal passed (`yes > no`, a tie fails).
    pub fn execute(&mut self, id: u64, now: u64) -> Result<bool, GovernanceError> {
        let proposal = self.proposals.get(id)?;
        if proposal.is_canceled() {
            return Err(GovernanceError::AlreadyCanceled);
        }
        if proposal.is_executed() {
            return Err(GovernanceError::AlreadyExecuted);
        }
        if now < proposal.end_time() {
            return Err(GovernanceError::VotingNotEnded);
        }

        let total = proposal.total_votes();
        if total < self.quorum {
            return Err(GovernanceError::QuorumNotReached {
                actual: total,
                required: self.quorum,
            });
        }

        let passed = proposal.yes_votes() > proposal.no_votes();
        self.proposals.mark_executed(id, passed)?;
        info!(id, passed, total, "proposal executed");
        Ok(passed)
    }

    fn require_open(proposal: &Proposal, now: u64) -> Result<(), GovernanceError> {
        if proposal.is_executed() {
            return Err(GovernanceError::AlreadyExecuted);
        }
        if proposal.is_canceled() {
            return Err(GovernanceError::AlreadyCanceled);
        }
        if now >= proposal.end_time() {
            return Err(GovernanceError::VotingEnded);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::AdminGate;
    use crate::proposal::VoteChoice;

    fn test_address(n: u8) -> Address {
        let mut addr = [0u8; 20];
        addr[19] = n;
        Address::from_bytes(addr)
    }

    fn admin() -> Address {
        test_address(100)
    }

    fn setup() -> (ProposalRegistry, AdminGate) {
        (ProposalRegistry::new(), AdminGate::new(admin()).unwrap())
    }

    #[test]
    fn test_create_sets_end_time() {
        let (mut proposals, gate) = setup();
        let id = LifecycleController::new(&mut proposals, &gate, 0)
            .create(&admin(), "Test".to_string(), 5, 1_000)
            .unwrap();

        assert_eq!(id, 1);
        assert_eq!(proposals.get(id).unwrap().end_time(), 1_300);
    }

    #[test]
    fn test_create_requires_admin_and_unpaused() {
        let (mut proposals, mut gate) = setup();

        let result = LifecycleController::new(&mut proposals, &gate, 0)
            .create(&test_address(1), "Test".to_string(), 5, 0);
        assert!(matches!(result, Err(GovernanceError::Unauthorized(_))));

        let result = LifecycleController::new(&mut proposals, &gate, 0)
            .create(&admin(), "Test".to_string(), 0, 0);
        assert!(matches!(result, Err(GovernanceError::InvalidParameter(_))));

        gate.pause(&admin()).unwrap();
        let result = LifecycleController::new(&mut proposals, &gate, 0)
            .create(&admin(), "Test".to_string(), 5, 0);
        assert_eq!(result, Err(GovernanceError::Paused));
        assert_eq!(proposals.count(), 0);
    }

    #[test]
    fn test_create_rejects_overflowing_duration() {
        let (mut proposals, gate) = setup();
        let result = LifecycleController::new(&mut proposals, &gate, 0)
            .create(&admin(), "Test".to_string(), u64::MAX, 0);
        assert!(matches!(result, Err(GovernanceError::InvalidParameter(_))));
    }

    #[test]
    fn test_cancel() {
        let (mut proposals, gate) = setup();
        let mut lc = LifecycleController::new(&mut proposals, &gate, 0);
        let id = lc.create(&admin(), "Test".to_string(), 1, 0).unwrap();

        assert!(matches!(
            lc.cancel(&test_address(1), id, 10),
            Err(GovernanceError::Unauthorized(_))
        ));
        lc.cancel(&admin(), id, 10).unwrap();
        assert_eq!(lc.cancel(&admin(), id, 10), Err(GovernanceError::AlreadyCanceled));
        assert_eq!(lc.execute(id, 100), Err(GovernanceError::AlreadyCanceled));

        assert!(proposals.get(id).unwrap().is_canceled());
        assert!(!proposals.get(id).unwrap().is_executed());
    }

    #[test]
    fn test_cancel_after_window() {
        let (mut proposals, gate) = setup();
        let mut lc = LifecycleController::new(&mut proposals, &gate, 0);
        let id = lc.create(&admin(), "Test".to_string(), 1, 0).unwrap();

        assert_eq!(lc.cancel(&admin(), id, 60), Err(GovernanceError::VotingEnded));
        assert_eq!(lc.cancel(&admin(), 7, 0), Err(GovernanceError::ProposalNotFound(7)));
    }

    #[test]
    fn test_extend() {
        let (mut proposals, gate) = setup();
        let mut lc = LifecycleController::new(&mut proposals, &gate, 0);
        let id = lc.create(&admin(), "Test".to_string(), 1, 0).unwrap();

        assert!(matches!(
            lc.extend(&admin(), id, 0, 10),
            Err(GovernanceError::InvalidParameter(_))
        ));
        assert_eq!(lc.extend(&admin(), id, 2, 10).unwrap(), 180);

        // Still open at 100 thanks to the extension
        assert_eq!(lc.extend(&admin(), id, 1, 100).unwrap(), 240);
        assert_eq!(lc.extend(&admin(), id, 1, 240), Err(GovernanceError::VotingEnded));
        assert_eq!(proposals.get(id).unwrap().end_time(), 240);
    }

    #[test]
    fn test_extend_terminal_fails() {
        let (mut proposals, gate) = setup();
        let mut lc = LifecycleController::new(&mut proposals, &gate, 0);
        let canceled = lc.create(&admin(), "a".to_string(), 1, 0).unwrap();
        let executed = lc.create(&admin(), "b".to_string(), 1, 0).unwrap();

        lc.cancel(&admin(), canceled, 0).unwrap();
        lc.execute(executed, 60).unwrap();

        assert_eq!(lc.extend(&admin(), canceled, 1, 0), Err(GovernanceError::AlreadyCanceled));
        assert_eq!(lc.extend(&admin(), executed, 1, 0), Err(GovernanceError::AlreadyExecuted));
    }

    #[test]
    fn test_execute_quorum_and_majority() {
        let (mut proposals, gate) = setup();
        let id = LifecycleController::new(&mut proposals, &gate, 3)
            .create(&admin(), "Test".to_string(), 1, 0)
            .unwrap();
        proposals.record_vote(id, test_address(1), VoteChoice::Yes, 1).unwrap();
        proposals.record_vote(id, test_address(2), VoteChoice::No, 1).unwrap();

        let mut lc = LifecycleController::new(&mut proposals, &gate, 3);
        assert_eq!(lc.execute(id, 59), Err(GovernanceError::VotingNotEnded));
        assert_eq!(
            lc.execute(id, 60),
            Err(GovernanceError::QuorumNotReached { actual: 2, required: 3 })
        );

        // A tie that meets quorum executes but does not pass
        let mut lc = LifecycleController::new(&mut proposals, &gate, 2);
        assert_eq!(lc.execute(id, 60), Ok(false));
        assert_eq!(lc.execute(id, 61), Err(GovernanceError::AlreadyExecuted));
        assert_eq!(proposals.get(id).unwrap().passed(), Some(false));
    }

    #[test]
    fn test_execute_zero_quorum_no_votes() {
        let (mut proposals, gate) = setup();
        let mut lc = LifecycleController::new(&mut proposals, &gate, 0);
        let id = lc.create(&admin(), "Test".to_string(), 1, 0).unwrap();

        // 0 yes vs 0 no is not a majority
        assert_eq!(lc.execute(id, 60), Ok(false));
    }
}
