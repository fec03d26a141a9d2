//! End-to-end governance flows through the `Governor`.

use agora_governance::{
    Governor, GovernanceError, GovernanceEvent, ManualClock, VoteChoice, MAX_DELEGATION_HOPS,
};
use agora_types::Address;
use proptest::prelude::*;

fn test_address(n: u8) -> Address {
    let mut addr = [0u8; 20];
    addr[19] = n;
    Address::from_bytes(addr)
}

fn admin() -> Address {
    test_address(200)
}

fn setup(quorum: u64) -> (Governor<ManualClock, Vec<GovernanceEvent>>, ManualClock) {
    let clock = ManualClock::new(1_700_000_000);
    let gov = Governor::new(admin(), quorum, clock.clone(), Vec::new()).unwrap();
    (gov, clock)
}

#[test]
fn test_quorum_three_majority_passes() {
    let (mut gov, clock) = setup(3);
    let (a, b, c) = (test_address(1), test_address(2), test_address(3));

    let id = gov.create_proposal(admin(), "Adopt charter", 1).unwrap();
    gov.vote(a, id, VoteChoice::Yes).unwrap();
    gov.vote(b, id, VoteChoice::Yes).unwrap();
    gov.vote(c, id, VoteChoice::No).unwrap();

    // Window still open
    assert_eq!(gov.execute(a, id), Err(GovernanceError::VotingNotEnded));

    clock.advance(60);
    assert_eq!(gov.execute(a, id), Ok(true));
    assert_eq!(gov.did_pass(id), Ok(true));
    assert_eq!(gov.execute(a, id), Err(GovernanceError::AlreadyExecuted));
}

#[test]
fn test_quorum_gate() {
    let (mut gov, clock) = setup(3);
    let id = gov.create_proposal(admin(), "Too quiet", 1).unwrap();
    gov.vote(test_address(1), id, VoteChoice::Yes).unwrap();
    gov.vote(test_address(2), id, VoteChoice::Yes).unwrap();

    clock.advance(60);
    assert_eq!(
        gov.execute(test_address(1), id),
        Err(GovernanceError::QuorumNotReached { actual: 2, required: 3 })
    );
    assert!(!gov.get_proposal(id).unwrap().is_executed());

    // Heavier weights meet quorum with a single voter
    let id = gov.create_proposal(admin(), "Weighted", 1).unwrap();
    gov.set_weight(admin(), test_address(5), 3).unwrap();
    gov.vote(test_address(5), id, VoteChoice::No).unwrap();
    clock.advance(60);
    assert_eq!(gov.execute(test_address(1), id), Ok(false));
}

#[test]
fn test_delegated_vote_scenario() {
    let (mut gov, _) = setup(0);
    let (a, b) = (test_address(1), test_address(2));
    gov.set_weight(admin(), b, 4).unwrap();
    gov.delegate(a, b).unwrap();

    let id = gov.create_proposal(admin(), "Delegation", 10).unwrap();
    let receipt = gov.vote(a, id, VoteChoice::Yes).unwrap();

    assert_eq!(receipt.voter, b);
    assert_eq!(gov.vote_counts(id).unwrap(), (4, 0));
    assert_eq!(gov.has_voted(id, &b), Ok(true));
    assert_eq!(gov.has_voted(id, &a), Ok(false));
    assert_eq!(gov.vote(b, id, VoteChoice::Yes), Err(GovernanceError::AlreadyVoted));
}

#[test]
fn test_two_cycle_terminates() {
    let (mut gov, _) = setup(0);
    let (a, b) = (test_address(1), test_address(2));
    gov.delegate(a, b).unwrap();
    gov.delegate(b, a).unwrap();

    // Even hop bound: each resolves to itself
    assert_eq!(MAX_DELEGATION_HOPS % 2, 0);
    assert_eq!(gov.resolve(a), a);
    assert_eq!(gov.resolve(b), b);

    let id = gov.create_proposal(admin(), "Cycle", 10).unwrap();
    assert_eq!(gov.vote(a, id, VoteChoice::Yes).unwrap().voter, a);
    assert_eq!(gov.vote(b, id, VoteChoice::No).unwrap().voter, b);
}

#[test]
fn test_zero_weight_is_default() {
    let (mut gov, _) = setup(0);
    let a = test_address(1);
    gov.set_weight(admin(), a, 0).unwrap();
    assert_eq!(gov.weight_of(&a), 1);
    assert_eq!(gov.weight_of(&a), gov.weight_of(&test_address(2)));

    // Still votes with weight 1
    let id = gov.create_proposal(admin(), "Zero", 1).unwrap();
    assert_eq!(gov.vote(a, id, VoteChoice::Yes).unwrap().weight, 1);
}

#[test]
fn test_redelegation_requires_revoke() {
    let (mut gov, _) = setup(0);
    let (a, b, c) = (test_address(1), test_address(2), test_address(3));

    gov.delegate(a, b).unwrap();
    assert_eq!(gov.delegate(a, c), Err(GovernanceError::AlreadyDelegated));
    gov.revoke_delegation(a).unwrap();
    assert_eq!(gov.revoke_delegation(a), Err(GovernanceError::NoDelegation));
    gov.delegate(a, c).unwrap();
    assert_eq!(gov.delegate_of(&a), Some(c));
}

#[test]
fn test_terminal_states_are_final() {
    let (mut gov, clock) = setup(0);
    let voter = test_address(1);

    let canceled = gov.create_proposal(admin(), "Cancel me", 1).unwrap();
    let executed = gov.create_proposal(admin(), "Run me", 1).unwrap();
    gov.cancel(admin(), canceled).unwrap();

    assert_eq!(gov.vote(voter, canceled, VoteChoice::Yes), Err(GovernanceError::ProposalCanceled));
    assert_eq!(gov.extend(admin(), canceled, 5), Err(GovernanceError::AlreadyCanceled));

    clock.advance(60);
    assert_eq!(gov.execute(voter, canceled), Err(GovernanceError::AlreadyCanceled));
    assert_eq!(gov.execute(voter, executed), Ok(false));
    assert_eq!(gov.cancel(admin(), executed), Err(GovernanceError::AlreadyExecuted));
    assert_eq!(gov.extend(admin(), executed, 5), Err(GovernanceError::AlreadyExecuted));
    assert_eq!(gov.vote(voter, executed, VoteChoice::Yes), Err(GovernanceError::VotingClosed));

    for id in gov.all_proposal_ids() {
        let p = gov.get_proposal(id).unwrap();
        assert!(!(p.is_executed() && p.is_canceled()));
        assert_eq!(p.voters_count(), 0);
    }
}

#[test]
fn test_extend_reopens_nothing_but_delays_close() {
    let (mut gov, clock) = setup(0);
    let id = gov.create_proposal(admin(), "Extend", 1).unwrap();
    let end = gov.get_proposal(id).unwrap().end_time();

    clock.advance(30);
    let new_end = gov.extend(admin(), id, 1).unwrap();
    assert_eq!(new_end, end + 60);

    clock.advance(40);
    assert!(gov.vote(test_address(1), id, VoteChoice::Yes).is_ok());
    assert_eq!(gov.time_left(id).unwrap(), 50);
    assert_eq!(gov.execute(test_address(1), id), Err(GovernanceError::VotingNotEnded));
}

#[test]
fn test_unknown_ids() {
    let (mut gov, _) = setup(0);
    assert_eq!(gov.get_proposal(0).err(), Some(GovernanceError::ProposalNotFound(0)));
    assert_eq!(gov.vote(test_address(1), 1, VoteChoice::Yes), Err(GovernanceError::ProposalNotFound(1)));
    assert_eq!(gov.execute(test_address(1), 1), Err(GovernanceError::ProposalNotFound(1)));
    assert!(gov.all_proposal_ids().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_one_counted_vote_per_resolved_identity(
        edges in proptest::collection::vec((1u8..10, 1u8..10), 0..25),
        votes in proptest::collection::vec((1u8..10, any::<bool>()), 1..30),
        weights in proptest::collection::vec((1u8..10, 0u64..5), 0..10),
    ) {
        let (mut gov, _) = setup(0);
        for (from, to) in edges {
            let _ = gov.delegate(test_address(from), test_address(to));
        }
        for (who, weight) in weights {
            gov.set_weight(admin(), test_address(who), weight).unwrap();
        }
        let id = gov.create_proposal(admin(), "Property", 10).unwrap();

        let mut counted = std::collections::HashSet::new();
        let mut expected_total = 0u64;
        for (who, support) in votes {
            let caller = test_address(who);
            let resolved = gov.resolve(caller);
            match gov.vote(caller, id, support) {
                Ok(receipt) => {
                    prop_assert_eq!(receipt.voter, resolved);
                    prop_assert!(counted.insert(resolved));
                    expected_total += receipt.weight;
                }
                Err(e) => {
                    prop_assert_eq!(e, GovernanceError::AlreadyVoted);
                    prop_assert!(counted.contains(&resolved));
                }
            }
        }

        let proposal = gov.get_proposal(id).unwrap();
        prop_assert_eq!(proposal.voters_count(), counted.len() as u64);
        prop_assert_eq!(proposal.total_votes(), expected_total);
    }
}
