#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use soroban_sdk::{testutils::Address as _, Address, Env, String};
use voting::{
    proposal, tally::compute_winner, voter, VotingContract, VotingContractClient, WorkflowStatus,
};

/// Actions covering every state-changing voting entry point.
///
/// `user` picks from a small pool so that the same addresses are hit
/// repeatedly; `proposal_id` is left unbounded to probe the range checks.
#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    RegisterVoter { user: u8 },
    AddProposal { user: u8, len: u8 },
    CastVote { user: u8, proposal_id: u32 },
    StartProposalsRegistering,
    EndProposalsRegistering,
    StartVotingSession,
    EndVotingSession,
    TallyVotes,
    /// A pool user attempts the next transition.
    AdvanceAs { user: u8 },
}

const POOL: usize = 5;

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let contract_id = env.register(VotingContract, ());
    let client = VotingContractClient::new(&env, &contract_id);

    if client.try_initialize(&admin).is_err() {
        return;
    }

    let users: Vec<Address> = (0..POOL).map(|_| Address::generate(&env)).collect();
    let pick = |user: u8| &users[user as usize % POOL];

    let mut last_status = client.get_workflow_status();

    for action in actions {
        match action {
            FuzzAction::RegisterVoter { user } => {
                let _ = client.try_register_voter(&admin, pick(user));
            }
            FuzzAction::AddProposal { user, len } => {
                let text = "x".repeat(len as usize);
                let _ = client.try_add_proposal(pick(user), &String::from_str(&env, &text));
            }
            FuzzAction::CastVote { user, proposal_id } => {
                let _ = client.try_cast_vote(pick(user), &proposal_id);
            }
            FuzzAction::StartProposalsRegistering => {
                let _ = client.try_start_proposals_registering(&admin);
            }
            FuzzAction::EndProposalsRegistering => {
                let _ = client.try_end_proposals_registering(&admin);
            }
            FuzzAction::StartVotingSession => {
                let _ = client.try_start_voting_session(&admin);
            }
            FuzzAction::EndVotingSession => {
                let _ = client.try_end_voting_session(&admin);
            }
            FuzzAction::TallyVotes => {
                let _ = client.try_tally_votes(&admin);
            }
            FuzzAction::AdvanceAs { user } => {
                let result = client.try_start_proposals_registering(pick(user));
                assert!(result.is_err(), "INVARIANT VIOLATION: non-admin advanced the workflow");
            }
        }

        // ── Post-action invariant checks ──
        let status = client.get_workflow_status();
        assert!(
            status as u32 == last_status as u32 || status as u32 == last_status as u32 + 1,
            "INVARIANT VIOLATION: status moved {:?} -> {:?}",
            last_status,
            status
        );
        last_status = status;

        let (counts, ballots) = env.as_contract(&contract_id, || {
            let counts: Vec<u32> = proposal::vote_counts(&env).collect();
            let ballots = users
                .iter()
                .filter_map(|u| voter::load(&env, u))
                .filter(|v| v.has_voted)
                .map(|v| v.voted_proposal_id)
                .collect::<Vec<u32>>();
            (counts, ballots)
        });

        let total: u32 = counts.iter().sum();
        assert_eq!(
            total as usize,
            ballots.len(),
            "INVARIANT VIOLATION: vote counts disagree with ballots"
        );
        for id in &ballots {
            assert!(
                (*id as usize) < counts.len(),
                "INVARIANT VIOLATION: ballot for missing proposal {}",
                id
            );
        }
        if status < WorkflowStatus::VotingSessionStarted {
            assert_eq!(total, 0, "INVARIANT VIOLATION: votes before voting opened");
        }

        let winner = client.winning_proposal_id();
        let expected = if status == WorkflowStatus::VotesTallied {
            compute_winner(counts.iter().copied())
        } else {
            0
        };
        assert_eq!(winner, expected, "INVARIANT VIOLATION: wrong winner");
    }
});
