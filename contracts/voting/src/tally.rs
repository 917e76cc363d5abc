//! Ballot casting and winner selection.
//!
//! ## Winner rule
//! ```text
//! best = (index 0, 0 votes)
//! for each (index, votes) in registry order:
//!     if votes > best.votes: best = (index, votes)
//! ```
//! Only a strictly greater count replaces the running best, so a tie goes to
//! the earliest index. With no votes at all the sentinel (index 0) wins.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::proposal;
use crate::voter::{self, Voter};
use crate::workflow::{self, WorkflowStatus};
use crate::VotingError;

const WINNER: Symbol = symbol_short!("WINNER");

/// Index of the first proposal holding the maximum vote count.
pub fn compute_winner<I>(counts: I) -> u32
where
    I: IntoIterator<Item = u32>,
{
    let mut best_index = 0u32;
    let mut best_count = 0u32;
    for (index, votes) in (0u32..).zip(counts) {
        if votes > best_count {
            best_index = index;
            best_count = votes;
        }
    }
    best_index
}

/// Record `ballot` for an already-authenticated registered voter.
pub(crate) fn cast_vote(
    env: &Env,
    voter_addr: &Address,
    mut ballot: Voter,
    proposal_id: u32,
) -> Result<(), VotingError> {
    workflow::require(
        env,
        WorkflowStatus::VotingSessionStarted,
        "Voting session havent started yet",
    )?;
    if ballot.has_voted {
        return Err(VotingError::AlreadyVoted);
    }
    let mut target = proposal::get(env, proposal_id)?;

    target.vote_count = target.vote_count.saturating_add(1);
    ballot.has_voted = true;
    ballot.voted_proposal_id = proposal_id;

    proposal::store(env, proposal_id, &target);
    voter::store(env, voter_addr, &ballot);
    Ok(())
}

/// Compute and persist the winner over the frozen registry.
pub(crate) fn record_winner(env: &Env) -> u32 {
    let winner = compute_winner(proposal::vote_counts(env));
    env.storage().instance().set(&WINNER, &winner);
    winner
}

pub fn winning_proposal_id(env: &Env) -> u32 {
    env.storage().instance().get(&WINNER).unwrap_or(0u32)
}
