//! Voter registry: one record per registered address.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::workflow::{self, WorkflowStatus};
use crate::VotingError;

const VOTER: Symbol = symbol_short!("VOTER");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Registration and ballot state of a single participant.
///
/// The default value describes an address that was never registered.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Voter {
    pub is_registered: bool,
    pub has_voted: bool,
    /// Meaningful only once `has_voted` is set; never changes afterwards.
    pub voted_proposal_id: u32,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

fn voter_key(voter: &Address) -> (Symbol, Address) {
    (VOTER, voter.clone())
}

pub fn load(env: &Env, voter: &Address) -> Option<Voter> {
    env.storage().persistent().get(&voter_key(voter))
}

pub(crate) fn store(env: &Env, voter: &Address, record: &Voter) {
    let key = voter_key(voter);
    env.storage().persistent().set(&key, record);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn is_registered(env: &Env, voter: &Address) -> bool {
    load(env, voter).map(|v| v.is_registered).unwrap_or(false)
}

// ── Registry operations ──────────────────────────────────────────────────────

/// Add `voter` to the registry. Authorisation is checked by the caller.
pub(crate) fn register(env: &Env, voter: &Address) -> Result<(), VotingError> {
    workflow::require(
        env,
        WorkflowStatus::RegisteringVoters,
        "Voters registration is not open yet",
    )?;
    if is_registered(env, voter) {
        return Err(VotingError::AlreadyRegistered);
    }

    let record = Voter {
        is_registered: true,
        has_voted: false,
        voted_proposal_id: 0,
    };
    store(env, voter, &record);
    Ok(())
}

/// Loads the record of a registered voter or fails with `NotAVoter`.
pub(crate) fn require_registered(env: &Env, voter: &Address) -> Result<Voter, VotingError> {
    load(env, voter)
        .filter(|v| v.is_registered)
        .ok_or(VotingError::NotAVoter)
}
