//! Append-only proposal registry.
//!
//! Index 0 is a sentinel seeded when proposal registration opens, so the
//! first voter-submitted proposal gets index 1. Entries are never removed or
//! reordered; only their vote count changes, and only while voting is open.

use soroban_sdk::{contracttype, symbol_short, Env, String, Symbol};

use crate::workflow::{self, WorkflowStatus};
use crate::VotingError;

// ── Storage key prefixes ─────────────────────────────────────────────────────

const PROPOSAL_CTR: Symbol = symbol_short!("PROP_CTR");
const PROPOSAL: Symbol = symbol_short!("PROP");

// TTL: ~60 days at 5s/ledger
const TTL_THRESHOLD: u32 = 1_036_800;
const TTL_EXTEND_TO: u32 = 2_073_600;

/// Description of the sentinel at index 0.
pub const GENESIS: &str = "GENESIS";

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u32,
}

// ── Storage helpers ──────────────────────────────────────────────────────────

/// Number of entries, sentinel included. Zero until registration opens.
pub fn count(env: &Env) -> u32 {
    env.storage().instance().get(&PROPOSAL_CTR).unwrap_or(0u32)
}

fn set_count(env: &Env, count: u32) {
    env.storage().instance().set(&PROPOSAL_CTR, &count);
}

fn proposal_key(index: u32) -> (Symbol, u32) {
    (PROPOSAL, index)
}

pub(crate) fn store(env: &Env, index: u32, proposal: &Proposal) {
    let key = proposal_key(index);
    env.storage().persistent().set(&key, proposal);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn load(env: &Env, index: u32) -> Option<Proposal> {
    env.storage().persistent().get(&proposal_key(index))
}

/// Bounds-checked read.
pub(crate) fn get(env: &Env, index: u32) -> Result<Proposal, VotingError> {
    if index >= count(env) {
        return Err(VotingError::IndexOutOfRange);
    }
    load(env, index).ok_or(VotingError::IndexOutOfRange)
}

// ── Registry operations ──────────────────────────────────────────────────────

/// Seed the sentinel entry. Called once, by the transition that opens
/// proposal registration.
pub(crate) fn open_registry(env: &Env) {
    let sentinel = Proposal {
        description: String::from_str(env, GENESIS),
        vote_count: 0,
    };
    store(env, 0, &sentinel);
    set_count(env, 1);
}

/// Append a proposal and return its index. Voter checks happen in the caller.
pub(crate) fn append(env: &Env, description: String) -> Result<u32, VotingError> {
    workflow::require(
        env,
        WorkflowStatus::ProposalsRegistrationStarted,
        "Proposals are not allowed yet",
    )?;
    if description.len() == 0 {
        return Err(VotingError::EmptyProposal);
    }

    let index = count(env);
    let proposal = Proposal {
        description,
        vote_count: 0,
    };
    store(env, index, &proposal);
    set_count(env, index.saturating_add(1));
    Ok(index)
}

/// Vote counts in index order.
pub fn vote_counts(env: &Env) -> impl Iterator<Item = u32> + '_ {
    (0..count(env)).map(move |index| load(env, index).map(|p| p.vote_count).unwrap_or(0))
}
