//! Election lifecycle.
//!
//! ```text
//! RegisteringVoters ──► ProposalsRegistrationStarted ──► ProposalsRegistrationEnded
//!                                                                 │
//!        VotesTallied ◄── VotingSessionEnded ◄── VotingSessionStarted
//! ```
//!
//! The status only ever moves one step forward. There is no setter: the only
//! way to change it is [`advance`] with a [`Transition`], and each transition
//! has exactly one source state.

use soroban_sdk::{contracttype, log, symbol_short, Env, String, Symbol};

use crate::VotingError;

const STATUS: Symbol = symbol_short!("WF_STAT");

const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

/// Current phase of the election. Discriminants are part of the event format.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum WorkflowStatus {
    RegisteringVoters = 0,
    ProposalsRegistrationStarted = 1,
    ProposalsRegistrationEnded = 2,
    VotingSessionStarted = 3,
    VotingSessionEnded = 4,
    VotesTallied = 5,
}

/// An administrator-driven step of the lifecycle.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transition {
    StartProposalsRegistering,
    EndProposalsRegistering,
    StartVotingSession,
    EndVotingSession,
    TallyVotes,
}

impl Transition {
    /// Every transition, in lifecycle order.
    pub const ALL: [Transition; 5] = [
        Transition::StartProposalsRegistering,
        Transition::EndProposalsRegistering,
        Transition::StartVotingSession,
        Transition::EndVotingSession,
        Transition::TallyVotes,
    ];

    /// The only status this transition may start from.
    pub fn source(&self) -> WorkflowStatus {
        match self {
            Transition::StartProposalsRegistering => WorkflowStatus::RegisteringVoters,
            Transition::EndProposalsRegistering => WorkflowStatus::ProposalsRegistrationStarted,
            Transition::StartVotingSession => WorkflowStatus::ProposalsRegistrationEnded,
            Transition::EndVotingSession => WorkflowStatus::VotingSessionStarted,
            Transition::TallyVotes => WorkflowStatus::VotingSessionEnded,
        }
    }

    pub fn target(&self) -> WorkflowStatus {
        match self {
            Transition::StartProposalsRegistering => WorkflowStatus::ProposalsRegistrationStarted,
            Transition::EndProposalsRegistering => WorkflowStatus::ProposalsRegistrationEnded,
            Transition::StartVotingSession => WorkflowStatus::VotingSessionStarted,
            Transition::EndVotingSession => WorkflowStatus::VotingSessionEnded,
            Transition::TallyVotes => WorkflowStatus::VotesTallied,
        }
    }

    /// Human-readable reason logged when the transition is attempted from
    /// the wrong status.
    pub fn rejection(&self) -> &'static str {
        match self {
            Transition::StartProposalsRegistering => "Registering proposals cant be started now",
            Transition::EndProposalsRegistering => "Registering proposals havent started yet",
            Transition::StartVotingSession => "Registering proposals phase is not finished",
            Transition::EndVotingSession => "Voting session havent started yet",
            Transition::TallyVotes => "Current status is not voting session ended",
        }
    }
}

// ── Storage helpers ──────────────────────────────────────────────────────────

pub fn current(env: &Env) -> WorkflowStatus {
    env.storage()
        .instance()
        .get(&STATUS)
        .unwrap_or(WorkflowStatus::RegisteringVoters)
}

fn store(env: &Env, status: WorkflowStatus) {
    env.storage().instance().set(&STATUS, &status);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// `WrongPhase` unless the election is in `expected`.
///
/// `reason` is written to the diagnostic log on rejection.
pub(crate) fn require(
    env: &Env,
    expected: WorkflowStatus,
    reason: &'static str,
) -> Result<(), VotingError> {
    if current(env) != expected {
        log!(env, "wrong phase", String::from_str(env, reason));
        return Err(VotingError::WrongPhase);
    }
    Ok(())
}

/// Apply `transition`, returning `(previous, new)`.
pub(crate) fn advance(
    env: &Env,
    transition: Transition,
) -> Result<(WorkflowStatus, WorkflowStatus), VotingError> {
    let previous = current(env);
    require(env, transition.source(), transition.rejection())?;
    let next = transition.target();
    store(env, next);
    Ok((previous, next))
}
