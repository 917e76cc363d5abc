#![no_std]

//! # Voting
//!
//! A single-organizer election contract:
//!
//! - **Administrator**: one privileged address registers voters and drives
//!   the lifecycle; it can be handed over with a two-step propose/accept.
//! - **Lifecycle**: RegisteringVoters → ProposalsRegistrationStarted →
//!   ProposalsRegistrationEnded → VotingSessionStarted → VotingSessionEnded →
//!   VotesTallied, strictly forward.
//! - **Proposals**: any registered voter may submit while registration is
//!   open; index 0 is a sentinel.
//! - **Ballots**: one vote per registered voter; the tally picks the most
//!   voted proposal, ties going to the earliest index.
//!
//! Every entry point validates all of its preconditions before writing, and a
//! failed invocation is rolled back by the host, so errors never leave
//! partial state behind.

pub mod events;
pub mod proposal;
pub mod tally;
pub mod voter;
pub mod workflow;

use common::{admin, CommonError};
use soroban_sdk::{contract, contracterror, contractimpl, log, Address, Env, String};

pub use proposal::Proposal;
pub use voter::Voter;
pub use workflow::{Transition, WorkflowStatus};

// ── Error codes ───────────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum VotingError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller is not the administrator (or not the pending one on accept).
    Unauthorized = 3,
    NotAVoter = 4,
    /// Operation not permitted in the current workflow status.
    WrongPhase = 5,
    AlreadyRegistered = 6,
    AlreadyVoted = 7,
    EmptyProposal = 8,
    IndexOutOfRange = 9,
    NoPendingAdmin = 10,
}

impl From<CommonError> for VotingError {
    fn from(err: CommonError) -> Self {
        match err {
            CommonError::NotInitialized => VotingError::NotInitialized,
            CommonError::AlreadyInitialized => VotingError::AlreadyInitialized,
            CommonError::AccessDenied => VotingError::Unauthorized,
            CommonError::NoPendingTransfer => VotingError::NoPendingAdmin,
        }
    }
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct VotingContract;

#[contractimpl]
impl VotingContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Bootstrap the election with its administrator.
    pub fn initialize(env: Env, admin: Address) -> Result<(), VotingError> {
        admin.require_auth();
        admin::init_admin(&env, &admin)?;
        Ok(())
    }

    // ── Voter registry ────────────────────────────────────────────────────────

    pub fn register_voter(env: Env, caller: Address, voter: Address) -> Result<(), VotingError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        voter::register(&env, &voter)?;
        events::publish_voter_registered(&env, &voter);

        Ok(())
    }

    /// Read any address's voter record. Restricted to registered voters.
    ///
    /// An address that was never registered reads as the default record.
    pub fn get_voter(env: Env, caller: Address, voter: Address) -> Result<Voter, VotingError> {
        caller.require_auth();
        voter::require_registered(&env, &caller)?;
        Ok(voter::load(&env, &voter).unwrap_or_default())
    }

    // ── Proposal registry ─────────────────────────────────────────────────────

    /// Submit a proposal and return its index (1, 2, …).
    pub fn add_proposal(env: Env, voter: Address, description: String) -> Result<u32, VotingError> {
        voter.require_auth();
        voter::require_registered(&env, &voter)?;

        let index = proposal::append(&env, description)?;
        events::publish_proposal_registered(&env, index);

        Ok(index)
    }

    pub fn get_one_proposal(env: Env, caller: Address, index: u32) -> Result<Proposal, VotingError> {
        caller.require_auth();
        voter::require_registered(&env, &caller)?;
        proposal::get(&env, index)
    }

    /// Number of registry entries, sentinel included.
    pub fn proposal_count(env: Env) -> u32 {
        proposal::count(&env)
    }

    // ── Voting ────────────────────────────────────────────────────────────────

    pub fn cast_vote(env: Env, voter: Address, proposal_id: u32) -> Result<(), VotingError> {
        voter.require_auth();
        let ballot = voter::require_registered(&env, &voter)?;

        tally::cast_vote(&env, &voter, ballot, proposal_id)?;
        events::publish_voted(&env, &voter, proposal_id);

        Ok(())
    }

    /// Winning index; 0 until the votes are tallied.
    pub fn winning_proposal_id(env: Env) -> u32 {
        tally::winning_proposal_id(&env)
    }

    // ── Workflow transitions ──────────────────────────────────────────────────

    /// Open proposal registration and seed the sentinel proposal.
    pub fn start_proposals_registering(env: Env, caller: Address) -> Result<(), VotingError> {
        Self::advance(&env, &caller, Transition::StartProposalsRegistering)?;
        proposal::open_registry(&env);
        Ok(())
    }

    pub fn end_proposals_registering(env: Env, caller: Address) -> Result<(), VotingError> {
        Self::advance(&env, &caller, Transition::EndProposalsRegistering)
    }

    pub fn start_voting_session(env: Env, caller: Address) -> Result<(), VotingError> {
        Self::advance(&env, &caller, Transition::StartVotingSession)
    }

    pub fn end_voting_session(env: Env, caller: Address) -> Result<(), VotingError> {
        Self::advance(&env, &caller, Transition::EndVotingSession)
    }

    /// Close the election and return the winning proposal index.
    pub fn tally_votes(env: Env, caller: Address) -> Result<u32, VotingError> {
        Self::advance(&env, &caller, Transition::TallyVotes)?;
        Ok(tally::record_winner(&env))
    }

    pub fn get_workflow_status(env: Env) -> WorkflowStatus {
        workflow::current(&env)
    }

    // ── Admin ─────────────────────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, VotingError> {
        Ok(admin::get_admin(&env)?)
    }

    pub fn get_pending_admin(env: Env) -> Option<Address> {
        admin::get_pending_admin(&env)
    }

    /// Nominate a successor. Takes effect only once they call `accept_admin`.
    pub fn propose_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), VotingError> {
        caller.require_auth();

        admin::propose_admin(&env, &caller, &new_admin)
            .map_err(|err| Self::denied(&env, &caller, err))?;
        events::publish_admin_proposed(&env, &caller, &new_admin);

        Ok(())
    }

    pub fn accept_admin(env: Env, caller: Address) -> Result<(), VotingError> {
        caller.require_auth();

        let previous =
            admin::accept_admin(&env, &caller).map_err(|err| Self::denied(&env, &caller, err))?;
        events::publish_admin_transferred(&env, &previous, &caller);

        Ok(())
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn require_admin(env: &Env, caller: &Address) -> Result<(), VotingError> {
        admin::require_admin(env, caller).map_err(|err| Self::denied(env, caller, err))
    }

    /// Convert an admin-slot failure, logging the caller when it was refused.
    fn denied(env: &Env, caller: &Address, err: CommonError) -> VotingError {
        if err == CommonError::AccessDenied {
            log!(env, "unauthorized caller", caller.clone());
        }
        err.into()
    }

    fn advance(env: &Env, caller: &Address, transition: Transition) -> Result<(), VotingError> {
        caller.require_auth();
        Self::require_admin(env, caller)?;

        let (previous, next) = workflow::advance(env, transition)?;
        events::publish_workflow_status_changed(env, previous, next);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
