//! # State Invariant Definitions & Verification
//!
//! Defines invariants that must hold across all election state transitions.
//! Invariants are checked after every action during state exploration and
//! can be composed via the `InvariantSet` builder.
//!
//! ## Complexity
//!
//! Each check is O(p + v) where p = proposals and v = tracked voters, with
//! `BallotsMatchTally` at O(p·v). Sets stay small in practice.

extern crate std;

use std::string::String;
use std::vec::Vec;

use voting::{proposal::GENESIS, tally::compute_winner, WorkflowStatus};

use super::{to_std_string, ElectionSnapshot};

// ── Invariant Trait ──────────────────────────────────────────────────────────

/// A named invariant that can be verified against a state snapshot.
pub trait Invariant {
    /// Human-readable name for error messages.
    fn name(&self) -> &str;

    /// Check the invariant. Returns `Ok(())` on success, `Err(description)` on violation.
    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String>;
}

// ── Built-in Invariants ──────────────────────────────────────────────────────

/// **Ballot Accounting**: each proposal's `vote_count` equals the number of
/// tracked voters whose ballot points at it.
///
/// Only sound when every registered voter is tracked, which the explorer
/// guarantees by drawing all voters from its user pool.
pub struct BallotsMatchTally;

impl Invariant for BallotsMatchTally {
    fn name(&self) -> &str {
        "vote_count == ballots pointing at proposal"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        for (index, proposal) in snapshot.proposals.iter().enumerate() {
            let ballots = snapshot
                .voters
                .iter()
                .filter(|(_, v)| v.has_voted && v.voted_proposal_id as usize == index)
                .count() as u32;
            if proposal.vote_count != ballots {
                return Err(std::format!(
                    "Proposal {} has vote_count {} but {} ballots",
                    index,
                    proposal.vote_count,
                    ballots
                ));
            }
        }
        if snapshot.total_votes() != snapshot.ballots_cast() {
            return Err(std::format!(
                "Total votes ({}) != ballots cast ({})",
                snapshot.total_votes(),
                snapshot.ballots_cast()
            ));
        }
        Ok(())
    }
}

/// **Only Voters Vote**: `has_voted` implies `is_registered`.
pub struct VotedImpliesRegistered;

impl Invariant for VotedImpliesRegistered {
    fn name(&self) -> &str {
        "has_voted => is_registered"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        for (addr, voter) in &snapshot.voters {
            if voter.has_voted && !voter.is_registered {
                return Err(std::format!("Unregistered {:?} has voted", addr));
            }
        }
        Ok(())
    }
}

/// **Ballot In Range**: a recorded ballot names an existing proposal.
pub struct VotedProposalInRange;

impl Invariant for VotedProposalInRange {
    fn name(&self) -> &str {
        "voted_proposal_id < proposal count"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        let count = snapshot.proposals.len();
        for (addr, voter) in &snapshot.voters {
            if voter.has_voted && voter.voted_proposal_id as usize >= count {
                return Err(std::format!(
                    "Voter {:?} voted for {} but only {} proposals exist",
                    addr,
                    voter.voted_proposal_id,
                    count
                ));
            }
        }
        Ok(())
    }
}

/// **Clean Records**: a voter that has not voted carries no proposal id.
pub struct UnvotedVotersClean;

impl Invariant for UnvotedVotersClean {
    fn name(&self) -> &str {
        "!has_voted => voted_proposal_id == 0"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        for (addr, voter) in &snapshot.voters {
            if !voter.has_voted && voter.voted_proposal_id != 0 {
                return Err(std::format!(
                    "Voter {:?} has not voted but records proposal {}",
                    addr,
                    voter.voted_proposal_id
                ));
            }
        }
        Ok(())
    }
}

/// **Sentinel**: the registry is empty before proposal registration opens and
/// starts with the `GENESIS` entry afterwards.
pub struct SentinelPresent;

impl Invariant for SentinelPresent {
    fn name(&self) -> &str {
        "proposal 0 is the GENESIS sentinel once registration opened"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        if snapshot.status == WorkflowStatus::RegisteringVoters {
            if !snapshot.proposals.is_empty() {
                return Err(std::format!(
                    "{} proposals exist before registration opened",
                    snapshot.proposals.len()
                ));
            }
            return Ok(());
        }

        match snapshot.proposals.first() {
            None => Err("Registry is empty after registration opened".into()),
            Some(first) => {
                let description = to_std_string(&first.description);
                if description != GENESIS {
                    return Err(std::format!(
                        "Index 0 is {:?}, expected the sentinel",
                        description
                    ));
                }
                Ok(())
            }
        }
    }
}

/// **No Early Votes**: every count is zero before the voting session opens.
pub struct NoVotesBeforeVoting;

impl Invariant for NoVotesBeforeVoting {
    fn name(&self) -> &str {
        "no votes before VotingSessionStarted"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        if snapshot.status >= WorkflowStatus::VotingSessionStarted {
            return Ok(());
        }
        if snapshot.total_votes() != 0 || snapshot.ballots_cast() != 0 {
            return Err(std::format!(
                "{} votes recorded in status {:?}",
                snapshot.total_votes(),
                snapshot.status
            ));
        }
        Ok(())
    }
}

/// **Winner Rule**: once tallied, the winner is the first index holding the
/// maximum count; before that it reads as 0.
pub struct WinnerIsFirstMaximum;

impl Invariant for WinnerIsFirstMaximum {
    fn name(&self) -> &str {
        "winner == first index of max vote_count"
    }

    fn check(&self, snapshot: &ElectionSnapshot) -> Result<(), String> {
        let expected = if snapshot.status == WorkflowStatus::VotesTallied {
            compute_winner(snapshot.vote_counts())
        } else {
            0
        };
        if snapshot.winner != expected {
            return Err(std::format!(
                "Winner is {} in status {:?}, expected {} for counts {:?}",
                snapshot.winner,
                snapshot.status,
                expected,
                snapshot.vote_counts()
            ));
        }
        Ok(())
    }
}

// ── Invariant Set ────────────────────────────────────────────────────────────

/// A composable set of invariants that are checked together.
///
/// Provides a builder API for assembling the invariant suite to verify.
pub struct InvariantSet {
    invariants: Vec<Box<dyn Invariant>>,
}

impl InvariantSet {
    /// Create an empty invariant set.
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    /// Create a set pre-loaded with all built-in election invariants.
    pub fn election_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(BallotsMatchTally));
        set.add(Box::new(VotedImpliesRegistered));
        set.add(Box::new(VotedProposalInRange));
        set.add(Box::new(UnvotedVotersClean));
        set.add(Box::new(SentinelPresent));
        set.add(Box::new(NoVotesBeforeVoting));
        set.add(Box::new(WinnerIsFirstMaximum));
        set
    }

    /// Add a custom invariant.
    pub fn add(&mut self, invariant: Box<dyn Invariant>) {
        self.invariants.push(invariant);
    }

    /// Verify all invariants against a snapshot.
    /// Returns a list of (invariant_name, violation_message) for all failures.
    pub fn check_all(&self, snapshot: &ElectionSnapshot) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for inv in &self.invariants {
            if let Err(msg) = inv.check(snapshot) {
                violations.push((inv.name().to_string(), msg));
            }
        }
        violations
    }

    /// Assert all invariants hold, panicking with details on violation.
    pub fn assert_all(&self, snapshot: &ElectionSnapshot) {
        let violations = self.check_all(snapshot);
        if !violations.is_empty() {
            let mut report = String::from("Invariant violations detected:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  ✗ [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }

    /// Number of invariants in the set.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}

impl Default for InvariantSet {
    fn default() -> Self {
        Self::new()
    }
}

// ── Transition Invariants ────────────────────────────────────────────────────

/// Invariants that verify the relationship between two consecutive snapshots
/// (before and after an action).
pub trait TransitionInvariant {
    fn name(&self) -> &str;
    fn check(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) -> Result<(), String>;
}

/// **Forward Only**: the status never decreases and moves at most one step.
pub struct StatusMonotonic;

impl TransitionInvariant for StatusMonotonic {
    fn name(&self) -> &str {
        "status advances by at most one step"
    }

    fn check(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) -> Result<(), String> {
        let (from, to) = (before.status as u32, after.status as u32);
        if to < from || to > from + 1 {
            return Err(std::format!(
                "Status moved {:?} -> {:?}",
                before.status,
                after.status
            ));
        }
        Ok(())
    }
}

/// **Append Only**: existing descriptions never change, and the registry only
/// grows while registration is open (or by the sentinel when it opens).
pub struct ProposalsFrozen;

impl TransitionInvariant for ProposalsFrozen {
    fn name(&self) -> &str {
        "registry is append-only and frozen outside registration"
    }

    fn check(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) -> Result<(), String> {
        if after.proposals.len() < before.proposals.len() {
            return Err(std::format!(
                "Registry shrank: {} -> {}",
                before.proposals.len(),
                after.proposals.len()
            ));
        }
        for (index, (old, new)) in before.proposals.iter().zip(&after.proposals).enumerate() {
            if old.description != new.description {
                return Err(std::format!("Description of proposal {} changed", index));
            }
        }

        let grew = after.proposals.len() - before.proposals.len();
        if grew == 0 {
            return Ok(());
        }
        let opening = before.status == WorkflowStatus::RegisteringVoters
            && after.status == WorkflowStatus::ProposalsRegistrationStarted
            && grew == 1;
        let submitting = before.status == WorkflowStatus::ProposalsRegistrationStarted
            && after.status == WorkflowStatus::ProposalsRegistrationStarted
            && grew == 1;
        if !(opening || submitting) {
            return Err(std::format!(
                "Registry grew by {} during {:?} -> {:?}",
                grew,
                before.status,
                after.status
            ));
        }
        Ok(())
    }
}

/// **Single Vote Steps**: counts never decrease, and one action adds at most
/// one vote in total.
pub struct VotesMonotonic;

impl TransitionInvariant for VotesMonotonic {
    fn name(&self) -> &str {
        "vote counts are non-decreasing, +1 at most per action"
    }

    fn check(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) -> Result<(), String> {
        for (index, (old, new)) in before.proposals.iter().zip(&after.proposals).enumerate() {
            if new.vote_count < old.vote_count {
                return Err(std::format!(
                    "Votes for proposal {} decreased: {} -> {}",
                    index,
                    old.vote_count,
                    new.vote_count
                ));
            }
        }
        let added = after.total_votes().saturating_sub(before.total_votes());
        if added > 1 {
            return Err(std::format!("{} votes added by a single action", added));
        }
        Ok(())
    }
}

/// **Final Ballots**: a cast ballot is never altered, and registrations are
/// never revoked.
pub struct BallotsImmutable;

impl TransitionInvariant for BallotsImmutable {
    fn name(&self) -> &str {
        "cast ballots and registrations are permanent"
    }

    fn check(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) -> Result<(), String> {
        for (addr, old) in &before.voters {
            let Some(new) = after.voter(addr) else {
                continue;
            };
            if old.is_registered && !new.is_registered {
                return Err(std::format!("Registration of {:?} was revoked", addr));
            }
            if old.has_voted && old != new {
                return Err(std::format!(
                    "Ballot of {:?} changed: {:?} -> {:?}",
                    addr,
                    old,
                    new
                ));
            }
        }
        Ok(())
    }
}

/// Composite checker for transition invariants.
pub struct TransitionInvariantSet {
    invariants: Vec<Box<dyn TransitionInvariant>>,
}

impl TransitionInvariantSet {
    pub fn new() -> Self {
        Self {
            invariants: Vec::new(),
        }
    }

    /// Create a set pre-loaded with all built-in transition invariants.
    pub fn election_defaults() -> Self {
        let mut set = Self::new();
        set.add(Box::new(StatusMonotonic));
        set.add(Box::new(ProposalsFrozen));
        set.add(Box::new(VotesMonotonic));
        set.add(Box::new(BallotsImmutable));
        set
    }

    pub fn add(&mut self, invariant: Box<dyn TransitionInvariant>) {
        self.invariants.push(invariant);
    }

    pub fn check_all(
        &self,
        before: &ElectionSnapshot,
        after: &ElectionSnapshot,
    ) -> Vec<(String, String)> {
        let mut violations = Vec::new();
        for inv in &self.invariants {
            if let Err(msg) = inv.check(before, after) {
                violations.push((inv.name().to_string(), msg));
            }
        }
        violations
    }

    pub fn assert_all(&self, before: &ElectionSnapshot, after: &ElectionSnapshot) {
        let violations = self.check_all(before, after);
        if !violations.is_empty() {
            let mut report = String::from("Transition invariant violations:\n");
            for (name, msg) in &violations {
                report.push_str(&std::format!("  ✗ [{}]: {}\n", name, msg));
            }
            panic!("{}", report);
        }
    }
}

impl Default for TransitionInvariantSet {
    fn default() -> Self {
        Self::new()
    }
}
