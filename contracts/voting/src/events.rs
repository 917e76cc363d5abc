//! Structured event publishing for the voting contract.
#![allow(deprecated)] // events().publish migration to #[contractevent] tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::workflow::WorkflowStatus;

pub fn publish_voter_registered(env: &Env, voter: &Address) {
    env.events()
        .publish((symbol_short!("VOTER_REG"),), voter.clone());
}

pub fn publish_proposal_registered(env: &Env, index: u32) {
    env.events().publish((symbol_short!("PROP_REG"),), index);
}

pub fn publish_voted(env: &Env, voter: &Address, proposal_id: u32) {
    env.events()
        .publish((symbol_short!("VOTED"),), (voter.clone(), proposal_id));
}

pub fn publish_workflow_status_changed(
    env: &Env,
    previous: WorkflowStatus,
    next: WorkflowStatus,
) {
    env.events()
        .publish((symbol_short!("WF_STATUS"),), (previous, next));
}

pub fn publish_admin_proposed(env: &Env, current: &Address, proposed: &Address) {
    env.events().publish(
        (symbol_short!("ADM_PROP"),),
        (current.clone(), proposed.clone()),
    );
}

pub fn publish_admin_transferred(env: &Env, previous: &Address, new_admin: &Address) {
    env.events().publish(
        (symbol_short!("ADM_XFER"),),
        (previous.clone(), new_admin.clone()),
    );
}
