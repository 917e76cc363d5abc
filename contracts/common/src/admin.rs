//! Single-slot administrator authority with a two-step handoff.
//!
//! The administrator is stored once at bootstrap and can only change hands
//! through `propose` followed by `accept` from the proposed identity. There is
//! no way to clear the slot.
//!
//! Callers are responsible for `require_auth` on the acting address; this
//! module only compares identities, keeping it reusable across contracts.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::CommonError;

const ADMIN: Symbol = symbol_short!("ADMIN");
const PENDING_ADMIN: Symbol = symbol_short!("PEND_ADM");

// ~30 days at 5s/ledger
const TTL_THRESHOLD: u32 = 518_400;
const TTL_EXTEND_TO: u32 = 1_036_800;

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Store the initial administrator.
///
/// Fails with `AlreadyInitialized` when a previous call already filled the slot.
pub fn init_admin(env: &Env, admin: &Address) -> Result<(), CommonError> {
    if has_admin(env) {
        return Err(CommonError::AlreadyInitialized);
    }
    env.storage().instance().set(&ADMIN, admin);
    extend_instance_ttl(env);
    Ok(())
}

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&ADMIN)
}

pub fn get_admin(env: &Env) -> Result<Address, CommonError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(CommonError::NotInitialized)
}

pub fn get_pending_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_ADMIN)
}

/// Returns `AccessDenied` unless `caller` is the stored administrator.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), CommonError> {
    let admin = get_admin(env)?;
    if *caller != admin {
        return Err(CommonError::AccessDenied);
    }
    Ok(())
}

/// First half of the handoff: the current administrator nominates a successor.
///
/// A later call replaces any earlier nomination.
pub fn propose_admin(env: &Env, caller: &Address, new_admin: &Address) -> Result<(), CommonError> {
    require_admin(env, caller)?;
    env.storage().instance().set(&PENDING_ADMIN, new_admin);
    extend_instance_ttl(env);
    Ok(())
}

/// Second half of the handoff: the nominee takes over the slot.
///
/// Returns the previous administrator.
pub fn accept_admin(env: &Env, caller: &Address) -> Result<Address, CommonError> {
    let previous = get_admin(env)?;
    let pending = get_pending_admin(env).ok_or(CommonError::NoPendingTransfer)?;
    if *caller != pending {
        return Err(CommonError::AccessDenied);
    }
    env.storage().instance().set(&ADMIN, &pending);
    env.storage().instance().remove(&PENDING_ADMIN);
    extend_instance_ttl(env);
    Ok(previous)
}
