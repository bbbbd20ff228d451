//! Owner-gated configuration.
//!
//! The ledger arithmetic never looks at who is calling; contract entry
//! points that change configuration check the caller here first. Ownership
//! moves in two steps: the current owner proposes, the new owner accepts.

use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ContractError;

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&OWNER)
        .ok_or(ContractError::NotInitialized)
}

/// Guard: error unless `caller` is the stored owner.
///
/// Callers are expected to have run `require_auth` on `caller` already.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    if *caller != get_owner(env)? {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

pub fn set_pending_owner(env: &Env, proposed: &Address) {
    env.storage().instance().set(&PENDING_OWNER, proposed);
}

pub fn clear_pending_owner(env: &Env) {
    env.storage().instance().remove(&PENDING_OWNER);
}
