use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ledger::{GlobalState, VoterStake};
use crate::ContractError;

// ── Storage keys ─────────────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const TOKEN: Symbol = symbol_short!("TOKEN");
const PHASE_ORACLE: Symbol = symbol_short!("PH_ORCL");
const GLOBAL: Symbol = symbol_short!("GLOBAL");

// Per-voter persistent storage uses tuple keys:  (prefix, address)
const VOTER: Symbol = symbol_short!("VOTER");
const DELEGATOR: Symbol = symbol_short!("DLGTOR");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

fn voter_key(voter: &Address) -> (Symbol, Address) {
    (VOTER, voter.clone())
}

fn delegator_key(delegate: &Address) -> (Symbol, Address) {
    (DELEGATOR, delegate.clone())
}

fn extend_persistent(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Configuration ────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&INITIALIZED)
}

pub fn set_initialized(env: &Env) {
    env.storage().instance().set(&INITIALIZED, &true);
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&TOKEN, token);
}

pub fn get_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&TOKEN)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_phase_oracle(env: &Env, oracle: &Address) {
    env.storage().instance().set(&PHASE_ORACLE, oracle);
}

pub fn get_phase_oracle(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&PHASE_ORACLE)
        .ok_or(ContractError::NotInitialized)
}

// ── Ledger state ─────────────────────────────────────────────────────────────

pub fn load_global(env: &Env) -> Result<GlobalState, ContractError> {
    env.storage()
        .instance()
        .get(&GLOBAL)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_global(env: &Env, global: &GlobalState) {
    env.storage().instance().set(&GLOBAL, global);
}

/// Voter record, or a fresh default one for an address never seen before.
pub fn load_voter(env: &Env, voter: &Address) -> VoterStake {
    env.storage()
        .persistent()
        .get(&voter_key(voter))
        .unwrap_or_default()
}

pub fn save_voter(env: &Env, voter: &Address, record: &VoterStake) {
    let key = voter_key(voter);
    env.storage().persistent().set(&key, record);
    extend_persistent(env, &key);
}

// ── Delegation ───────────────────────────────────────────────────────────────

/// Voter that `delegate` has declared it votes for, if any.
pub fn get_delegator(env: &Env, delegate: &Address) -> Option<Address> {
    env.storage().persistent().get(&delegator_key(delegate))
}

pub fn set_delegator(env: &Env, delegate: &Address, voter: &Option<Address>) {
    let key = delegator_key(delegate);
    match voter {
        Some(voter) => {
            env.storage().persistent().set(&key, voter);
            extend_persistent(env, &key);
        }
        None => env.storage().persistent().remove(&key),
    }
}
