//! Stand-in phase oracle for tests and fuzzing.

use soroban_sdk::{contract, contractimpl, symbol_short, Env, Symbol};

const RESTRICTED: Symbol = symbol_short!("RESTRICT");
const START_IDX: Symbol = symbol_short!("START_IDX");

/// Phase oracle whose reveal flag and starting index are set by hand.
#[contract]
pub struct MockPhaseOracle;

#[contractimpl]
impl MockPhaseOracle {
    pub fn set_restricted(env: Env, restricted: bool) {
        env.storage().instance().set(&RESTRICTED, &restricted);
    }

    pub fn set_starting_index(env: Env, index: u64) {
        env.storage().instance().set(&START_IDX, &index);
    }

    pub fn in_active_reveal(env: Env) -> bool {
        env.storage().instance().get(&RESTRICTED).unwrap_or(false)
    }

    pub fn starting_index_for_staker(env: Env) -> u64 {
        env.storage().instance().get(&START_IDX).unwrap_or(0)
    }
}
