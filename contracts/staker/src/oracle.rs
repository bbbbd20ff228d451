//! Phase oracle collaborator.
//!
//! The voting-round contract owns the notion of an "active reveal". The
//! ledger only asks whether stake changes must be deferred right now, and
//! where a re-entering voter's bookkeeping should start.

use soroban_sdk::{contractclient, Env};

use crate::{storage, ContractError};

/// Interface the configured phase oracle contract must expose.
#[contractclient(name = "PhaseOracleClient")]
pub trait PhaseOracle {
    /// `true` while stake changes must be deferred.
    fn in_active_reveal(env: Env) -> bool;

    /// Index a voter entering with zero stake should start processing from.
    fn starting_index_for_staker(env: Env) -> u64;
}

fn client(env: &Env) -> Result<PhaseOracleClient<'_>, ContractError> {
    let address = storage::get_phase_oracle(env)?;
    Ok(PhaseOracleClient::new(env, &address))
}

pub fn in_active_reveal(env: &Env) -> Result<bool, ContractError> {
    Ok(client(env)?.in_active_reveal())
}

pub fn starting_index_for_staker(env: &Env) -> Result<u64, ContractError> {
    Ok(client(env)?.starting_index_for_staker())
}
