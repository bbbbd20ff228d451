extern crate std;

use soroban_sdk::{testutils::Address as _, Address, Env};

use crate::testutils::MockPhaseOracle;
use crate::{ContractError, StakerContract, StakerContractClient};

// ── Test helpers ─────────────────────────────────────────────────────────────

fn setup() -> (Env, StakerContractClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();

    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let oracle = env.register(MockPhaseOracle, ());

    let contract_id = env.register(StakerContract, ());
    let client = StakerContractClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    client.initialize(&owner, &token, &oracle, &10, &86_400);

    (env, client, owner)
}

// ── Two-step ownership transfer ──────────────────────────────────────────────

#[test]
fn test_propose_and_accept_owner() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    assert_eq!(client.get_pending_owner(), Some(next.clone()));
    assert_eq!(client.get_owner(), owner);

    client.accept_owner(&next);
    assert_eq!(client.get_owner(), next);
    assert_eq!(client.get_pending_owner(), None);
}

#[test]
fn test_new_owner_controls_configuration() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    client.accept_owner(&next);

    client.set_emission_rate(&next, &42);
    assert_eq!(client.get_emission_rate(), 42);

    match client.try_set_emission_rate(&owner, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_non_owner_cannot_propose() {
    let (env, client, _owner) = setup();
    let intruder = Address::generate(&env);

    match client.try_propose_owner(&intruder, &intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

#[test]
fn test_wrong_address_cannot_accept() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);
    let intruder = Address::generate(&env);

    client.propose_owner(&owner, &next);

    match client.try_accept_owner(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_owner(), owner);
}

#[test]
fn test_accept_without_proposal_fails() {
    let (env, client, _owner) = setup();
    let next = Address::generate(&env);

    match client.try_accept_owner(&next) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner error"),
    }
}

#[test]
fn test_cancel_owner_transfer() {
    let (env, client, owner) = setup();
    let next = Address::generate(&env);

    client.propose_owner(&owner, &next);
    client.cancel_owner_transfer(&owner);
    assert_eq!(client.get_pending_owner(), None);

    match client.try_accept_owner(&next) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner error"),
    }
}

#[test]
fn test_cancel_without_proposal_fails() {
    let (_env, client, owner) = setup();

    match client.try_cancel_owner_transfer(&owner) {
        Err(Ok(e)) => assert_eq!(e, ContractError::NoPendingOwner),
        _ => unreachable!("Expected NoPendingOwner error"),
    }
}

#[test]
fn test_rejected_config_change_leaves_state_untouched() {
    let (env, client, _owner) = setup();
    let intruder = Address::generate(&env);

    let before = client.get_global_state();
    let _ = client.try_set_unstake_cooldown(&intruder, &1);
    assert_eq!(client.get_global_state(), before);
}
