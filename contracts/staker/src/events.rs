#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub token: Address,
    pub phase_oracle: Address,
    pub emission_rate: i128,
    pub unstake_cooldown: u64,
    pub timestamp: u64,
}

/// Fired when a voter deposits stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub voter: Address,
    pub amount: i128,
    pub active_stake: i128,
    pub pending_stake: i128,
    pub pending_unstake: i128,
    pub cumulative_stake: i128,
    pub timestamp: u64,
}

/// Fired when a voter queues stake for withdrawal.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeRequestedEvent {
    pub voter: Address,
    pub amount: i128,
    pub unlock_at: u64,
    pub active_stake: i128,
    pub timestamp: u64,
}

/// Fired when queued stake is released back to the voter.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeExecutedEvent {
    pub voter: Address,
    pub amount: i128,
    pub active_stake: i128,
    pub timestamp: u64,
}

/// Fired on every reward withdrawal, including zero-amount ones.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardsWithdrawnEvent {
    pub voter: Address,
    pub delegate: Option<Address>,
    pub amount: i128,
    pub timestamp: u64,
}

/// Fired when a voter's rewards are settled against the accumulator.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardUpdatedEvent {
    pub voter: Address,
    pub accrued: i128,
    pub outstanding_rewards: i128,
    pub reward_per_token: i128,
    pub last_update_time: u64,
}

/// Fired when a voter's pending stake is promoted to active.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveStakeUpdatedEvent {
    pub voter: Address,
    pub active_stake: i128,
    pub pending_stake: i128,
    pub cumulative_active_stake: i128,
    pub cumulative_pending_stake: i128,
    pub timestamp: u64,
}

/// Fired when the owner changes the emission rate.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmissionRateSetEvent {
    pub new_rate: i128,
    pub timestamp: u64,
}

/// Fired when the owner changes the unstake cooldown.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeCooldownSetEvent {
    pub new_cooldown: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegateSetEvent {
    pub voter: Address,
    pub delegate: Option<Address>,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegatorSetEvent {
    pub delegate: Address,
    pub voter: Option<Address>,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is proposed.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferProposedEvent {
    pub current_owner: Address,
    pub proposed_owner: Address,
    pub timestamp: u64,
}

/// Fired when an ownership transfer is accepted.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferAcceptedEvent {
    pub old_owner: Address,
    pub new_owner: Address,
    pub timestamp: u64,
}

/// Fired when a pending ownership transfer is cancelled.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerTransferCancelledEvent {
    pub owner: Address,
    pub cancelled_proposed: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    owner: Address,
    token: Address,
    phase_oracle: Address,
    emission_rate: i128,
    unstake_cooldown: u64,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            token,
            phase_oracle,
            emission_rate,
            unstake_cooldown,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(env: &Env, event: StakedEvent) {
    env.events()
        .publish((symbol_short!("STAKED"), event.voter.clone()), event);
}

pub fn publish_unstake_requested(
    env: &Env,
    voter: Address,
    amount: i128,
    unlock_at: u64,
    active_stake: i128,
) {
    env.events().publish(
        (symbol_short!("UNSTK_REQ"), voter.clone()),
        UnstakeRequestedEvent {
            voter,
            amount,
            unlock_at,
            active_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstake_executed(env: &Env, voter: Address, amount: i128, active_stake: i128) {
    env.events().publish(
        (symbol_short!("UNSTK_EXE"), voter.clone()),
        UnstakeExecutedEvent {
            voter,
            amount,
            active_stake,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_rewards_withdrawn(
    env: &Env,
    voter: Address,
    delegate: Option<Address>,
    amount: i128,
) {
    env.events().publish(
        (symbol_short!("RWD_WDRN"), voter.clone()),
        RewardsWithdrawnEvent {
            voter,
            delegate,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_updated(env: &Env, event: RewardUpdatedEvent) {
    env.events()
        .publish((symbol_short!("RWD_UPD"), event.voter.clone()), event);
}

pub fn publish_active_stake_updated(env: &Env, event: ActiveStakeUpdatedEvent) {
    env.events()
        .publish((symbol_short!("ACT_UPD"), event.voter.clone()), event);
}

pub fn publish_emission_rate_set(env: &Env, new_rate: i128) {
    env.events().publish(
        (symbol_short!("EMIT_RATE"),),
        EmissionRateSetEvent {
            new_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstake_cooldown_set(env: &Env, new_cooldown: u64) {
    env.events().publish(
        (symbol_short!("COOLDOWN"),),
        UnstakeCooldownSetEvent {
            new_cooldown,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegate_set(env: &Env, voter: Address, delegate: Option<Address>) {
    env.events().publish(
        (symbol_short!("DELEGATE"), voter.clone()),
        DelegateSetEvent {
            voter,
            delegate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_delegator_set(env: &Env, delegate: Address, voter: Option<Address>) {
    env.events().publish(
        (symbol_short!("DELEGATOR"), delegate.clone()),
        DelegatorSetEvent {
            delegate,
            voter,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_proposed(env: &Env, current_owner: Address, proposed_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_PROP"), current_owner.clone()),
        OwnerTransferProposedEvent {
            current_owner,
            proposed_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_accepted(env: &Env, old_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_ACPT"), new_owner.clone()),
        OwnerTransferAcceptedEvent {
            old_owner,
            new_owner,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_owner_transfer_cancelled(env: &Env, owner: Address, cancelled_proposed: Address) {
    env.events().publish(
        (symbol_short!("OWN_CNCL"), owner.clone()),
        OwnerTransferCancelledEvent {
            owner,
            cancelled_proposed,
            timestamp: env.ledger().timestamp(),
        },
    );
}
