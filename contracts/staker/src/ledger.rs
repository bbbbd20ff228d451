//! Stake ledger state and its transitions.
//!
//! Everything here is pure: callers load [`GlobalState`] and a
//! [`VoterStake`] from storage, run one or more transitions against them,
//! and persist the result. Nothing in this module touches the host, so the
//! accounting can be exercised without a contract environment.

use soroban_sdk::{contracttype, Address};

use crate::{rewards, ContractError};

/// Ledger-wide accounting, stored once per contract instance.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GlobalState {
    /// Reward tokens minted per second across all voters.
    pub emission_rate: i128,
    pub cumulative_active_stake: i128,
    pub cumulative_pending_stake: i128,
    /// Scaled by [`rewards::REWARD_SCALE`]; never decreases.
    pub reward_per_token_stored: i128,
    pub last_update_time: u64,
    /// Seconds between an unstake request and its release.
    pub unstake_cooldown: u64,
}

impl GlobalState {
    pub fn new(emission_rate: i128, unstake_cooldown: u64, now: u64) -> Self {
        Self {
            emission_rate,
            unstake_cooldown,
            last_update_time: now,
            ..Self::default()
        }
    }

    /// Active plus pending stake: the denominator for reward accrual.
    pub fn cumulative_stake(&self) -> i128 {
        self.cumulative_active_stake.saturating_add(self.cumulative_pending_stake)
    }
}

/// A single voter's position. Created default-valued on first touch and
/// never removed.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct VoterStake {
    pub active_stake: i128,
    /// Stake deposited during an active reveal, promoted on a later call.
    pub pending_stake: i128,
    /// Requested for withdrawal; earns nothing.
    pub pending_unstake: i128,
    pub rewards_paid_per_token: i128,
    pub outstanding_rewards: i128,
    /// Set together with `pending_unstake`; meaningless once that is zero.
    pub unstake_request_time: u64,
    pub delegate: Option<Address>,
    pub next_index_to_process: u64,
}

impl VoterStake {
    /// Stake that earns rewards: active plus pending.
    pub fn total_stake(&self) -> i128 {
        self.active_stake.saturating_add(self.pending_stake)
    }

    pub fn has_unstake_request(&self) -> bool {
        self.pending_unstake > 0
    }
}

// ── Accumulator ──────────────────────────────────────────────────────────────

/// Accumulator value at `now`, without mutating anything.
pub fn reward_per_token(global: &GlobalState, now: u64) -> i128 {
    rewards::compute_reward_per_token(
        global.reward_per_token_stored,
        global.emission_rate,
        now.saturating_sub(global.last_update_time),
        global.cumulative_stake(),
    )
}

/// Bring the global accumulator forward to `now` at the current rate.
pub fn update_global(global: &mut GlobalState, now: u64) {
    global.reward_per_token_stored = reward_per_token(global, now);
    global.last_update_time = global.last_update_time.max(now);
}

/// Refresh the accumulator, then credit `voter` with everything accrued
/// since their last snapshot. Returns the amount credited by this call.
pub fn settle(global: &mut GlobalState, voter: &mut VoterStake, now: u64) -> i128 {
    update_global(global, now);

    let accrued = rewards::earned(
        voter.total_stake(),
        global.reward_per_token_stored,
        voter.rewards_paid_per_token,
        0,
    );
    voter.outstanding_rewards = voter.outstanding_rewards.saturating_add(accrued);
    voter.rewards_paid_per_token = global.reward_per_token_stored;

    accrued
}

/// Rewards `voter` could withdraw at `now`, without mutating anything.
pub fn outstanding_rewards(global: &GlobalState, voter: &VoterStake, now: u64) -> i128 {
    rewards::earned(
        voter.total_stake(),
        reward_per_token(global, now),
        voter.rewards_paid_per_token,
        voter.outstanding_rewards,
    )
}

// ── Stake transitions ────────────────────────────────────────────────────────

/// Move this voter's pending stake to active unless a reveal is running.
///
/// Only the voter passed in is promoted; other voters keep their pending
/// stake until they interact. Returns the amount promoted.
pub fn promote_pending(
    global: &mut GlobalState,
    voter: &mut VoterStake,
    restricted: bool,
) -> i128 {
    if restricted || voter.pending_stake == 0 {
        return 0;
    }

    let amount = voter.pending_stake;
    voter.active_stake = voter.active_stake.saturating_add(amount);
    voter.pending_stake = 0;
    global.cumulative_active_stake = global.cumulative_active_stake.saturating_add(amount);
    global.cumulative_pending_stake = global.cumulative_pending_stake.saturating_sub(amount);
    amount
}

/// Credit `amount` to the voter: pending during a reveal, active otherwise.
pub fn add_stake(
    global: &mut GlobalState,
    voter: &mut VoterStake,
    amount: i128,
    restricted: bool,
) -> Result<(), ContractError> {
    if amount <= 0 {
        return Err(ContractError::InvalidInput);
    }

    let (voter_slot, global_slot) = if restricted {
        (&mut voter.pending_stake, &mut global.cumulative_pending_stake)
    } else {
        (&mut voter.active_stake, &mut global.cumulative_active_stake)
    };
    *voter_slot = voter_slot
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;
    *global_slot = global_slot
        .checked_add(amount)
        .ok_or(ContractError::ArithmeticOverflow)?;

    Ok(())
}

/// Move `amount` of active stake into the cooldown queue.
pub fn request_unstake(
    global: &mut GlobalState,
    voter: &mut VoterStake,
    amount: i128,
    restricted: bool,
    now: u64,
) -> Result<(), ContractError> {
    if restricted {
        return Err(ContractError::InActiveReveal);
    }
    if amount <= 0 {
        return Err(ContractError::InvalidInput);
    }
    if voter.has_unstake_request() {
        return Err(ContractError::UnstakeAlreadyRequested);
    }
    if amount > voter.active_stake {
        return Err(ContractError::InsufficientStake);
    }

    voter.active_stake -= amount;
    voter.pending_unstake = amount;
    voter.unstake_request_time = now;
    global.cumulative_active_stake = global.cumulative_active_stake.saturating_sub(amount);

    Ok(())
}

/// Whether the voter's unstake request can be released at `now`.
pub fn unstake_ready(voter: &VoterStake, now: u64, cooldown: u64) -> bool {
    voter.has_unstake_request() && now >= voter.unstake_request_time.saturating_add(cooldown)
}

/// Clear a matured unstake request and return the amount to release.
pub fn take_unstake(
    voter: &mut VoterStake,
    now: u64,
    cooldown: u64,
) -> Result<i128, ContractError> {
    if !voter.has_unstake_request() {
        return Err(ContractError::NoPendingUnstake);
    }
    if !unstake_ready(voter, now, cooldown) {
        return Err(ContractError::UnstakeCooldownActive);
    }

    let amount = voter.pending_unstake;
    voter.pending_unstake = 0;
    voter.unstake_request_time = 0;
    Ok(amount)
}

/// Zero the voter's outstanding rewards and return what was owed.
pub fn take_rewards(voter: &mut VoterStake) -> i128 {
    core::mem::take(&mut voter.outstanding_rewards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewards::REWARD_SCALE;

    fn staked(global: &mut GlobalState, amount: i128, now: u64) -> VoterStake {
        let mut voter = VoterStake::default();
        settle(global, &mut voter, now);
        add_stake(global, &mut voter, amount, false).unwrap();
        voter
    }

    #[test]
    fn settle_credits_sole_staker() {
        let mut global = GlobalState::new(10, 0, 0);
        let mut voter = staked(&mut global, 100, 0);

        let accrued = settle(&mut global, &mut voter, 50);

        assert_eq!(accrued, 500);
        assert_eq!(voter.outstanding_rewards, 500);
        assert_eq!(voter.rewards_paid_per_token, global.reward_per_token_stored);
        assert_eq!(global.last_update_time, 50);
    }

    #[test]
    fn accumulator_frozen_with_no_stake() {
        let mut global = GlobalState::new(10, 0, 0);
        update_global(&mut global, 1_000);

        assert_eq!(global.reward_per_token_stored, 0);
        assert_eq!(global.last_update_time, 1_000);
    }

    #[test]
    fn outstanding_query_matches_settlement() {
        let mut global = GlobalState::new(7, 0, 0);
        let mut voter = staked(&mut global, 300, 0);

        let projected = outstanding_rewards(&global, &voter, 90);
        settle(&mut global, &mut voter, 90);

        assert_eq!(projected, voter.outstanding_rewards);
    }

    #[test]
    fn restricted_stake_lands_in_pending() {
        let mut global = GlobalState::new(1, 0, 0);
        let mut voter = VoterStake::default();

        add_stake(&mut global, &mut voter, 40, true).unwrap();

        assert_eq!(voter.pending_stake, 40);
        assert_eq!(voter.active_stake, 0);
        assert_eq!(global.cumulative_pending_stake, 40);
        assert_eq!(global.cumulative_active_stake, 0);
    }

    #[test]
    fn promotion_waits_for_phase_end() {
        let mut global = GlobalState::new(1, 0, 0);
        let mut voter = VoterStake::default();
        add_stake(&mut global, &mut voter, 40, true).unwrap();

        assert_eq!(promote_pending(&mut global, &mut voter, true), 0);
        assert_eq!(voter.pending_stake, 40);

        assert_eq!(promote_pending(&mut global, &mut voter, false), 40);
        assert_eq!(voter.active_stake, 40);
        assert_eq!(voter.pending_stake, 0);
        assert_eq!(global.cumulative_active_stake, 40);
        assert_eq!(global.cumulative_pending_stake, 0);
    }

    #[test]
    fn pending_stake_earns_rewards() {
        let mut global = GlobalState::new(10, 0, 0);
        let mut voter = VoterStake::default();
        add_stake(&mut global, &mut voter, 100, true).unwrap();

        settle(&mut global, &mut voter, 10);
        assert_eq!(voter.outstanding_rewards, 100);
    }

    #[test]
    fn request_unstake_moves_active_into_queue() {
        let mut global = GlobalState::new(0, 60, 0);
        let mut voter = staked(&mut global, 100, 0);

        request_unstake(&mut global, &mut voter, 50, false, 5).unwrap();

        assert_eq!(voter.active_stake, 50);
        assert_eq!(voter.pending_unstake, 50);
        assert_eq!(voter.unstake_request_time, 5);
        assert_eq!(global.cumulative_active_stake, 50);
        assert_eq!(
            request_unstake(&mut global, &mut voter, 10, false, 6),
            Err(ContractError::UnstakeAlreadyRequested)
        );
    }

    #[test]
    fn request_unstake_rejections() {
        let mut global = GlobalState::new(0, 60, 0);
        let mut voter = staked(&mut global, 100, 0);

        assert_eq!(
            request_unstake(&mut global, &mut voter, 10, true, 0),
            Err(ContractError::InActiveReveal)
        );
        assert_eq!(
            request_unstake(&mut global, &mut voter, 0, false, 0),
            Err(ContractError::InvalidInput)
        );
        assert_eq!(
            request_unstake(&mut global, &mut voter, 101, false, 0),
            Err(ContractError::InsufficientStake)
        );
        assert_eq!(voter.active_stake, 100);
    }

    #[test]
    fn request_at_time_zero_is_still_tracked() {
        let mut global = GlobalState::new(0, 0, 0);
        let mut voter = staked(&mut global, 100, 0);

        request_unstake(&mut global, &mut voter, 100, false, 0).unwrap();

        assert!(voter.has_unstake_request());
        assert_eq!(take_unstake(&mut voter, 0, 0), Ok(100));
    }

    #[test]
    fn take_unstake_honours_cooldown() {
        let mut global = GlobalState::new(0, 60, 0);
        let mut voter = staked(&mut global, 100, 0);
        request_unstake(&mut global, &mut voter, 30, false, 10).unwrap();

        assert_eq!(
            take_unstake(&mut voter, 69, 60),
            Err(ContractError::UnstakeCooldownActive)
        );
        assert_eq!(take_unstake(&mut voter, 70, 60), Ok(30));
        assert_eq!(voter.pending_unstake, 0);
        assert_eq!(voter.unstake_request_time, 0);
        assert_eq!(
            take_unstake(&mut voter, 70, 60),
            Err(ContractError::NoPendingUnstake)
        );
    }

    #[test]
    fn queued_unstake_stops_earning() {
        let mut global = GlobalState::new(10, 0, 0);
        let mut voter = staked(&mut global, 100, 0);
        settle(&mut global, &mut voter, 0);
        request_unstake(&mut global, &mut voter, 100, false, 0).unwrap();

        settle(&mut global, &mut voter, 1_000);
        assert_eq!(voter.outstanding_rewards, 0);
    }

    #[test]
    fn take_rewards_zeroes_balance() {
        let mut voter = VoterStake {
            outstanding_rewards: 99,
            ..VoterStake::default()
        };
        assert_eq!(take_rewards(&mut voter), 99);
        assert_eq!(take_rewards(&mut voter), 0);
    }

    #[test]
    fn rate_change_is_not_retroactive() {
        let mut global = GlobalState::new(10, 0, 0);
        let mut voter = staked(&mut global, 1_000, 0);

        update_global(&mut global, 50);
        global.emission_rate = 5;

        settle(&mut global, &mut voter, 150);
        assert_eq!(voter.outstanding_rewards, 1_000);
        assert_eq!(global.reward_per_token_stored, REWARD_SCALE);
    }

    #[test]
    fn runaway_accumulator_still_settles() {
        let mut global = GlobalState::new(i128::MAX, 0, 0);
        let mut voter = staked(&mut global, 1, 0);

        settle(&mut global, &mut voter, 10);
        assert_eq!(global.reward_per_token_stored, i128::MAX);

        request_unstake(&mut global, &mut voter, 1, false, 10).unwrap();
        settle(&mut global, &mut voter, 20);
        assert_eq!(take_unstake(&mut voter, 20, 0), Ok(1));
    }
}
