//! Fixed-point reward accumulator math.
//!
//! Rewards are distributed with the reward-per-token technique: a single
//! global accumulator grows by `elapsed × rate × SCALE / total_stake`, and
//! each voter is owed `stake × (accumulator − snapshot) / SCALE` since their
//! last settlement. Both steps are O(1) regardless of voter count.
//!
//! Neither step can fail. Products too large for `i128` fall back to
//! dividing first, and the results saturate at `i128::MAX`, so a runaway
//! rate can stall accrual but never block a settlement.

/// Fixed-point scale applied to the reward-per-token accumulator.
pub const REWARD_SCALE: i128 = 1_000_000_000_000_000_000;

/// Advance the accumulator by `elapsed` seconds of emission at `rate`.
///
/// With nothing staked the accumulator stays frozen: no emission is
/// attributed to anyone for that window.
pub fn compute_reward_per_token(
    stored: i128,
    rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> i128 {
    if total_staked <= 0 || rate <= 0 || elapsed == 0 {
        return stored;
    }

    let emitted = (elapsed as i128).saturating_mul(rate);
    let increment = match emitted.checked_mul(REWARD_SCALE) {
        Some(scaled) => scaled / total_staked,
        None => (emitted / total_staked).saturating_mul(REWARD_SCALE),
    };

    stored.saturating_add(increment)
}

/// Rewards owed to a position of `staked` tokens, on top of `already_earned`.
pub fn earned(staked: i128, current_rpt: i128, paid_rpt: i128, already_earned: i128) -> i128 {
    let delta = current_rpt.saturating_sub(paid_rpt);
    if staked <= 0 || delta <= 0 {
        return already_earned;
    }

    let accrued = match staked.checked_mul(delta) {
        Some(product) => product / REWARD_SCALE,
        None => (delta / REWARD_SCALE).saturating_mul(staked),
    };

    already_earned.saturating_add(accrued)
}
