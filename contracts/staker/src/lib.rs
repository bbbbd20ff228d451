#![no_std]

pub mod access;
pub mod events;
pub mod ledger;
pub mod oracle;
pub mod rewards;
pub mod storage;
#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

use soroban_sdk::{contract, contractimpl, log, token, Address, Env};

pub use ledger::{GlobalState, VoterStake};

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InsufficientStake = 5,
    InActiveReveal = 6,
    UnstakeAlreadyRequested = 7,
    NoPendingUnstake = 8,
    UnstakeCooldownActive = 9,
    ArithmeticOverflow = 10,
    NoPendingOwner = 11,
}

/// Ledger state loaded and settled for one voter at the start of a call.
struct Checkpoint {
    global: GlobalState,
    record: VoterStake,
    restricted: bool,
    now: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakerContract;

#[contractimpl]
impl StakerContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `token`            – SAC address of the voting token. Staked in, paid
    ///                        out on unstake, and minted as rewards, so this
    ///                        contract must be the token's admin.
    /// * `phase_oracle`     – contract implementing [`oracle::PhaseOracle`].
    /// * `emission_rate`    – reward tokens minted **per second** across all voters.
    /// * `unstake_cooldown` – seconds between `request_unstake` and `execute_unstake`.
    pub fn initialize(
        env: Env,
        owner: Address,
        token: Address,
        phase_oracle: Address,
        emission_rate: i128,
        unstake_cooldown: u64,
    ) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if emission_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        let now = env.ledger().timestamp();

        access::set_owner(&env, &owner);
        storage::set_token(&env, &token);
        storage::set_phase_oracle(&env, &phase_oracle);
        storage::save_global(&env, &GlobalState::new(emission_rate, unstake_cooldown, now));
        storage::set_initialized(&env);
        storage::bump_instance(&env);

        events::publish_initialized(
            &env,
            owner,
            token,
            phase_oracle,
            emission_rate,
            unstake_cooldown,
        );

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` voting tokens.
    ///
    /// Rewards are settled first so the new tokens never earn retroactively.
    /// During an active reveal the deposit is held as pending stake and
    /// promoted on the voter's first call after the reveal ends.
    pub fn stake(env: Env, voter: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut cp = Self::checkpoint(&env, &voter)?;
        Self::credit_stake(&env, &mut cp, amount)?;
        Self::commit(&env, &voter, &cp);

        let token = storage::get_token(&env)?;
        token::Client::new(&env, &token).transfer(
            &voter,
            &env.current_contract_address(),
            &amount,
        );

        Self::publish_staked(&env, &voter, &cp, amount);

        Ok(())
    }

    // ── Unstaking ───────────────────────────────────────────────────────────

    /// Queue `amount` of active stake for withdrawal after the cooldown.
    ///
    /// Queued stake stops earning immediately. Only one request may be
    /// outstanding, and none may be made during an active reveal.
    pub fn request_unstake(env: Env, voter: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let mut cp = Self::checkpoint(&env, &voter)?;
        ledger::request_unstake(&mut cp.global, &mut cp.record, amount, cp.restricted, cp.now)?;
        Self::commit(&env, &voter, &cp);

        events::publish_unstake_requested(
            &env,
            voter,
            amount,
            cp.now.saturating_add(cp.global.unstake_cooldown),
            cp.record.active_stake,
        );

        Ok(())
    }

    /// Release a matured unstake request and return the amount sent.
    ///
    /// The request is cleared before the tokens leave the contract.
    pub fn execute_unstake(env: Env, voter: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let mut cp = Self::checkpoint(&env, &voter)?;
        let amount = ledger::take_unstake(&mut cp.record, cp.now, cp.global.unstake_cooldown)
            .map_err(|err| {
                log!(&env, "unstake not released", voter.clone(), cp.now);
                err
            })?;
        Self::commit(&env, &voter, &cp);

        Self::pay_unstake(&env, &voter, &cp, amount)?;

        Ok(amount)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Mint all outstanding rewards to `voter` and return the amount.
    ///
    /// Returns zero without minting when nothing is owed. The balance is
    /// zeroed before the mint.
    pub fn withdraw_rewards(env: Env, voter: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let mut cp = Self::checkpoint(&env, &voter)?;
        let amount = ledger::take_rewards(&mut cp.record);
        Self::commit(&env, &voter, &cp);

        Self::pay_rewards(&env, &voter, &cp, amount)?;

        Ok(amount)
    }

    /// Withdraw outstanding rewards and stake them in the same call.
    ///
    /// The rewards are minted straight into the contract's custody and
    /// credited like a regular deposit (pending during an active reveal).
    pub fn withdraw_and_restake(env: Env, voter: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let mut cp = Self::checkpoint(&env, &voter)?;
        let amount = ledger::take_rewards(&mut cp.record);
        if amount > 0 {
            Self::credit_stake(&env, &mut cp, amount)?;
        }
        Self::commit(&env, &voter, &cp);

        if amount > 0 {
            let token = storage::get_token(&env)?;
            token::StellarAssetClient::new(&env, &token)
                .mint(&env.current_contract_address(), &amount);
        }

        events::publish_rewards_withdrawn(&env, voter.clone(), cp.record.delegate.clone(), amount);
        if amount > 0 {
            Self::publish_staked(&env, &voter, &cp, amount);
        }

        Ok(amount)
    }

    /// Execute a matured unstake request, if any, then withdraw rewards.
    ///
    /// Each half is skipped independently when it has nothing to do.
    /// Returns `(unstaked, rewards)`.
    pub fn exit(env: Env, voter: Address) -> Result<(i128, i128), ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        let mut cp = Self::checkpoint(&env, &voter)?;
        let unstaked = if ledger::unstake_ready(&cp.record, cp.now, cp.global.unstake_cooldown) {
            ledger::take_unstake(&mut cp.record, cp.now, cp.global.unstake_cooldown)?
        } else {
            0
        };
        let rewards = ledger::take_rewards(&mut cp.record);
        Self::commit(&env, &voter, &cp);

        if unstaked > 0 {
            Self::pay_unstake(&env, &voter, &cp, unstaked)?;
        }
        Self::pay_rewards(&env, &voter, &cp, rewards)?;

        Ok((unstaked, rewards))
    }

    /// Settle rewards and promote pending stake for any voter. Callable by anyone.
    pub fn update_trackers(env: Env, voter: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;

        let cp = Self::checkpoint(&env, &voter)?;
        Self::commit(&env, &voter, &cp);

        Ok(())
    }

    // ── Delegation ──────────────────────────────────────────────────────────

    /// Name the address allowed to vote on `voter`'s behalf. `None` clears it.
    pub fn set_delegate(
        env: Env,
        voter: Address,
        delegate: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        voter.require_auth();

        if delegate.as_ref() == Some(&voter) {
            return Err(ContractError::InvalidInput);
        }

        let mut record = storage::load_voter(&env, &voter);
        record.delegate = delegate.clone();
        storage::save_voter(&env, &voter, &record);

        events::publish_delegate_set(&env, voter, delegate);

        Ok(())
    }

    /// Declare, from the delegate's side, which voter it acts for.
    ///
    /// A delegation only takes effect once both sides agree.
    pub fn set_delegator(
        env: Env,
        delegate: Address,
        voter: Option<Address>,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        delegate.require_auth();

        if voter.as_ref() == Some(&delegate) {
            return Err(ContractError::InvalidInput);
        }

        storage::set_delegator(&env, &delegate, &voter);

        events::publish_delegator_set(&env, delegate, voter);

        Ok(())
    }

    /// The voter `caller` votes for: its delegator when the pairing is
    /// mutual, otherwise `caller` itself.
    pub fn get_voter_from_delegate(env: Env, caller: Address) -> Address {
        match storage::get_delegator(&env, &caller) {
            Some(voter) if storage::load_voter(&env, &voter).delegate.as_ref() == Some(&caller) => {
                voter
            }
            _ => caller,
        }
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Current value of the reward-per-token accumulator.
    pub fn reward_per_token(env: Env) -> Result<i128, ContractError> {
        let global = storage::load_global(&env)?;
        Ok(ledger::reward_per_token(&global, env.ledger().timestamp()))
    }

    /// Rewards `voter` could withdraw right now.
    pub fn outstanding_rewards(env: Env, voter: Address) -> Result<i128, ContractError> {
        let global = storage::load_global(&env)?;
        let record = storage::load_voter(&env, &voter);
        Ok(ledger::outstanding_rewards(&global, &record, env.ledger().timestamp()))
    }

    /// Active plus pending stake of `voter`.
    pub fn get_voter_stake(env: Env, voter: Address) -> i128 {
        storage::load_voter(&env, &voter).total_stake()
    }

    pub fn get_voter_record(env: Env, voter: Address) -> VoterStake {
        storage::load_voter(&env, &voter)
    }

    /// Active plus pending stake across all voters.
    pub fn get_cumulative_stake(env: Env) -> Result<i128, ContractError> {
        Ok(storage::load_global(&env)?.cumulative_stake())
    }

    pub fn get_global_state(env: Env) -> Result<GlobalState, ContractError> {
        storage::load_global(&env)
    }

    pub fn get_emission_rate(env: Env) -> Result<i128, ContractError> {
        Ok(storage::load_global(&env)?.emission_rate)
    }

    pub fn get_unstake_cooldown(env: Env) -> Result<u64, ContractError> {
        Ok(storage::load_global(&env)?.unstake_cooldown)
    }

    /// Whether the phase oracle reports an active reveal, during which stake
    /// changes are deferred.
    pub fn in_active_reveal(env: Env) -> Result<bool, ContractError> {
        oracle::in_active_reveal(&env)
    }

    pub fn get_token(env: Env) -> Result<Address, ContractError> {
        storage::get_token(&env)
    }

    pub fn get_phase_oracle(env: Env) -> Result<Address, ContractError> {
        storage::get_phase_oracle(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        storage::is_initialized(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        access::get_owner(&env)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        access::get_pending_owner(&env)
    }

    // ── Ownership transfer (two-step) ──────────────────────────────────────

    /// Propose a new owner. Only the current owner can call this; the new
    /// owner completes the transfer with `accept_owner`.
    pub fn propose_owner(
        env: Env,
        current_owner: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        access::require_owner(&env, &current_owner)?;

        access::set_pending_owner(&env, &new_owner);

        events::publish_owner_transfer_proposed(&env, current_owner, new_owner);

        Ok(())
    }

    /// Accept the pending ownership transfer. Only the proposed owner can call this.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        new_owner.require_auth();

        let pending = access::get_pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        if new_owner != pending {
            return Err(ContractError::Unauthorized);
        }

        let old_owner = access::get_owner(&env)?;
        access::set_owner(&env, &new_owner);
        access::clear_pending_owner(&env);

        events::publish_owner_transfer_accepted(&env, old_owner, new_owner);

        Ok(())
    }

    /// Cancel a pending ownership transfer. Only the current owner can call this.
    pub fn cancel_owner_transfer(env: Env, current_owner: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        current_owner.require_auth();
        access::require_owner(&env, &current_owner)?;

        let pending = access::get_pending_owner(&env).ok_or(ContractError::NoPendingOwner)?;
        access::clear_pending_owner(&env);

        events::publish_owner_transfer_cancelled(&env, current_owner, pending);

        Ok(())
    }

    // ── Owner configuration ─────────────────────────────────────────────────

    /// Update the reward emission rate.
    ///
    /// The global accumulator is flushed at the old rate *before* the rate
    /// changes, so no voter gains or loses rewards retroactively.
    pub fn set_emission_rate(
        env: Env,
        caller: Address,
        new_rate: i128,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        if new_rate < 0 {
            return Err(ContractError::InvalidInput);
        }

        let mut global = storage::load_global(&env)?;
        ledger::update_global(&mut global, env.ledger().timestamp());
        global.emission_rate = new_rate;
        storage::save_global(&env, &global);
        storage::bump_instance(&env);

        events::publish_emission_rate_set(&env, new_rate);

        Ok(())
    }

    /// Update the unstake cooldown. Outstanding requests are measured
    /// against the new value from now on.
    pub fn set_unstake_cooldown(
        env: Env,
        caller: Address,
        new_cooldown: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        access::require_owner(&env, &caller)?;

        let mut global = storage::load_global(&env)?;
        global.unstake_cooldown = new_cooldown;
        storage::save_global(&env, &global);
        storage::bump_instance(&env);

        events::publish_unstake_cooldown_set(&env, new_cooldown);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    /// Guard: revert if the contract is not yet initialized.
    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !storage::is_initialized(env) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    /// Load ledger state for `voter`, settle their rewards and promote any
    /// pending stake if no reveal is running.
    ///
    /// Every mutating entry point that touches a voter starts here.
    fn checkpoint(env: &Env, voter: &Address) -> Result<Checkpoint, ContractError> {
        let now = env.ledger().timestamp();
        let restricted = oracle::in_active_reveal(env)?;
        let mut global = storage::load_global(env)?;
        let mut record = storage::load_voter(env, voter);

        let accrued = ledger::settle(&mut global, &mut record, now);
        events::publish_reward_updated(
            env,
            events::RewardUpdatedEvent {
                voter: voter.clone(),
                accrued,
                outstanding_rewards: record.outstanding_rewards,
                reward_per_token: global.reward_per_token_stored,
                last_update_time: global.last_update_time,
            },
        );

        let promoted = ledger::promote_pending(&mut global, &mut record, restricted);
        if promoted > 0 {
            log!(env, "pending stake promoted", voter.clone(), promoted);
            events::publish_active_stake_updated(
                env,
                events::ActiveStakeUpdatedEvent {
                    voter: voter.clone(),
                    active_stake: record.active_stake,
                    pending_stake: record.pending_stake,
                    cumulative_active_stake: global.cumulative_active_stake,
                    cumulative_pending_stake: global.cumulative_pending_stake,
                    timestamp: now,
                },
            );
        }

        Ok(Checkpoint {
            global,
            record,
            restricted,
            now,
        })
    }

    /// Persist a checkpoint. Must run before any token interaction.
    fn commit(env: &Env, voter: &Address, cp: &Checkpoint) {
        storage::save_global(env, &cp.global);
        storage::save_voter(env, voter, &cp.record);
        storage::bump_instance(env);
    }

    /// Credit a deposit, stamping the starting index for a voter (re-)entering
    /// with no stake.
    fn credit_stake(env: &Env, cp: &mut Checkpoint, amount: i128) -> Result<(), ContractError> {
        if cp.record.total_stake() == 0 {
            cp.record.next_index_to_process = oracle::starting_index_for_staker(env)?;
        }
        ledger::add_stake(&mut cp.global, &mut cp.record, amount, cp.restricted)
    }

    fn pay_unstake(
        env: &Env,
        voter: &Address,
        cp: &Checkpoint,
        amount: i128,
    ) -> Result<(), ContractError> {
        let token = storage::get_token(env)?;
        token::Client::new(env, &token).transfer(&env.current_contract_address(), voter, &amount);

        events::publish_unstake_executed(env, voter.clone(), amount, cp.record.active_stake);

        Ok(())
    }

    fn pay_rewards(
        env: &Env,
        voter: &Address,
        cp: &Checkpoint,
        amount: i128,
    ) -> Result<(), ContractError> {
        if amount > 0 {
            let token = storage::get_token(env)?;
            token::StellarAssetClient::new(env, &token).mint(voter, &amount);
        }

        events::publish_rewards_withdrawn(env, voter.clone(), cp.record.delegate.clone(), amount);

        Ok(())
    }

    fn publish_staked(env: &Env, voter: &Address, cp: &Checkpoint, amount: i128) {
        events::publish_staked(
            env,
            events::StakedEvent {
                voter: voter.clone(),
                amount,
                active_stake: cp.record.active_stake,
                pending_stake: cp.record.pending_stake,
                pending_unstake: cp.record.pending_unstake,
                cumulative_stake: cp.global.cumulative_stake(),
                timestamp: cp.now,
            },
        );
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_access;
