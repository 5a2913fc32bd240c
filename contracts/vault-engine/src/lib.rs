//! XHedge Vault Engine
//!
//! The operation set of the collateral ledger. A vault locks a deposit
//! against a price feed and issues two claims: the lever claim (even token
//! id) and the hedge claim (odd token id). Whoever holds a claim when the
//! vault settles receives that side's share of the deposit.
//!
//! ## Core Operations
//!
//! - **create**: lock `hedge_value * (1 + init_rate) / price`, mint both claims
//! - **burn**: joint owner of both claims takes the whole deposit
//! - **closeout**: hedge owner exits early once the vault hits its minimum rate
//! - **liquidate**: either owner settles at maturity
//! - **change_amount**: anyone tops up, the lever owner withdraws (0.5% fee)
//! - **change_validator_to_vote**: lever owner picks the delegation target
//! - **vote**: credit `elapsed * amount` to the vault's validator
//!
//! ## Atomicity
//!
//! Every operation runs all of its checks first, then delivers its payouts
//! as a single batch, and only then writes state. A failed check or a
//! refused payout leaves store, accumulator, registry and events untouched.

pub mod config;
pub mod store;
pub mod treasury;
pub mod votes;


use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use config::EngineConfig;
pub use store::VaultStore;
pub use treasury::Balances;
pub use votes::VoteAccumulator;

use xhedge_claim_token::ClaimRegistry;
use xhedge_common::{
    errors::{XHedgeError, XHedgeResult},
    events::{EventLog, XHedgeEvent},
    interfaces::{PayoutSink, PriceOracle, TokenRegistry},
    math::{
        closeout_split, liquidation_split, meets_min_collateral, ratio_limit,
        required_locked_amount, safe_add, value_ratio, vote_increment, withdrawal,
        PayoutSplit,
    },
    types::{
        Address, CallContext, ClaimKind, CreateVaultParams, PackedCreateArgs, Payout,
        PayoutReason, SerialNumber, TokenId, ValidatorId, Vault, VaultClaims, ZERO_ADDRESS,
    },
};
use xhedge_price_oracle::OracleBook;

// ============ Engine State ============

/// Everything the engine persists between operations
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct EngineState {
    pub store: VaultStore,
    pub votes: VoteAccumulator,
}

/// Identifiers handed back by `create`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatedVault {
    pub sn: SerialNumber,
    pub lever_token: TokenId,
    pub hedge_token: TokenId,
    /// Deposit locked in the vault
    pub amount: u128,
    /// Overpayment returned to the caller
    pub refund: u128,
}

/// Outcome of `change_amount`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountChange {
    /// Amount stored after the change
    pub stored: u128,
    /// Paid out to the lever owner (0 on increase)
    pub payout: u128,
    /// Withdrawal fee kept in the vault (0 on increase)
    pub fee: u128,
}

/// Current holders of a vault's claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOwners {
    pub claims: VaultClaims,
    pub lever_owner: Address,
    pub hedge_owner: Address,
}

// ============ Vault Engine ============

pub struct VaultEngine<O, R, P> {
    config: EngineConfig,
    state: EngineState,
    oracle: O,
    registry: R,
    sink: P,
    events: EventLog,
}

/// Engine wired to the in-memory collaborators
pub type InMemoryEngine = VaultEngine<OracleBook, ClaimRegistry, Balances>;

impl InMemoryEngine {
    pub fn in_memory(config: EngineConfig, oracle: OracleBook) -> XHedgeResult<Self> {
        Self::new(config, oracle, ClaimRegistry::new(), Balances::new())
    }
}

impl<O: PriceOracle, R: TokenRegistry, P: PayoutSink> VaultEngine<O, R, P> {
    pub fn new(config: EngineConfig, oracle: O, registry: R, sink: P) -> XHedgeResult<Self> {
        Self::with_state(config, EngineState::default(), oracle, registry, sink)
    }

    /// Resume from a snapshot taken with [`VaultEngine::state`].
    ///
    /// The registry must hold the claims of every open vault in `state`.
    pub fn with_state(
        config: EngineConfig,
        state: EngineState,
        oracle: O,
        registry: R,
        sink: P,
    ) -> XHedgeResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state,
            oracle,
            registry,
            sink,
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Claim holders move their tokens through the registry directly
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    /// Drain notifications of the operations that succeeded so far
    pub fn take_events(&mut self) -> Vec<XHedgeEvent> {
        self.events.take()
    }

    // ============ Creation ============

    /// Open a vault, locking the required deposit out of `paid`.
    ///
    /// # Errors
    /// - `CollateralRatesNotMatch` if `min_collateral_rate > init_collateral_rate`
    /// - `InvalidMatureTime` if maturity is not after `now`
    /// - `LockedAmountTooSmall` if the required deposit is dust
    /// - `NotEnoughPaid` if `paid` does not cover it
    pub fn create(
        &mut self,
        ctx: &CallContext,
        params: CreateVaultParams,
        paid: u128,
    ) -> XHedgeResult<CreatedVault> {
        // 1. Rates must be ordered
        if params.min_collateral_rate > params.init_collateral_rate {
            return Err(XHedgeError::CollateralRatesNotMatch {
                init_rate: params.init_collateral_rate,
                min_rate: params.min_collateral_rate,
            });
        }

        // 2. Maturity must lie in the future
        if params.mature_time <= ctx.now {
            return Err(XHedgeError::InvalidMatureTime {
                mature_time: params.mature_time,
                now: ctx.now,
            });
        }

        // 3. Required deposit at the current price
        let price = self.oracle.current_price(&params.oracle)?;
        let required =
            required_locked_amount(params.hedge_value, params.init_collateral_rate, price)?;
        if required <= self.config.min_locked_amount {
            return Err(XHedgeError::LockedAmountTooSmall {
                required,
                minimum: self.config.min_locked_amount,
            });
        }

        // 4. Payment must cover it
        if paid < required {
            return Err(XHedgeError::NotEnoughPaid { paid, required });
        }
        let refund = paid - required;

        // 5. Both claims must be mintable to the caller
        let claims = VaultClaims::new(self.state.store.next_serial());
        if ctx.caller == ZERO_ADDRESS {
            return Err(XHedgeError::InvalidAddress {
                reason: "vault owner cannot be zero address",
            });
        }
        for token_id in [claims.lever(), claims.hedge()] {
            if self.registry.exists(token_id) {
                return Err(XHedgeError::TokenAlreadyMinted { token_id });
            }
        }
        safe_add(self.state.store.total_locked(), required)?;

        // 6. Return the overpayment
        if refund > 0 {
            self.sink.deliver(&[Payout::new(ctx.caller, refund, PayoutReason::Refund)])?;
        }

        // 7. Commit
        let sn = self.state.store.insert(Vault {
            init_collateral_rate: params.init_collateral_rate,
            min_collateral_rate: params.min_collateral_rate,
            closeout_penalty: params.closeout_penalty,
            mature_time: params.mature_time,
            validator_to_vote: params.validator_to_vote,
            hedge_value: params.hedge_value,
            oracle: params.oracle,
            amount: required,
            last_vote_time: ctx.now,
        })?;
        self.registry.mint(ctx.caller, claims.lever())?;
        self.registry.mint(ctx.caller, claims.hedge())?;

        for token_id in [claims.lever(), claims.hedge()] {
            self.events.emit(XHedgeEvent::ClaimMinted {
                token_id,
                to: ctx.caller,
                timestamp: ctx.now,
            });
        }
        self.events.emit(XHedgeEvent::VaultCreated {
            sn,
            owner: ctx.caller,
            lever_token: claims.lever(),
            hedge_token: claims.hedge(),
            amount: required,
            timestamp: ctx.now,
        });
        info!(sn, amount = required, refund, "vault created");

        Ok(CreatedVault {
            sn,
            lever_token: claims.lever(),
            hedge_token: claims.hedge(),
            amount: required,
            refund,
        })
    }

    /// `create` with its arguments in the three-word packed layout
    pub fn create_packed(
        &mut self,
        ctx: &CallContext,
        args: &PackedCreateArgs,
        paid: u128,
    ) -> XHedgeResult<CreatedVault> {
        self.create(ctx, args.unpack(), paid)
    }

    // ============ Queries ============

    /// Stored vault, or the zero record if `sn` is unknown or closed
    pub fn load(&self, sn: SerialNumber) -> Vault {
        self.state.store.load(sn)
    }

    /// Accumulated time-weighted stake of `validator`
    pub fn val_to_votes(&self, validator: &ValidatorId) -> u128 {
        self.state.votes.votes_of(validator)
    }

    /// Claim ids and holders of an open vault
    pub fn claims_of(&self, sn: SerialNumber) -> Option<ClaimOwners> {
        self.state.store.get(sn)?;
        let claims = VaultClaims::new(sn);
        Some(ClaimOwners {
            claims,
            lever_owner: self.registry.owner_of(claims.lever())?,
            hedge_owner: self.registry.owner_of(claims.hedge())?,
        })
    }

    /// Serials of every open vault, ascending
    pub fn open_serials(&self) -> Vec<SerialNumber> {
        self.state.store.open_serials().collect()
    }

    /// Deposit locked across all open vaults
    pub fn total_locked(&self) -> u128 {
        self.state.store.total_locked()
    }

    // ============ Settlement ============

    /// Joint owner of both claims takes the whole deposit.
    pub fn burn(&mut self, ctx: &CallContext, sn: SerialNumber) -> XHedgeResult<u128> {
        // 1. Vault must be open
        let amount = self.state.store.require(sn)?.amount;

        // 2. Caller must hold both claims
        let claims = VaultClaims::new(sn);
        if !self.holds(&ctx.caller, claims.lever()) || !self.holds(&ctx.caller, claims.hedge()) {
            warn!(sn, "burn by partial owner rejected");
            return Err(XHedgeError::NotWholeOwner { sn, caller: ctx.caller });
        }

        // 3. Pay out, then retire
        self.sink.deliver(&[Payout::new(ctx.caller, amount, PayoutReason::Burn)])?;
        self.retire(ctx, sn)?;

        self.events.emit(XHedgeEvent::VaultBurned {
            sn,
            owner: ctx.caller,
            amount,
            timestamp: ctx.now,
        });
        info!(sn, amount, "vault burned");
        Ok(amount)
    }

    /// Early exit by the hedge owner once the vault reaches its minimum
    /// collateral rate. The hedge side gets `hedge_value / price` plus the
    /// closeout penalty, capped at the deposit.
    ///
    /// # Errors
    /// - `NotHedgeNft` if `hedge_token` is a lever id
    /// - `NotOwner` if the caller does not hold it
    /// - `AlreadyMature` if maturity has been reached
    /// - `PriceTooHigh` if the vault is still above its minimum rate
    pub fn closeout(
        &mut self,
        ctx: &CallContext,
        hedge_token: TokenId,
    ) -> XHedgeResult<PayoutSplit> {
        // 1. Token must be a hedge claim held by the caller
        if ClaimKind::of(hedge_token) != ClaimKind::Hedge {
            return Err(XHedgeError::NotHedgeNft { token_id: hedge_token });
        }
        if !self.holds(&ctx.caller, hedge_token) {
            warn!(token_id = hedge_token, "closeout by non-owner rejected");
            return Err(XHedgeError::NotOwner { token_id: hedge_token, caller: ctx.caller });
        }
        let sn = serial_of(hedge_token)?;
        let vault = self.state.store.require(sn)?.clone();

        // 2. Only before maturity
        if vault.is_mature(ctx.now) {
            return Err(XHedgeError::AlreadyMature {
                sn,
                mature_time: vault.mature_time,
                now: ctx.now,
            });
        }

        // 3. Vault must have fallen to its closeout edge
        let price = self.oracle.current_price(&vault.oracle)?;
        let ratio = value_ratio(vault.amount, price, vault.hedge_value)?;
        let limit = ratio_limit(vault.min_collateral_rate)?;
        if ratio > limit {
            debug!(sn, ratio, limit, "closeout refused above minimum rate");
            return Err(XHedgeError::PriceTooHigh { value_ratio: ratio, limit });
        }

        // 4. Split, pay, retire
        let split = closeout_split(vault.amount, vault.hedge_value, price, vault.closeout_penalty)?;
        self.settle(ctx, sn, split)?;

        self.events.emit(XHedgeEvent::VaultClosedOut {
            sn,
            price,
            to_hedger: split.to_hedger,
            to_lever: split.to_lever,
            timestamp: ctx.now,
        });
        info!(
            sn,
            price,
            to_hedger = split.to_hedger,
            to_lever = split.to_lever,
            "vault closed out"
        );
        Ok(split)
    }

    /// Settlement at maturity by either claim holder. The hedge side gets
    /// `hedge_value / price` capped at the deposit and the lever side the
    /// rest, whichever token authorised the call.
    pub fn liquidate(&mut self, ctx: &CallContext, token_id: TokenId) -> XHedgeResult<PayoutSplit> {
        let sn = serial_of(token_id)?;
        let vault = self.state.store.require(sn)?.clone();

        // 1. Only from maturity on
        if !vault.is_mature(ctx.now) {
            return Err(XHedgeError::NotMature {
                sn,
                mature_time: vault.mature_time,
                now: ctx.now,
            });
        }

        // 2. Caller must hold the token it passed
        if !self.holds(&ctx.caller, token_id) {
            warn!(token_id, "liquidation by non-owner rejected");
            return Err(XHedgeError::NotOwner { token_id, caller: ctx.caller });
        }

        // 3. Split, pay, retire
        let price = self.oracle.current_price(&vault.oracle)?;
        let split = liquidation_split(vault.amount, vault.hedge_value, price)?;
        self.settle(ctx, sn, split)?;

        self.events.emit(XHedgeEvent::VaultLiquidated {
            sn,
            price,
            to_hedger: split.to_hedger,
            to_lever: split.to_lever,
            timestamp: ctx.now,
        });
        info!(
            sn,
            price,
            to_hedger = split.to_hedger,
            to_lever = split.to_lever,
            "vault liquidated"
        );
        Ok(split)
    }

    // ============ Resizing ============

    /// Move the locked amount to `new_amount`.
    ///
    /// Raising it is open to anyone paying exactly the difference. Lowering
    /// it is reserved to the lever owner, attaches no value, keeps a 0.5%
    /// fee of the cut inside the vault and must leave the vault at or above
    /// its minimum collateral rate.
    pub fn change_amount(
        &mut self,
        ctx: &CallContext,
        sn: SerialNumber,
        new_amount: u128,
        paid: u128,
    ) -> XHedgeResult<AmountChange> {
        let vault = self.state.store.require(sn)?.clone();

        let change = if new_amount >= vault.amount {
            // Top-up: exact payment required
            let delta = new_amount - vault.amount;
            if paid != delta {
                return Err(XHedgeError::BadMsgVal { expected: delta, paid });
            }
            self.state.store.set_amount(sn, new_amount)?;
            AmountChange { stored: new_amount, payout: 0, fee: 0 }
        } else {
            // 1. Lever owner only, no value attached
            let lever_token = VaultClaims::new(sn).lever();
            if !self.holds(&ctx.caller, lever_token) {
                warn!(sn, "withdrawal by non-owner rejected");
                return Err(XHedgeError::NotOwner { token_id: lever_token, caller: ctx.caller });
            }
            if paid != 0 {
                return Err(XHedgeError::BadMsgVal { expected: 0, paid });
            }

            // 2. What stays must clear dust and the minimum rate
            let outcome = withdrawal(vault.amount, new_amount, self.config.withdrawal_fee_rate)?;
            if outcome.stored <= self.config.min_locked_amount {
                return Err(XHedgeError::AmtNotEnough { stored: outcome.stored });
            }
            let price = self.oracle.current_price(&vault.oracle)?;
            let rate = vault.min_collateral_rate;
            if !meets_min_collateral(outcome.stored, price, vault.hedge_value, rate)? {
                warn!(sn, stored = outcome.stored, "withdrawal below minimum rate rejected");
                return Err(XHedgeError::AmtNotEnough { stored: outcome.stored });
            }

            // 3. Pay, then store
            self.sink
                .deliver(&[Payout::new(ctx.caller, outcome.payout, PayoutReason::Withdrawal)])?;
            self.state.store.set_amount(sn, outcome.stored)?;
            AmountChange { stored: outcome.stored, payout: outcome.payout, fee: outcome.fee }
        };

        self.events.emit(XHedgeEvent::AmountUpdated {
            sn,
            new_amount: change.stored,
            timestamp: ctx.now,
        });
        debug!(sn, stored = change.stored, payout = change.payout, "amount changed");
        Ok(change)
    }

    // ============ Voting ============

    /// Point the vault's future votes at `new_validator`.
    /// Accumulated votes stay where they are.
    pub fn change_validator_to_vote(
        &mut self,
        ctx: &CallContext,
        lever_token: TokenId,
        new_validator: ValidatorId,
    ) -> XHedgeResult<()> {
        if ClaimKind::of(lever_token) != ClaimKind::Lever {
            return Err(XHedgeError::NotLeverNft { token_id: lever_token });
        }
        if !self.holds(&ctx.caller, lever_token) {
            warn!(token_id = lever_token, "validator change by non-owner rejected");
            return Err(XHedgeError::NotOwner { token_id: lever_token, caller: ctx.caller });
        }
        let sn = serial_of(lever_token)?;

        self.state.store.set_validator(sn, new_validator)?;
        self.events.emit(XHedgeEvent::ValidatorToVoteUpdated {
            sn,
            new_validator,
            timestamp: ctx.now,
        });
        debug!(sn, "validator to vote updated");
        Ok(())
    }

    /// Credit `min(now - last_vote_time, cap) * amount` to the vault's
    /// validator. Anyone may call it. A validator without votes only
    /// accepts a first vote of at least `min_votes_for_new_validator`.
    ///
    /// Returns the increment.
    pub fn vote(&mut self, ctx: &CallContext, sn: SerialNumber) -> XHedgeResult<u128> {
        let vault = self.state.store.require(sn)?;
        let validator = vault.validator_to_vote;
        let incr_votes = vote_increment(
            ctx.now,
            vault.last_vote_time,
            self.config.max_vote_elapsed,
            vault.amount,
        )?;

        let threshold = self.config.min_votes_for_new_validator;
        if self.state.votes.is_new(&validator) && incr_votes < threshold {
            return Err(XHedgeError::NotEnoughVotesForNewVal {
                incr_votes,
                minimum: threshold,
            });
        }
        self.state.votes.total_after(&validator, incr_votes)?;

        self.state.store.set_last_vote_time(sn, ctx.now)?;
        let new_accumulated_votes = self.state.votes.accumulate(validator, incr_votes)?;

        self.events.emit(XHedgeEvent::Voted {
            sn,
            validator,
            incr_votes,
            new_accumulated_votes,
            timestamp: ctx.now,
        });
        debug!(sn, incr_votes, new_accumulated_votes, "vote accumulated");
        Ok(incr_votes)
    }

    /// Vote every open vault. Each vote stands alone: a vault that fails is
    /// reported and the rest still vote.
    pub fn vote_all(&mut self, ctx: &CallContext) -> Vec<(SerialNumber, XHedgeResult<u128>)> {
        let outcomes: Vec<_> = self
            .open_serials()
            .into_iter()
            .map(|sn| (sn, self.vote(ctx, sn)))
            .collect();

        for (sn, result) in &outcomes {
            if let Err(err) = result {
                warn!(sn, code = err.code(), "vault vote failed");
            }
        }
        outcomes
    }

    // ============ Internals ============

    fn holds(&self, who: &Address, token_id: TokenId) -> bool {
        self.registry.owner_of(token_id) == Some(*who)
    }

    fn owner(&self, token_id: TokenId) -> XHedgeResult<Address> {
        self.registry.owner_of(token_id).ok_or(XHedgeError::TokenNotFound { token_id })
    }

    /// Pay both sides of a split to the current claim holders and retire
    /// the vault.
    fn settle(
        &mut self,
        ctx: &CallContext,
        sn: SerialNumber,
        split: PayoutSplit,
    ) -> XHedgeResult<()> {
        let claims = VaultClaims::new(sn);
        let hedge_owner = self.owner(claims.hedge())?;
        let lever_owner = self.owner(claims.lever())?;

        self.sink.deliver(&[
            Payout::new(hedge_owner, split.to_hedger, PayoutReason::HedgeSettlement),
            Payout::new(lever_owner, split.to_lever, PayoutReason::LeverSettlement),
        ])?;
        self.retire(ctx, sn)
    }

    /// Burn both claims and drop the vault from the store.
    fn retire(&mut self, ctx: &CallContext, sn: SerialNumber) -> XHedgeResult<()> {
        let claims = VaultClaims::new(sn);
        self.state.store.close(sn)?;
        for token_id in [claims.lever(), claims.hedge()] {
            let from = self.registry.burn(token_id)?;
            self.events.emit(XHedgeEvent::ClaimBurned {
                token_id,
                from,
                timestamp: ctx.now,
            });
        }
        Ok(())
    }
}

/// Vault serial behind a claim id
fn serial_of(token_id: TokenId) -> XHedgeResult<SerialNumber> {
    VaultClaims::from_token(token_id)
        .map(|(claims, _)| claims.sn)
        .ok_or(XHedgeError::TokenNotFound { token_id })
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;
    use xhedge_common::constants::precision::WAD;

    const ALICE: Address = [1u8; 32];
    const LULA: Address = [2u8; 32];
    const OPERATOR: Address = [9u8; 32];
    const FEED: [u8; 20] = [7u8; 20];
    const VALIDATOR: ValidatorId = [5u8; 32];
    const NOW: u64 = 1_700_000_000;

    fn wad(n: u128) -> u128 {
        n * WAD
    }

    fn create_test_engine() -> InMemoryEngine {
        let mut book = OracleBook::new();
        book.register(FEED, OPERATOR, wad(600), NOW).unwrap();
        InMemoryEngine::in_memory(EngineConfig::default(), book).unwrap()
    }

    fn params() -> CreateVaultParams {
        CreateVaultParams {
            init_collateral_rate: 500_000_000_000_000_000,
            min_collateral_rate: 200_000_000_000_000_000,
            closeout_penalty: 10_000_000_000_000_000,
            mature_time: NOW + 1_800,
            validator_to_vote: VALIDATOR,
            hedge_value: wad(600),
            oracle: FEED,
        }
    }

    #[test]
    fn test_create_vault_success() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);

        let created = engine.create(&ctx, params(), 1_500_000_000_000_000_000).unwrap();

        assert_eq!(created.sn, 1);
        assert_eq!((created.lever_token, created.hedge_token), (2, 3));
        assert_eq!(created.amount, 1_500_000_000_000_000_000);
        assert_eq!(created.refund, 0);

        let vault = engine.load(1);
        assert_eq!(vault.amount, created.amount);
        assert_eq!(vault.last_vote_time, NOW);
        assert_eq!(engine.registry().owner_of(2), Some(ALICE));
        assert_eq!(engine.registry().owner_of(3), Some(ALICE));
        assert_eq!(engine.take_events().len(), 3);
    }

    #[test]
    fn test_create_rates_not_match() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);
        let mut p = params();
        p.min_collateral_rate = p.init_collateral_rate + 1;

        let result = engine.create(&ctx, p, wad(10));
        assert!(matches!(result, Err(XHedgeError::CollateralRatesNotMatch { .. })));
    }

    #[test]
    fn test_create_mature_time_in_past() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);
        let mut p = params();
        p.mature_time = NOW;

        let result = engine.create(&ctx, p, wad(10));
        assert!(matches!(result, Err(XHedgeError::InvalidMatureTime { .. })));
    }

    #[test]
    fn test_create_not_enough_paid() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);

        let result = engine.create(&ctx, params(), wad(1));
        assert!(matches!(result, Err(XHedgeError::NotEnoughPaid { .. })));
        assert_eq!(engine.state().store.next_serial(), 1);
        assert!(engine.take_events().is_empty());
    }

    #[test]
    fn test_create_unknown_oracle() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);
        let mut p = params();
        p.oracle = [1u8; 20];

        let result = engine.create(&ctx, p, wad(10));
        assert!(matches!(result, Err(XHedgeError::OracleNotFound { .. })));
    }

    #[test]
    fn test_create_packed_matches_create() {
        let mut engine = create_test_engine();
        let ctx = CallContext::new(ALICE, NOW);
        let packed = PackedCreateArgs::pack(&params()).unwrap();

        let created = engine.create_packed(&ctx, &packed, wad(2)).unwrap();
        assert_eq!(created.amount, 1_500_000_000_000_000_000);
        assert_eq!(created.refund, 500_000_000_000_000_000);

        let vault = engine.load(created.sn);
        assert_eq!(vault.hedge_value, wad(600));
        assert_eq!(vault.oracle, FEED);
        assert_eq!(vault.validator_to_vote, VALIDATOR);
    }

    #[test]
    fn test_claims_of() {
        let mut engine = create_test_engine();
        let created = engine.create(&CallContext::new(ALICE, NOW), params(), wad(2)).unwrap();
        engine
            .registry_mut()
            .transfer_from(&CallContext::new(ALICE, NOW), LULA, created.lever_token)
            .unwrap();

        let owners = engine.claims_of(created.sn).unwrap();
        assert_eq!(owners.lever_owner, LULA);
        assert_eq!(owners.hedge_owner, ALICE);
        assert!(engine.claims_of(created.sn + 1).is_none());
    }

    #[test]
    fn test_change_validator_to_vote() {
        let mut engine = create_test_engine();
        let created = engine.create(&CallContext::new(ALICE, NOW), params(), wad(2)).unwrap();
        engine.take_events();

        let new_validator = [123u8; 32];
        let ctx = CallContext::new(ALICE, NOW + 1);

        let result = engine.change_validator_to_vote(&ctx, created.hedge_token, new_validator);
        assert!(matches!(result, Err(XHedgeError::NotLeverNft { .. })));

        let ctx = CallContext::new(LULA, NOW);
        let result = engine.change_validator_to_vote(&ctx, created.lever_token, new_validator);
        assert!(matches!(result, Err(XHedgeError::NotOwner { .. })));

        engine.change_validator_to_vote(&ctx, created.lever_token, new_validator).unwrap();
        assert_eq!(engine.load(created.sn).validator_to_vote, new_validator);
        assert_eq!(engine.val_to_votes(&new_validator), 0);
        assert_eq!(
            engine.take_events(),
            vec![XHedgeEvent::ValidatorToVoteUpdated {
                sn: created.sn,
                new_validator,
                timestamp: NOW + 1,
            }]
        );
    }

    #[test]
    fn test_reject_invalid_config() {
        let config = EngineConfig { max_vote_elapsed: 0, ..Default::default() };
        let result = InMemoryEngine::in_memory(config, OracleBook::new());
        assert!(matches!(result, Err(XHedgeError::InvalidConfig { .. })));
    }
}
